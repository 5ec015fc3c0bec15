use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use bundle_stamp::cli::{run_release, ReleaseArgs};
use bundle_stamp::config;
use bundle_stamp::stamper::StampRequest;
use bundle_stamp::ui;

#[derive(clap::Parser)]
#[command(
    name = "bundle-stamp",
    about = "Stamp release values into an operator bundle's CSV manifest and Dockerfile"
)]
struct Args {
    #[arg(help = "Version being released (MAJOR.MINOR.PATCH)")]
    version: String,

    #[arg(help = "Version this release replaces")]
    previous_version: String,

    #[arg(help = "Operator image reference, e.g. quay.io/org/operator@sha256:<digest>")]
    image_sha: String,

    #[arg(short, long, default_value = "", help = "Namespace to write into the CSV")]
    namespace: String,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(long, help = "Preview what would change without writing files")]
    dry_run: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let release = ReleaseArgs {
        request: StampRequest {
            version: args.version,
            previous_version: args.previous_version,
            image: args.image_sha,
            namespace: args.namespace,
        },
        dry_run: args.dry_run,
    };

    let result = match run_release(&release, &config, chrono::Utc::now()) {
        Ok(result) => result,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let version = &release.request.version;
    ui::display_replacement_summary(&config.manifest_path(version), &result.manifest);
    ui::display_replacement_summary(&config.dockerfile_path(version), &result.dockerfile);

    if release.dry_run {
        ui::display_status("Dry run: no files were written");
    } else {
        println!();
        ui::display_success(&format!(
            "Stamped {} v{} (replaces v{})",
            config.operator.name, version, release.request.previous_version
        ));
    }

    Ok(())
}
