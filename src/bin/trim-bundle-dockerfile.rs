//! Strips the `bundle/` staging prefix from the `COPY` lines of
//! `bundle.Dockerfile` in the working directory.

use std::path::Path;

use anyhow::Result;

use bundle_stamp::dockerfile::{trim_bundle_dockerfile, BUNDLE_DOCKERFILE};
use bundle_stamp::ui;

fn main() -> Result<()> {
    if let Err(e) = trim_bundle_dockerfile(Path::new(BUNDLE_DOCKERFILE)) {
        ui::display_error(&e.to_string());
        std::process::exit(1);
    }

    println!("Updated {}", BUNDLE_DOCKERFILE);
    Ok(())
}
