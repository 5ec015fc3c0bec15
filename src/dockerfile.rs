//! Build-file path rewriting.
//!
//! The bundle generator writes `COPY` directives relative to the repository
//! root (`bundle/manifests`, ...). The published bundle is built from inside
//! the bundle directory, so the `bundle/` staging prefix has to go.

use std::path::Path;

use crate::config::Config;
use crate::error::Result;
use crate::patch::{self, PatchOutcome, ReplacementMap};

/// Build file the trimmer rewrites, relative to the working directory.
pub const BUNDLE_DOCKERFILE: &str = "bundle.Dockerfile";

/// Staging prefix removed from `COPY` lines.
pub const STAGING_PREFIX: &str = "bundle/";

/// Bundle sub-directories the versioned Dockerfile copies from.
pub const STAGED_DIRS: [&str; 3] = ["manifests", "metadata", "tests"];

/// `bundle/<dir>` -> `<dir>` for every staged directory.
pub fn path_replacements() -> ReplacementMap {
    STAGED_DIRS.iter().fold(ReplacementMap::new(), |map, dir| {
        map.replace(format!("{}{}", STAGING_PREFIX, dir), *dir)
    })
}

/// Rewrite the staged paths in `<bundle_root>/<version>/Dockerfile`.
pub fn fix_paths(config: &Config, version: &str) -> Result<PatchOutcome> {
    patch::patch_file(&config.dockerfile_path(version), &path_replacements())
}

/// Like [`fix_paths`] without writing anything.
pub fn preview_paths(config: &Config, version: &str) -> Result<PatchOutcome> {
    let original = patch::read_target(&config.dockerfile_path(version))?;
    Ok(patch::apply(&original, &path_replacements()).1)
}

/// Strip every `bundle/` from lines starting with `COPY`.
///
/// Other lines pass through untouched, even if they mention `bundle/`.
pub fn trim_copy_lines(contents: &str) -> String {
    contents
        .split_inclusive('\n')
        .map(|line| {
            if line.starts_with("COPY") {
                line.replace(STAGING_PREFIX, "")
            } else {
                line.to_string()
            }
        })
        .collect()
}

/// Rewrite the `COPY` lines of the build file at `path` in place.
pub fn trim_bundle_dockerfile(path: &Path) -> Result<()> {
    let original = patch::read_target(path)?;
    patch::write_atomic(path, &trim_copy_lines(&original))
}
