//! Release workflow orchestration
//!
//! Separates the stamping flow from CLI argument parsing so it can be driven
//! programmatically and from tests.

use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::dockerfile;
use crate::error::Result;
use crate::patch::PatchOutcome;
use crate::stamper::{self, StampRequest};
use crate::version;

/// Arguments for the release workflow
///
/// Mirrors the CLI arguments without depending on clap.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseArgs {
    pub request: StampRequest,

    /// Report what would change without writing
    pub dry_run: bool,
}

/// Result of a successful release workflow
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseResult {
    pub manifest: PatchOutcome,
    pub dockerfile: PatchOutcome,
}

/// Main release workflow
///
/// 1. Validate the version pair (no file is touched if this fails)
/// 2. Stamp the CSV manifest
/// 3. Fix the staged paths in the versioned Dockerfile
///
/// Each file is swapped in atomically; a failure on the Dockerfile leaves an
/// already-stamped manifest in place.
pub fn run_release(args: &ReleaseArgs, config: &Config, now: DateTime<Utc>) -> Result<ReleaseResult> {
    let request = &args.request;
    version::validate_pair(&request.version, &request.previous_version)?;

    if args.dry_run {
        return Ok(ReleaseResult {
            manifest: stamper::preview_manifest(request, config, now)?,
            dockerfile: dockerfile::preview_paths(config, &request.version)?,
        });
    }

    let manifest = stamper::stamp_manifest(request, config, now)?;
    let dockerfile = dockerfile::fix_paths(config, &request.version)?;
    Ok(ReleaseResult {
        manifest,
        dockerfile,
    })
}
