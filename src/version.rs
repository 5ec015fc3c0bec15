//! Release version validation.
//!
//! A release needs two SemVer strings: the version being published and the
//! version it replaces. Both must be well formed and the new one must sort
//! strictly after the previous one.

use std::cmp::Ordering;

use regex::Regex;
use semver::{BuildMetadata, Version};

use crate::error::{Result, StampError};

/// The grammar published on semver.org, anchored to the whole string.
const SEMVER_PATTERN: &str = r"^(0|[1-9]\d*)\.(0|[1-9]\d*)\.(0|[1-9]\d*)(?:-((?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*)(?:\.(?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*))*))?(?:\+([0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?$";

/// Returns true when `value` matches the SemVer grammar.
///
/// No `v` prefix, exactly three numeric components, no leading zeros.
pub fn is_semver(value: &str) -> bool {
    if let Ok(re) = Regex::new(SEMVER_PATTERN) {
        return re.is_match(value);
    }
    false
}

/// Compare two versions by SemVer precedence.
///
/// Unlike `Version`'s `Ord`, build metadata does not take part.
pub fn cmp_precedence(a: &Version, b: &Version) -> Ordering {
    let strip = |v: &Version| Version {
        build: BuildMetadata::EMPTY,
        ..v.clone()
    };
    strip(a).cmp(&strip(b))
}

/// Validate a release version pair.
///
/// # Arguments
/// * `new` - Version being released
/// * `previous` - Version it replaces
///
/// # Returns
/// * `Ok(Version)` - The parsed new version
/// * `Err(InvalidVersion)` - Either string is malformed; every bad value is named
/// * `Err(VersionNotIncreasing)` - `new` does not sort strictly after `previous`
pub fn validate_pair(new: &str, previous: &str) -> Result<Version> {
    let malformed: Vec<String> = [new, previous]
        .iter()
        .filter(|v| !is_semver(v))
        .map(|v| v.to_string())
        .collect();
    if !malformed.is_empty() {
        return Err(StampError::InvalidVersion { values: malformed });
    }

    let parse = |v: &str| {
        Version::parse(v).map_err(|_| StampError::InvalidVersion {
            values: vec![v.to_string()],
        })
    };
    let new_version = parse(new)?;
    let previous_version = parse(previous)?;

    if cmp_precedence(&new_version, &previous_version) != Ordering::Greater {
        return Err(StampError::VersionNotIncreasing {
            new: new.to_string(),
            previous: previous.to_string(),
        });
    }

    Ok(new_version)
}
