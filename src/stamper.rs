//! ClusterServiceVersion stamping.
//!
//! The generated CSV carries fixed placeholder tokens. Stamping swaps them for
//! release values and appends the `replaces:` and `relatedImages` entries
//! after their anchor lines.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::config::Config;
use crate::error::{Result, StampError};
use crate::patch::{self, PatchOutcome, ReplacementMap};

/// Creation timestamp left in the template by the generator.
pub const TIMESTAMP_PLACEHOLDER: &str = "0001-01-01T00:00:00Z";
pub const IMAGE_PLACEHOLDER: &str = "INSERT-CONTAINER-IMAGE";
pub const DESCRIPTION_PLACEHOLDER: &str = "INSERT-DESCRIPTION";
pub const NAMESPACE_PLACEHOLDER: &str = "namespace: placeholder";
/// Anchor for the related-images block.
pub const INSTALL_MODE_ANCHOR: &str = "type: AllNamespaces";

/// Continuation indent for description lines inside the block scalar.
const DESCRIPTION_INDENT: &str = "    ";

/// Release values written into the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StampRequest {
    pub version: String,
    pub previous_version: String,
    /// Image reference, e.g. `quay.io/org/operator@sha256:<digest>`.
    pub image: String,
    /// Empty means leave the namespace placeholder alone.
    pub namespace: String,
}

/// ISO-8601 UTC timestamp truncated to whole seconds, `Z` suffixed.
pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Join description lines with the block-scalar indent.
///
/// Line terminators are kept, so every line after the first starts with the
/// indent.
pub fn format_description(text: &str) -> String {
    text.split_inclusive('\n')
        .collect::<Vec<_>>()
        .join(DESCRIPTION_INDENT)
}

/// Read the Markdown description and format it for embedding.
pub fn load_description(path: &Path) -> Result<String> {
    let text = patch::read_target(path)?;
    Ok(format_description(&text))
}

/// Build the ordered replacement map for one release.
pub fn csv_replacements(
    request: &StampRequest,
    config: &Config,
    description: &str,
    now: DateTime<Utc>,
) -> ReplacementMap {
    let operator = &config.operator.name;

    let map = ReplacementMap::new()
        .replace(TIMESTAMP_PLACEHOLDER, format_timestamp(now))
        .replace(IMAGE_PLACEHOLDER, request.image.as_str())
        .replace(
            DESCRIPTION_PLACEHOLDER,
            format!("|-\n{}{}", DESCRIPTION_INDENT, description),
        )
        .append(
            format!("name: {}", config.operator.publisher),
            format!("\n  replaces: {}.v{}", operator, request.previous_version),
        )
        .append(
            INSTALL_MODE_ANCHOR,
            format!(
                "\n  relatedImages:\n    - name: {}\n      image: {}",
                operator, request.image
            ),
        );

    if request.namespace.is_empty() {
        map
    } else {
        map.replace(
            NAMESPACE_PLACEHOLDER,
            format!("namespace: {}", request.namespace),
        )
    }
}

/// Check that every document in `text` still parses as YAML.
pub fn validate_manifest(text: &str) -> Result<()> {
    for document in serde_yaml::Deserializer::from_str(text) {
        serde_yaml::Value::deserialize(document)
            .map_err(|e| StampError::invalid_manifest(e.to_string()))?;
    }
    Ok(())
}

/// Stamp the CSV manifest for `request.version` in place.
///
/// The version pair must already be validated. Reads the description, builds
/// the replacement map and applies it with one atomic swap. The patched text
/// must parse as YAML or nothing is written.
pub fn stamp_manifest(
    request: &StampRequest,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<PatchOutcome> {
    let description = load_description(&config.paths.description)?;
    let map = csv_replacements(request, config, &description, now);
    patch::patch_file_checked(
        &config.manifest_path(&request.version),
        &map,
        validate_manifest,
    )
}

/// Same as [`stamp_manifest`] without writing anything.
pub fn preview_manifest(
    request: &StampRequest,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<PatchOutcome> {
    let description = load_description(&config.paths.description)?;
    let map = csv_replacements(request, config, &description, now);
    let original = patch::read_target(&config.manifest_path(&request.version))?;
    let (patched, outcome) = patch::apply(&original, &map);
    validate_manifest(&patched)?;
    Ok(outcome)
}
