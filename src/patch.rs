//! Literal text patching of files on disk.
//!
//! A [`ReplacementMap`] is an ordered list of literal substitutions. Patching
//! reads the target once, applies every entry in memory, then swaps the new
//! contents in through a temp file in the same directory so readers never see
//! a half-written file. Permission bits of the original survive the swap.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Result, StampError};

/// A single substitution rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replacement {
    /// Replace every occurrence of `pattern` with `replacement`.
    Replace { pattern: String, replacement: String },
    /// Insert `addition` right after every occurrence of `anchor`,
    /// unless that occurrence is already followed by `addition`.
    Append { anchor: String, addition: String },
}

impl Replacement {
    /// The literal this entry searches for.
    pub fn pattern(&self) -> &str {
        match self {
            Replacement::Replace { pattern, .. } => pattern,
            Replacement::Append { anchor, .. } => anchor,
        }
    }

    /// Apply this entry to `contents`, returning the new text and how many
    /// matches were rewritten or found already applied.
    ///
    /// Patterns are matched within a line; a pattern spanning a line break
    /// never matches.
    pub fn apply(&self, contents: &str) -> (String, EntryCount) {
        let (out, replaced, already_applied) = match self {
            Replacement::Replace {
                pattern,
                replacement,
            } => {
                let (out, replaced) = replace_lines(contents, pattern, replacement);
                (out, replaced, 0)
            }
            Replacement::Append { anchor, addition } => append_after(contents, anchor, addition),
        };
        let count = EntryCount {
            pattern: self.pattern().to_string(),
            replaced,
            already_applied,
        };
        (out, count)
    }
}

/// Match counts for one entry of a patch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryCount {
    pub pattern: String,
    /// Occurrences rewritten by this run.
    pub replaced: usize,
    /// `Append` anchors already followed by their addition, left as they were.
    pub already_applied: usize,
}

fn replace_lines(contents: &str, pattern: &str, replacement: &str) -> (String, usize) {
    if pattern.is_empty() || pattern.contains('\n') {
        return (contents.to_string(), 0);
    }

    let mut out = String::with_capacity(contents.len());
    let mut count = 0;
    for line in contents.split_inclusive('\n') {
        let hits = line.matches(pattern).count();
        if hits == 0 {
            out.push_str(line);
        } else {
            count += hits;
            out.push_str(&line.replace(pattern, replacement));
        }
    }
    (out, count)
}

fn append_after(contents: &str, anchor: &str, addition: &str) -> (String, usize, usize) {
    if anchor.is_empty() || anchor.contains('\n') || addition.is_empty() {
        return (contents.to_string(), 0, 0);
    }

    let mut out = String::with_capacity(contents.len() + addition.len());
    let mut count = 0;
    let mut skipped = 0;
    let mut rest = contents;
    while let Some(idx) = rest.find(anchor) {
        let end = idx + anchor.len();
        out.push_str(&rest[..end]);
        rest = &rest[end..];
        if rest.starts_with(addition) {
            out.push_str(addition);
            rest = &rest[addition.len()..];
            skipped += 1;
        } else {
            out.push_str(addition);
            count += 1;
        }
    }
    out.push_str(rest);
    (out, count, skipped)
}

/// Ordered set of substitutions applied to one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplacementMap {
    entries: Vec<Replacement>,
}

impl ReplacementMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plain literal replacement.
    pub fn replace(mut self, pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.entries.push(Replacement::Replace {
            pattern: pattern.into(),
            replacement: replacement.into(),
        });
        self
    }

    /// Add an insertion after an anchor line fragment.
    pub fn append(mut self, anchor: impl Into<String>, addition: impl Into<String>) -> Self {
        self.entries.push(Replacement::Append {
            anchor: anchor.into(),
            addition: addition.into(),
        });
        self
    }

    pub fn entries(&self) -> &[Replacement] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What a patch run did to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOutcome {
    /// Match counts per entry, in map order.
    pub counts: Vec<EntryCount>,
    /// Whether the contents differ from the original.
    pub changed: bool,
}

impl PatchOutcome {
    pub fn total(&self) -> usize {
        self.counts.iter().map(|c| c.replaced).sum()
    }
}

/// Apply every entry of `map` to `contents`, in order.
pub fn apply(contents: &str, map: &ReplacementMap) -> (String, PatchOutcome) {
    let mut current = contents.to_string();
    let mut counts = Vec::with_capacity(map.len());
    for entry in map.entries() {
        let (next, count) = entry.apply(&current);
        counts.push(count);
        current = next;
    }
    let changed = current != contents;
    (current, PatchOutcome { counts, changed })
}

/// Read `path` as UTF-8, mapping missing/forbidden files to path-carrying errors.
pub fn read_target(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| StampError::from_io(e, path))
}

/// Replace the contents of `path` atomically, keeping its permission bits.
///
/// Symlinks are followed: the file they point to is rewritten and the link
/// stays. The new contents go to a temp file next to that file, which is
/// then renamed over it. On failure the original file is left as it was.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let target = fs::canonicalize(path).map_err(|e| StampError::from_io(e, path))?;
    let permissions = fs::metadata(&target)
        .map_err(|e| StampError::from_io(e, path))?
        .permissions();

    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StampError::from_io(e, dir))?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;
    fs::set_permissions(tmp.path(), permissions)?;
    tmp.persist(&target)
        .map_err(|e| StampError::from_io(e.error, &target))?;
    Ok(())
}

/// Patch `path` in place with every entry of `map`, as one atomic swap.
///
/// Nothing is written when no entry matched.
pub fn patch_file(path: &Path, map: &ReplacementMap) -> Result<PatchOutcome> {
    patch_file_checked(path, map, |_| Ok(()))
}

/// Like [`patch_file`], but runs `check` on the patched text before writing.
///
/// If `check` fails the file is left untouched and its error is returned.
pub fn patch_file_checked<F>(path: &Path, map: &ReplacementMap, check: F) -> Result<PatchOutcome>
where
    F: FnOnce(&str) -> Result<()>,
{
    let original = read_target(path)?;
    let (patched, outcome) = apply(&original, map);
    if outcome.changed {
        check(&patched)?;
        write_atomic(path, &patched)?;
    }
    Ok(outcome)
}

/// Replace every occurrence of `pattern` in `path` with `replacement`.
pub fn replace_in_file(path: &Path, pattern: &str, replacement: &str) -> Result<PatchOutcome> {
    patch_file(path, &ReplacementMap::new().replace(pattern, replacement))
}
