//! Pure formatting functions for UI output.
//!
//! Errors go to stderr, progress and summaries to stdout.

use std::path::Path;

use console::style;

use crate::patch::{EntryCount, PatchOutcome};

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

fn format_entry(count: &EntryCount) -> String {
    match (count.replaced, count.already_applied) {
        (0, 0) => format!("{}: not found", count.pattern),
        (0, _) => format!("{}: already applied", count.pattern),
        (1, _) => format!("{}: 1 replacement", count.pattern),
        (n, _) => format!("{}: {} replacements", count.pattern, n),
    }
}

/// One line per replacement entry: the token and how often it matched.
pub fn format_replacement_summary(outcome: &PatchOutcome) -> Vec<String> {
    outcome.counts.iter().map(format_entry).collect()
}

/// Display what a patch run did to `path`.
///
/// # Arguments
/// * `path` - The file that was (or would be) patched
/// * `outcome` - Per-entry counts from the patch run
pub fn display_replacement_summary(path: &Path, outcome: &PatchOutcome) {
    let header = if outcome.changed {
        style(path.display().to_string()).bold()
    } else {
        style(format!("{} (unchanged)", path.display())).dim()
    };
    println!("\n{}", header);
    for count in &outcome.counts {
        let line = format_entry(count);
        if count.replaced == 0 {
            println!("  {}", style(line).dim());
        } else {
            println!("  {}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(pattern: &str, replaced: usize, already_applied: usize) -> EntryCount {
        EntryCount {
            pattern: pattern.to_string(),
            replaced,
            already_applied,
        }
    }

    #[test]
    fn test_format_replacement_summary() {
        let outcome = PatchOutcome {
            counts: vec![
                count("INSERT-CONTAINER-IMAGE", 1, 0),
                count("bundle/manifests", 2, 0),
                count("namespace: placeholder", 0, 0),
                count("type: AllNamespaces", 0, 1),
            ],
            changed: true,
        };
        assert_eq!(
            format_replacement_summary(&outcome),
            vec![
                "INSERT-CONTAINER-IMAGE: 1 replacement",
                "bundle/manifests: 2 replacements",
                "namespace: placeholder: not found",
                "type: AllNamespaces: already applied",
            ]
        );
    }

    #[test]
    fn test_display_functions() {
        // Visual verification test - output is printed to stdout/stderr
        display_error("test error");
        display_success("test success");
        display_status("test status");
    }
}
