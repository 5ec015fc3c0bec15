//! User interface module.
//!
//! The tools are non-interactive, so this is only the output side:
//! see [`formatter`].

pub mod formatter;

pub use formatter::{
    display_error, display_replacement_summary, display_status, display_success,
    format_replacement_summary,
};
