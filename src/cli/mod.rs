//! Command-line workflows shared by the binaries.

pub mod orchestration;

pub use orchestration::{run_release, ReleaseArgs, ReleaseResult};
