pub mod cli;
pub mod config;
pub mod dockerfile;
pub mod error;
pub mod patch;
pub mod stamper;
pub mod ui;
pub mod version;

pub use error::{Result, StampError};
