//! Command-line interface for udm-dash.

mod commands;
pub mod helpers;
pub mod icons;
pub mod progress;

pub use commands::{is_verbose, run};
