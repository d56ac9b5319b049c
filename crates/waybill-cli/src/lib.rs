//! Waybill CLI library.
//!
//! Batch and single-label entry points for the label pipeline: CSV loading
//! and writing, configuration, logging setup and console output.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod io;
pub mod logging;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
