//! CLI module
//!
//! Command-line interface for the batch transform and the generator.
//!
//! # Commands
//!
//! - `transform` - Clean the newest raw drop and publish it
//! - `generate` - Upload a synthetic raw drop
//! - `config` - Print the effective configuration

mod commands;
mod runner;

pub use commands::{Cli, Commands, MessageFormat};
pub use runner::{generate_message, report_message, Runner};
