//! Chronos CLI library.
//!
//! This crate provides the command-line interface for the chronos time
//! tracker.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, SheetsAction};
pub use config::Config;
