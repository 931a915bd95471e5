//! BT command line front end
//!
//! Argument parsing, configuration, logging setup and the subcommands of the
//! `bt` binary.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod manifest;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
