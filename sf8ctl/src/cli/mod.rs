//! Console command definitions and handlers
//!
//! This module organizes the CLI into logical submodules:
//! - [`commands`] - Command line and console line definitions
//! - [`handlers`] - Command execution handlers

mod commands;
mod handlers;

pub use commands::*;
pub use handlers::*;
