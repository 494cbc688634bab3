//! Type definitions for cmdfacts configuration and commands

mod command_types;
mod config_types;

pub use command_types::*;
pub use config_types::*;
