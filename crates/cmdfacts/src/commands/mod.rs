//! CLI command implementations

pub mod extensions;
pub mod parse;
