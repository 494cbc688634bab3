//! # cmdfacts-core
//!
//! Core library for cmdfacts providing:
//! - Error taxonomy shared by every extension
//! - Run configuration (`cmdfacts.yaml`) loading and validation
//! - Raw and normalized build command types

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use error::{Error, Result};
pub use types::{CommandRecord, ExtensionConfig, RawCommand};
pub use utils::resolve_path;
