//! Common test utilities for cmdfacts-extensions
//!
//! This module provides shared test infrastructure including:
//! - Constants for fake toolchains and fact lines
//! - Project fixtures with a scripted fake compiler
//! - Mock extensions for registry overrides
//! - Assertion helpers for stored artifacts

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod assertions;
pub mod constants;
pub mod fixtures;
pub mod mocks;

pub use assertions::*;
pub use constants::*;
pub use fixtures::*;
pub use mocks::*;
