//! Extension framework and fact extractors for cmdfacts
//!
//! This crate handles:
//! - Extension lifecycle, idempotency and artifact storage
//! - Capability registry and requirement resolution
//! - Compiler command dependency extraction
//! - Macro and typedef fact aggregation

pub mod artifact;
pub mod cc;
pub mod common;
pub mod context;
pub mod dependency;
pub mod depfile;
pub mod extension;
pub mod facts;
pub mod info;
pub mod macros;
pub mod registry;
pub mod storage;
pub mod typedefs;

pub use artifact::CompletionRecord;
pub use cc::CC;
pub use context::ExtensionContext;
pub use dependency::DependencyResolver;
pub use extension::{Extension, ExtensionBase};
pub use info::{FactSource, Info, Lines};
pub use macros::{MacroDefinitions, MacroExpansion, MacroExpansions, Macros};
pub use registry::{factory, ExtensionDescriptor, ExtensionFactory, ExtensionRegistry};
pub use storage::{ArchiveStore, Storage};
pub use typedefs::{TypedefMap, Typedefs};
