//! Capability registry
//!
//! Maps a capability name to the descriptor of the extension that provides
//! it: the names it requires and a constructor. The table is built once at
//! start-up; lookups never scan anything.

use crate::cc::CC;
use crate::extension::{Extension, ExtensionBase};
use crate::info::Info;
use crate::macros::Macros;
use crate::storage::Storage;
use crate::typedefs::Typedefs;
use cmdfacts_core::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Constructor for an extension from its prepared base
pub type ExtensionFactory = Box<dyn Fn(ExtensionBase) -> Result<Arc<dyn Extension>> + Send + Sync>;

/// Wrap a typed constructor as an [`ExtensionFactory`]
pub fn factory<E: Extension>(ctor: fn(ExtensionBase) -> Result<E>) -> ExtensionFactory {
    Box::new(move |base: ExtensionBase| -> Result<Arc<dyn Extension>> {
        Ok(Arc::new(ctor(base)?))
    })
}

/// Everything needed to instantiate one capability
pub struct ExtensionDescriptor {
    /// Capability name, also the working directory name
    pub name: String,

    /// Capabilities that must be instantiated and parsed first, in order
    pub requires: Vec<String>,

    /// One-line description for listings
    pub description: String,

    /// Constructor
    pub factory: ExtensionFactory,
}

impl ExtensionDescriptor {
    pub fn new(
        name: impl Into<String>,
        requires: &[&str],
        description: impl Into<String>,
        factory: ExtensionFactory,
    ) -> Self {
        Self {
            name: name.into(),
            requires: requires.iter().map(|r| r.to_string()).collect(),
            description: description.into(),
            factory,
        }
    }
}

impl fmt::Debug for ExtensionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionDescriptor")
            .field("name", &self.name)
            .field("requires", &self.requires)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Factory table of every known capability
#[derive(Debug, Default)]
pub struct ExtensionRegistry {
    descriptors: HashMap<String, ExtensionDescriptor>,
}

impl ExtensionRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in extensions
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        registry.register(ExtensionDescriptor::new(
            "Storage",
            &[],
            "Archive of source files",
            factory(Storage::new),
        ));
        registry.register(ExtensionDescriptor::new(
            "Info",
            &[],
            "Raw macro and typedef fact streams",
            factory(Info::new),
        ));
        registry.register(ExtensionDescriptor::new(
            "CC",
            &["Storage"],
            "Compiler commands and their file dependencies",
            factory(CC::new),
        ));
        registry.register(ExtensionDescriptor::new(
            "Macros",
            &["Info"],
            "Macro definitions and expansions",
            factory(Macros::new),
        ));
        registry.register(ExtensionDescriptor::new(
            "Typedefs",
            &["Info"],
            "Typedef declarations per file",
            factory(Typedefs::new),
        ));

        registry
    }

    /// Register a descriptor under its name
    ///
    /// A descriptor already registered under the same name is replaced
    /// without notice.
    pub fn register(&mut self, descriptor: ExtensionDescriptor) {
        debug!("Registering extension {}", descriptor.name);
        self.descriptors.insert(descriptor.name.clone(), descriptor);
    }

    /// Find the descriptor for a capability
    pub fn resolve(&self, name: &str) -> Result<&ExtensionDescriptor> {
        self.descriptors
            .get(name)
            .ok_or_else(|| Error::unresolved_capability(name))
    }

    /// Iterate over all descriptors, sorted by name
    pub fn descriptors(&self) -> impl Iterator<Item = &ExtensionDescriptor> {
        let mut descriptors: Vec<_> = self.descriptors.values().collect();
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));
        descriptors.into_iter()
    }
}
