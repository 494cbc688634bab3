//! Run context
//!
//! One context per run owns every instantiated extension, keyed by
//! capability name. Requesting a capability resolves its full requirement
//! graph first, then creates each missing unit exactly once, prerequisites
//! before dependents. Later requests for an existing name get the same
//! instance back.

use crate::dependency::DependencyResolver;
use crate::extension::{Extension, ExtensionBase};
use crate::registry::ExtensionRegistry;
use cmdfacts_core::{Error, ExtensionConfig, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

pub struct ExtensionContext {
    root: PathBuf,
    conf: Arc<ExtensionConfig>,
    registry: ExtensionRegistry,
    instances: HashMap<String, Arc<dyn Extension>>,
}

impl ExtensionContext {
    /// Create a context for a working root and run configuration
    pub fn new(root: impl Into<PathBuf>, conf: ExtensionConfig, registry: ExtensionRegistry) -> Self {
        Self {
            root: root.into(),
            conf: Arc::new(conf),
            registry,
            instances: HashMap::new(),
        }
    }

    /// Create a context with the built-in extensions
    pub fn with_builtins(root: impl Into<PathBuf>, conf: ExtensionConfig) -> Self {
        Self::new(root, conf, ExtensionRegistry::with_builtins())
    }

    /// Instantiate `name` and everything it requires
    pub fn init(&mut self, name: &str) -> Result<Arc<dyn Extension>> {
        if let Some(existing) = self.instances.get(name) {
            return Ok(Arc::clone(existing));
        }

        let order = DependencyResolver::new(&self.registry).resolve(name)?;
        let pending: Vec<_> = order
            .iter()
            .filter(|n| !self.instances.contains_key(*n))
            .collect();
        info!("Prerequisites to initialise: {:?}", &pending[..pending.len().saturating_sub(1)]);

        for ext_name in order {
            if self.instances.contains_key(&ext_name) {
                continue;
            }

            let descriptor = self.registry.resolve(&ext_name)?;
            let extensions = descriptor
                .requires
                .iter()
                .map(|r| {
                    self.instances
                        .get(r)
                        .map(|ext| (r.clone(), Arc::clone(ext)))
                        .ok_or_else(|| Error::prerequisite(&ext_name, r, "not initialised"))
                })
                .collect::<Result<HashMap<_, _>>>()?;

            let base = ExtensionBase::new(
                &ext_name,
                &self.root,
                Arc::clone(&self.conf),
                descriptor.requires.clone(),
                extensions,
            )?;
            let instance = (descriptor.factory)(base)?;
            debug!("Initialised {}", ext_name);

            self.instances.insert(ext_name, instance);
        }

        self.get(name)
            .cloned()
            .ok_or_else(|| Error::unresolved_capability(name))
    }

    /// Instantiate `name` if needed, then parse the command batch with it
    pub fn parse(&mut self, name: &str, cmds_file: &Path) -> Result<Arc<dyn Extension>> {
        let extension = self.init(name)?;
        extension.parse(cmds_file)?;
        Ok(extension)
    }

    /// Already instantiated extension
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Extension>> {
        self.instances.get(name)
    }

    /// Already instantiated extension, downcast to its concrete type
    pub fn get_as<T: Extension>(&self, name: &str) -> Option<&T> {
        self.instances.get(name)?.as_any().downcast_ref::<T>()
    }

    /// Names of instantiated extensions, sorted
    pub fn initialised(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.instances.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}
