//! Dependency resolution using topological sort with DFS

use cmdfacts_core::{Error, Result};
use std::collections::{HashMap, HashSet};

use crate::registry::ExtensionRegistry;

/// Dependency resolver using DFS-based topological sort
///
/// The whole requirement graph is known before anything is instantiated, so
/// cycles and unknown capabilities are reported up front.
pub struct DependencyResolver {
    registry: HashMap<String, Vec<String>>,
}

impl DependencyResolver {
    /// Create a new dependency resolver from an extension registry
    pub fn new(registry: &ExtensionRegistry) -> Self {
        let mut deps = HashMap::new();
        for descriptor in registry.descriptors() {
            deps.insert(descriptor.name.clone(), descriptor.requires.clone());
        }
        Self { registry: deps }
    }

    /// Resolve requirements in topological order, `extension` last
    pub fn resolve(&self, extension: &str) -> Result<Vec<String>> {
        let mut resolved = Vec::new();
        let mut seen = HashSet::new();
        let mut visiting = Vec::new();

        self.visit(extension, &mut resolved, &mut seen, &mut visiting)?;
        Ok(resolved)
    }

    /// Visit an extension node using DFS
    fn visit(
        &self,
        ext: &str,
        resolved: &mut Vec<String>,
        seen: &mut HashSet<String>,
        visiting: &mut Vec<String>,
    ) -> Result<()> {
        // Cycle detection
        if let Some(start) = visiting.iter().position(|v| v == ext) {
            let mut cycle = visiting[start..].to_vec();
            cycle.push(ext.to_string());
            return Err(Error::circular_dependency(cycle.join(" -> ")));
        }

        // Already resolved
        if seen.contains(ext) {
            return Ok(());
        }

        let deps = self
            .registry
            .get(ext)
            .ok_or_else(|| Error::unresolved_capability(ext))?;

        visiting.push(ext.to_string());

        // Visit dependencies first
        for dep in deps {
            self.visit(dep, resolved, seen, visiting)?;
        }

        visiting.pop();
        seen.insert(ext.to_string());
        resolved.push(ext.to_string());

        Ok(())
    }
}
