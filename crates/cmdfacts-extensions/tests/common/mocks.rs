//! Mock extensions for testing
//!
//! Provides stand-ins that are registered in place of built-in capabilities
//! or as throwaway capabilities for framework tests.

#![allow(dead_code)]

use cmdfacts_core::{Error, Result};
use cmdfacts_extensions::{
    Extension, ExtensionBase, ExtensionDescriptor, ExtensionRegistry, FactSource, Lines,
};
use std::any::Any;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Shared record of parse calls, in call order
pub type ParseLog = Arc<Mutex<Vec<String>>>;

/// Extension that records when it does real work
#[derive(Debug)]
pub struct Recorder {
    base: ExtensionBase,
    log: ParseLog,
}

impl Extension for Recorder {
    fn base(&self) -> &ExtensionBase {
        &self.base
    }

    fn parse(&self, cmds_file: &Path) -> Result<()> {
        if self.base.is_parsed() {
            return Ok(());
        }

        self.base.discard_partial()?;
        self.base.parse_prerequisites(cmds_file)?;
        self.log
            .lock()
            .expect("parse log poisoned")
            .push(self.base.name().to_string());
        self.base.mark_parsed()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Register a [`Recorder`] under `name`
pub fn register_recorder(registry: &mut ExtensionRegistry, name: &str, requires: &[&str], log: &ParseLog) {
    let log = Arc::clone(log);
    registry.register(ExtensionDescriptor::new(
        name,
        requires,
        "Records parse calls",
        Box::new(move |base: ExtensionBase| -> Result<Arc<dyn Extension>> {
            Ok(Arc::new(Recorder {
                base,
                log: Arc::clone(&log),
            }))
        }),
    ));
}

/// Registry of recorders built from `(name, requires)` pairs
pub fn recorder_registry(specs: &[(&str, &[&str])], log: &ParseLog) -> ExtensionRegistry {
    let mut registry = ExtensionRegistry::new();
    for (name, requires) in specs {
        register_recorder(&mut registry, name, requires, log);
    }
    registry
}

/// In-memory fact source
#[derive(Debug)]
pub struct StaticFacts {
    base: ExtensionBase,
    definitions: Vec<String>,
    expansions: Vec<String>,
    typedefs: Vec<String>,
}

impl StaticFacts {
    fn lines(lines: &[String]) -> Lines<'_> {
        Box::new(lines.iter().map(|l| Ok::<_, Error>(l.clone())))
    }
}

impl Extension for StaticFacts {
    fn base(&self) -> &ExtensionBase {
        &self.base
    }

    fn parse(&self, _cmds_file: &Path) -> Result<()> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_fact_source(&self) -> Option<&dyn FactSource> {
        Some(self)
    }
}

impl FactSource for StaticFacts {
    fn iter_macros_definitions(&self) -> Result<Lines<'_>> {
        Ok(Self::lines(&self.definitions))
    }

    fn iter_macros_expansions(&self) -> Result<Lines<'_>> {
        Ok(Self::lines(&self.expansions))
    }

    fn iter_typedefs(&self) -> Result<Lines<'_>> {
        Ok(Self::lines(&self.typedefs))
    }
}

/// Descriptor providing `Info` from in-memory lines
pub fn static_facts(definitions: &[&str], expansions: &[&str], typedefs: &[&str]) -> ExtensionDescriptor {
    fn owned(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    let (definitions, expansions, typedefs) = (owned(definitions), owned(expansions), owned(typedefs));

    ExtensionDescriptor::new(
        "Info",
        &[],
        "In-memory facts",
        Box::new(move |base: ExtensionBase| -> Result<Arc<dyn Extension>> {
            Ok(Arc::new(StaticFacts {
                base,
                definitions: definitions.clone(),
                expansions: expansions.clone(),
                typedefs: typedefs.clone(),
            }))
        }),
    )
}
