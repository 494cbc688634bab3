//! Extension framework
//!
//! An extension is one composable extraction stage. Each one owns a working
//! directory `<root>/<Name>` where its artifacts live, a shared run
//! configuration, the list of capabilities it requires, and the instances
//! resolved for those capabilities. Instances are created by
//! [`ExtensionContext`](crate::ExtensionContext) in dependency order, so a
//! unit's prerequisites always exist before the unit itself.

use crate::artifact::{self, CompletionRecord, COMPLETION_RECORD};
use crate::info::FactSource;
use crate::storage::ArchiveStore;
use chrono::Utc;
use cmdfacts_core::{resolve_path, Error, ExtensionConfig, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Span};

/// A composable extraction stage
pub trait Extension: Any + Send + Sync {
    /// Shared state every extension carries
    fn base(&self) -> &ExtensionBase;

    /// Process the raw command batch at `cmds_file`
    ///
    /// Implementations skip when [`ExtensionBase::is_parsed`] is true.
    /// Otherwise they call [`ExtensionBase::discard_partial`] and
    /// [`ExtensionBase::parse_prerequisites`] before doing their own work.
    fn parse(&self, cmds_file: &Path) -> Result<()>;

    /// Downcast support for loaders on concrete extension types
    fn as_any(&self) -> &dyn Any;

    /// Raw-fact source capability, if this extension provides one
    fn as_fact_source(&self) -> Option<&dyn FactSource> {
        None
    }

    /// Archival store capability, if this extension provides one
    fn as_archive(&self) -> Option<&dyn ArchiveStore> {
        None
    }

    /// Capability name
    fn name(&self) -> &str {
        self.base().name()
    }
}

impl fmt::Debug for dyn Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extension")
            .field("name", &self.name())
            .field("work_dir", &self.base().work_dir())
            .finish()
    }
}

/// State shared by every extension
pub struct ExtensionBase {
    name: String,
    work_dir: PathBuf,
    conf: Arc<ExtensionConfig>,
    requires: Vec<String>,
    extensions: HashMap<String, Arc<dyn Extension>>,
    temp_dir: PathBuf,
}

impl ExtensionBase {
    /// Create the base for extension `name` rooted at `root`
    ///
    /// `extensions` must hold an instance for every name in `requires`.
    /// A private scratch directory is created and never removed.
    pub fn new(
        name: impl Into<String>,
        root: &Path,
        conf: Arc<ExtensionConfig>,
        requires: Vec<String>,
        extensions: HashMap<String, Arc<dyn Extension>>,
    ) -> Result<Self> {
        let name = name.into();
        let work_dir = std::path::absolute(root)?.join(&name);

        if let Some(missing) = requires.iter().find(|r| !extensions.contains_key(*r)) {
            return Err(Error::prerequisite(
                &name,
                missing,
                "prerequisite was not instantiated",
            ));
        }

        let temp_dir = tempfile::Builder::new()
            .prefix(&format!("cmdfacts-{}-", name))
            .tempdir()?
            .keep();

        debug!("{}: Working directory: {}", name, work_dir.display());

        Ok(Self {
            name,
            work_dir,
            conf,
            requires,
            extensions,
            temp_dir,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn conf(&self) -> &ExtensionConfig {
        &self.conf
    }

    /// Private scratch directory
    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    /// Span that tags log lines with the extension name
    pub fn span(&self) -> Span {
        info_span!("extension", name = %self.name)
    }

    /// Resolved instance for a required capability
    pub fn extension(&self, capability: &str) -> Result<&Arc<dyn Extension>> {
        self.extensions.get(capability).ok_or_else(|| {
            Error::prerequisite(&self.name, capability, "capability is not in requires")
        })
    }

    /// Parse every directly required extension, in declaration order
    pub fn parse_prerequisites(&self, cmds_file: &Path) -> Result<()> {
        for name in &self.requires {
            self.extension(name)?.parse(cmds_file)?;
        }
        Ok(())
    }

    /// True once a previous `parse` stored all of its artifacts
    ///
    /// A working directory without a completion record is the trace of an
    /// interrupted run and does not count.
    pub fn is_parsed(&self) -> bool {
        self.work_dir.join(COMPLETION_RECORD).is_file()
    }

    /// Remove artifacts left behind by an interrupted run
    ///
    /// Must only be called once `is_parsed` returned false, so that nothing
    /// the interrupted run wrote can end up in the completed output.
    pub fn discard_partial(&self) -> Result<()> {
        if self.is_parsed() || !self.work_dir.is_dir() {
            return Ok(());
        }

        warn!(
            "{}: {} exists without a completion record, discarding it",
            self.name,
            self.work_dir.display()
        );
        fs::remove_dir_all(&self.work_dir)?;
        Ok(())
    }

    /// Atomically write the completion record
    pub fn mark_parsed(&self) -> Result<()> {
        let record = CompletionRecord {
            extension: self.name.clone(),
            completed_at: Utc::now(),
        };
        artifact::write_atomic(
            &self.work_dir.join(COMPLETION_RECORD),
            &artifact::to_sorted_pretty(&record)?,
        )?;
        info!("{}: Finish", self.name);
        Ok(())
    }

    /// Read the completion record, if any
    pub fn completion_record(&self) -> Option<CompletionRecord> {
        artifact::load_json(&self.work_dir.join(COMPLETION_RECORD)).ok()
    }

    /// Resolve `name` against the working directory unless it is absolute
    pub fn artifact_path(&self, name: impl AsRef<Path>) -> PathBuf {
        resolve_path(&self.work_dir, name)
    }

    /// Load a JSON artifact by name
    pub fn load<T: DeserializeOwned>(&self, name: impl AsRef<Path>) -> Result<T> {
        artifact::load_json(&self.artifact_path(name))
    }

    /// Store `data` as a JSON artifact by name
    pub fn store<T: Serialize + ?Sized>(&self, data: &T, name: impl AsRef<Path>) -> Result<()> {
        artifact::store_json(&self.artifact_path(name), data)
    }

    /// Store a mapping sharded by top-level key under `folder`
    pub fn store_by_key<V: Serialize>(
        &self,
        data: &BTreeMap<String, V>,
        folder: impl AsRef<Path>,
    ) -> Result<usize> {
        artifact::store_by_key(&self.artifact_path(folder), data)
    }

    /// Load a sharded mapping from `folder`, restricted to `keys` if given
    pub fn load_by_key<V: DeserializeOwned>(
        &self,
        folder: impl AsRef<Path>,
        keys: Option<&[String]>,
    ) -> Result<BTreeMap<String, V>> {
        artifact::load_by_key(&self.artifact_path(folder), keys)
    }
}

impl fmt::Debug for ExtensionBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionBase")
            .field("name", &self.name)
            .field("work_dir", &self.work_dir)
            .field("requires", &self.requires)
            .field("temp_dir", &self.temp_dir)
            .finish()
    }
}
