//! File archival store
//!
//! `Storage` keeps copies of source files that extraction stages consider
//! worth preserving (for example every dependency of a compilation), laid out
//! under its working directory by their absolute source path.

use crate::extension::{Extension, ExtensionBase};
use cmdfacts_core::{Error, Result};
use std::any::Any;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Archival store capability
pub trait ArchiveStore {
    /// Preserve the file at the absolute path `path`
    fn add(&self, path: &Path) -> Result<()>;
}

#[derive(Debug)]
pub struct Storage {
    base: ExtensionBase,
}

impl Storage {
    pub fn new(base: ExtensionBase) -> Result<Self> {
        Ok(Self { base })
    }

    /// Location of the archived copy of `path`
    ///
    /// `..` components map to `__` so that distinct sources never share a
    /// copy and nothing lands outside the store.
    pub fn storage_path(&self, path: &Path) -> PathBuf {
        let mut dest = self.base.work_dir().to_path_buf();
        for component in path.components() {
            match component {
                Component::Normal(part) => dest.push(part),
                Component::ParentDir => dest.push("__"),
                Component::RootDir | Component::CurDir | Component::Prefix(_) => {}
            }
        }
        dest
    }
}

impl Extension for Storage {
    fn base(&self) -> &ExtensionBase {
        &self.base
    }

    /// Nothing to extract; files arrive through [`ArchiveStore::add`]
    fn parse(&self, _cmds_file: &Path) -> Result<()> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_archive(&self) -> Option<&dyn ArchiveStore> {
        Some(self)
    }
}

impl ArchiveStore for Storage {
    fn add(&self, path: &Path) -> Result<()> {
        if !path.is_file() {
            debug!("Skip archiving {}: not a regular file", path.display());
            return Ok(());
        }

        let dest = self.storage_path(path);
        if dest.exists() {
            return Ok(());
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(path, &dest)?;
        debug!("Archived {}", path.display());
        Ok(())
    }
}

/// Look up the archival store among an extension's prerequisites
pub(crate) fn archive<'a>(base: &'a ExtensionBase, capability: &str) -> Result<&'a dyn ArchiveStore> {
    base.extension(capability)?
        .as_archive()
        .ok_or_else(|| Error::prerequisite(base.name(), capability, "not an archival store"))
}
