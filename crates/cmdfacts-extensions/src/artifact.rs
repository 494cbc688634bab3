//! Artifact persistence
//!
//! Every artifact is a JSON document written with sorted keys and a
//! four-space indent so that two runs over the same input produce
//! byte-identical files. Fact mappings are sharded one document per
//! top-level key; each shard stores `{key: value}` so the exact key survives
//! the trip through the filesystem.

use chrono::{DateTime, Utc};
use cmdfacts_core::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;
use walkdir::WalkDir;

/// File name of the completion record inside an extension's working directory
pub const COMPLETION_RECORD: &str = ".complete.json";

/// Written atomically once an extension has stored all of its artifacts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionRecord {
    pub extension: String,
    pub completed_at: DateTime<Utc>,
}

/// Read and parse a JSON artifact
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.is_file() {
        return Err(Error::not_found(path.display().to_string()));
    }

    debug!("Load {}", path.display());
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Serialize `data` deterministically and write it, creating parent directories
pub fn store_json<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    debug!("Dump {}", path.display());
    fs::write(path, to_sorted_pretty(data)?)?;
    Ok(())
}

/// Render `data` as sorted-key JSON with a four-space indent
pub fn to_sorted_pretty<T: Serialize + ?Sized>(data: &T) -> Result<Vec<u8>> {
    // serde_json::Value keeps object keys in a BTreeMap, so the detour sorts
    // struct fields as well as map keys.
    let value = serde_json::to_value(data)?;

    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Write `bytes` to `path` through a temporary file in the same directory
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| Error::not_found(path.display().to_string()))?;
    fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

/// Store a mapping sharded by top-level key under `dir`
///
/// Returns the number of shard files written.
pub fn store_by_key<V: Serialize>(dir: &Path, data: &BTreeMap<String, V>) -> Result<usize> {
    // Distinct keys may share a shard path ("a.h" and "/a.h"); group them so
    // neither overwrites the other.
    let mut shards: BTreeMap<PathBuf, BTreeMap<&str, &V>> = BTreeMap::new();
    for (key, value) in data {
        shards
            .entry(shard_path(dir, key))
            .or_default()
            .insert(key.as_str(), value);
    }

    for (path, shard) in &shards {
        store_json(path, shard)?;
    }

    Ok(shards.len())
}

/// Load a sharded mapping from `dir`
///
/// With `keys`, only those keys are loaded and keys without a shard are
/// absent from the result. Without `keys`, every shard under `dir` is merged;
/// a missing `dir` yields an empty mapping.
pub fn load_by_key<V: DeserializeOwned>(
    dir: &Path,
    keys: Option<&[String]>,
) -> Result<BTreeMap<String, V>> {
    let mut data = BTreeMap::new();

    match keys {
        Some(keys) => {
            for key in keys {
                let path = shard_path(dir, key);
                if !path.is_file() {
                    debug!("No shard for '{}'", key);
                    continue;
                }

                let mut shard: BTreeMap<String, V> = load_json(&path)?;
                if let Some(value) = shard.remove(key) {
                    data.insert(key.clone(), value);
                }
            }
        }
        None => {
            if !dir.is_dir() {
                return Ok(data);
            }

            for entry in WalkDir::new(dir).sort_by_file_name() {
                let entry = entry.map_err(|e| Error::Io(e.into()))?;
                let path = entry.path();
                if entry.file_type().is_file() && path.extension().is_some_and(|e| e == "json") {
                    let shard: BTreeMap<String, V> = load_json(path)?;
                    data.extend(shard);
                }
            }
        }
    }

    Ok(data)
}

/// Map a key (usually a file path) to its shard location under `dir`
///
/// Root and `.` components are dropped and `..` is renamed so that no key
/// can place a shard outside `dir`.
pub fn shard_path(dir: &Path, key: &str) -> PathBuf {
    let mut path = dir.to_path_buf();
    let mut pushed = false;

    for component in Path::new(key).components() {
        match component {
            Component::Normal(part) => {
                path.push(part);
                pushed = true;
            }
            Component::ParentDir => {
                path.push("__");
                pushed = true;
            }
            Component::RootDir | Component::CurDir | Component::Prefix(_) => {}
        }
    }

    if !pushed {
        path.push("_");
    }

    let mut file_name = path.into_os_string();
    file_name.push(".json");
    PathBuf::from(file_name)
}
