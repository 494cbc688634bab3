//! Project fixtures
//!
//! A [`Project`] is a temporary tree with a `src/` directory of sources, a
//! `bin/` directory for scripted compilers, a `work/` root for extension
//! artifacts and a raw command batch.

#![allow(dead_code)]

use super::constants::*;
use cmdfacts_core::{ExtensionConfig, RawCommand};
use cmdfacts_extensions::ExtensionContext;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct Project {
    temp_dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir_all(temp_dir.path().join("src")).expect("Failed to create src dir");
        fs::create_dir_all(temp_dir.path().join("bin")).expect("Failed to create bin dir");
        Self { temp_dir }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn src_dir(&self) -> PathBuf {
        self.root().join("src")
    }

    pub fn work_dir(&self) -> PathBuf {
        self.root().join("work")
    }

    pub fn cmds_file(&self) -> PathBuf {
        self.root().join(CMDS_FILE)
    }

    /// Write a file under `src/`
    pub fn write_source(&self, name: &str, content: &str) -> PathBuf {
        let path = self.src_dir().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create source parent");
        }
        fs::write(&path, content).expect("Failed to write source");
        path
    }

    /// Declare the dependencies the fake compiler reports for `source`
    pub fn write_deps(&self, source: &str, deps: &[&str]) {
        let mut content = deps.join("\n");
        content.push('\n');
        self.write_source(&format!("{}.deps", source), &content);
    }

    /// Install an executable script under `bin/`
    #[cfg(unix)]
    pub fn install_script(&self, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.root().join("bin").join(name);
        fs::write(&path, body).expect("Failed to write script");
        let mut perms = fs::metadata(&path).expect("Failed to stat script").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).expect("Failed to chmod script");
        path
    }

    /// Install the scripted compiler that logs every invocation
    #[cfg(unix)]
    pub fn install_fake_cc(&self) -> PathBuf {
        let log = self.root().join(FAKE_CC_LOG);
        self.install_script(FAKE_CC, &FAKE_CC_SCRIPT.replace("@LOG@", &log.display().to_string()))
    }

    /// Argument lines the scripted compiler was run with
    pub fn invocations(&self) -> Vec<String> {
        fs::read_to_string(self.root().join(FAKE_CC_LOG))
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Raw command run in `src/` by the executable at `which`
    pub fn command(&self, id: &str, which: &Path, args: &[&str]) -> RawCommand {
        let argv0 = which
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        RawCommand {
            id: id.to_string(),
            cwd: self.src_dir(),
            which: which.display().to_string(),
            command: std::iter::once(argv0)
                .chain(args.iter().map(|a| a.to_string()))
                .collect(),
        }
    }

    /// Write the raw command batch
    pub fn write_commands(&self, cmds: &[RawCommand]) -> PathBuf {
        let lines: Vec<String> = cmds
            .iter()
            .map(|c| serde_json::to_string(c).expect("Failed to serialize command"))
            .collect();
        let path = self.cmds_file();
        fs::write(&path, lines.join("\n") + "\n").expect("Failed to write commands");
        path
    }

    /// Write raw fact files to `facts/` and return the directory
    pub fn write_facts(&self, definitions: &[&str], expansions: &[&str], typedefs: &[&str]) -> PathBuf {
        let dir = self.root().join("facts");
        fs::create_dir_all(&dir).expect("Failed to create facts dir");
        for (file, lines) in [
            ("macros-definitions.txt", definitions),
            ("macros-expansions.txt", expansions),
            ("typedefs.txt", typedefs),
        ] {
            fs::write(dir.join(file), lines.join("\n") + "\n").expect("Failed to write facts");
        }
        dir
    }

    /// Fresh context over this project's working root
    pub fn context(&self, conf: ExtensionConfig) -> ExtensionContext {
        ExtensionContext::with_builtins(self.work_dir(), conf)
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}
