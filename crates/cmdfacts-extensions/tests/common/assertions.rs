//! Assertion helpers for stored artifacts

#![allow(dead_code)]

use cmdfacts_core::CommandRecord;
use cmdfacts_extensions::Extension;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Assert that a dependency set contains every declared input
pub fn assert_deps_cover_inputs(cmd: &CommandRecord) {
    let deps = cmd
        .deps
        .as_ref()
        .unwrap_or_else(|| panic!("command {} was loaded without deps", cmd.id));

    for input in &cmd.inputs {
        assert!(
            deps.contains(input),
            "deps of command {} miss input '{}': {:?}",
            cmd.id,
            input,
            deps
        );
    }
}

/// Assert that an extension finished and left its completion record
pub fn assert_completed(ext: &dyn Extension) {
    assert!(
        ext.base().is_parsed(),
        "extension '{}' has no completion record",
        ext.name()
    );
}

/// Assert that an extension did not finish
pub fn assert_not_completed(ext: &dyn Extension) {
    assert!(
        ext.base().completion_record().is_none(),
        "extension '{}' unexpectedly completed",
        ext.name()
    );
}

/// Assert that two files have identical bytes
pub fn assert_same_bytes(a: &Path, b: &Path) {
    let left = fs::read(a).unwrap_or_else(|e| panic!("{}: {}", a.display(), e));
    let right = fs::read(b).unwrap_or_else(|e| panic!("{}: {}", b.display(), e));
    assert_eq!(left, right, "{} and {} differ", a.display(), b.display());
}

/// Collect a set of string slices
pub fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}
