// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use rpmgraph::{Capreq, Package, PkgId, PkgSet, PkgSetConfig, RpmVersion};
use tempfile::TempDir;

/// Package `name` at `evr` ("[E:]V[-R]")
pub fn pkg(name: &str, evr: &str) -> Package {
    Package::new(name, RpmVersion::parse(evr).unwrap())
}

/// Parse a capability string, panicking on bad test input
pub fn cap(s: &str) -> Capreq {
    Capreq::parse(s).unwrap()
}

/// Set up a package set with the default configuration
pub fn setup(packages: Vec<Package>) -> PkgSet {
    setup_with(PkgSetConfig::default(), packages)
}

pub fn setup_with(config: PkgSetConfig, packages: Vec<Package>) -> PkgSet {
    let mut ps = PkgSet::new(config).unwrap();
    ps.extend(packages);
    ps.setup().unwrap();
    ps
}

/// Look up a package by name, nevr or full id
pub fn id(ps: &PkgSet, spec: &str) -> PkgId {
    ps.lookup_package(spec)
        .unwrap_or_else(|_| panic!("no package {}", spec))
}

/// Full ids of `ids`, for readable assertions
pub fn names(ps: &PkgSet, ids: &[PkgId]) -> Vec<String> {
    ids.iter().map(|id| ps.package(*id).id()).collect()
}

/// Write `content` to `file_name` inside a fresh temporary directory.
///
/// Returns (TempDir, path) - keep the TempDir alive to prevent cleanup.
pub fn write_temp(file_name: &str, content: &str) -> (TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(file_name);
    std::fs::write(&path, content).unwrap();
    (dir, path)
}
