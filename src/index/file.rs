// src/index/file.rs

//! File index: (directory, basename) -> owning packages

use crate::package::{normalize_dir, split_path, Package, PkgId};
use smallvec::SmallVec;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Owner {
    pkg: PkgId,
    is_dir: bool,
}

type Owners = SmallVec<[Owner; 1]>;

/// A path installed by more than one differently named package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileConflict {
    pub path: String,
    pub owners: Vec<PkgId>,
}

#[derive(Debug, Default, Clone)]
pub struct FileIndex {
    dirs: HashMap<String, HashMap<String, Owners>>,
    nfiles: usize,
}

impl FileIndex {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            dirs: HashMap::with_capacity(capacity),
            nfiles: 0,
        }
    }

    /// Index a package's file list, restricted to `depdirs` when given
    pub fn add_package(&mut self, id: PkgId, pkg: &Package, depdirs: Option<&BTreeSet<String>>) {
        for dir in pkg.files().dirs() {
            if let Some(depdirs) = depdirs {
                let own_entries_needed = depdirs.contains(&dir.dirname);
                if !own_entries_needed {
                    continue;
                }
            }

            let basenames = self.dirs.entry(dir.dirname.clone()).or_default();
            for entry in &dir.entries {
                basenames
                    .entry(entry.basename.clone())
                    .or_default()
                    .push(Owner {
                        pkg: id,
                        is_dir: entry.is_dir,
                    });
                self.nfiles += 1;
            }
        }
    }

    pub fn finish(&mut self) {
        for basenames in self.dirs.values_mut() {
            for owners in basenames.values_mut() {
                owners.sort_unstable();
                owners.dedup();
            }
        }
    }

    /// Number of indexed entries
    pub fn len(&self) -> usize {
        self.nfiles
    }

    pub fn is_empty(&self) -> bool {
        self.nfiles == 0
    }

    /// Packages installing `path` as a file
    pub fn lookup(&self, path: &str) -> Vec<PkgId> {
        self.owners(path, false)
    }

    /// Packages declaring `path` itself as one of their directories
    ///
    /// Installing something below `path` does not count.
    pub fn dir_owners(&self, path: &str) -> Vec<PkgId> {
        self.owners(normalize_dir(path), true)
    }

    fn owners(&self, path: &str, is_dir: bool) -> Vec<PkgId> {
        let (dir, base) = split_path(path);
        self.dirs
            .get(dir)
            .and_then(|basenames| basenames.get(base))
            .map(|owners| {
                owners
                    .iter()
                    .filter(|o| o.is_dir == is_dir)
                    .map(|o| o.pkg)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Paths owned (as files) by at least two packages with different names
    ///
    /// Same-name owners (multilib variants, other versions of the same
    /// package) never conflict with each other.
    pub fn conflicts(&self, packages: &[std::sync::Arc<Package>]) -> Vec<FileConflict> {
        let mut found = Vec::new();
        for (dir, basenames) in &self.dirs {
            for (base, owners) in basenames {
                let files: Vec<PkgId> = owners.iter().filter(|o| !o.is_dir).map(|o| o.pkg).collect();
                if files.len() < 2 {
                    continue;
                }
                let names: BTreeSet<&str> = files
                    .iter()
                    .map(|id| packages[id.index()].name())
                    .collect();
                if names.len() < 2 {
                    continue;
                }
                let path = if dir == "/" {
                    format!("/{}", base)
                } else {
                    format!("{}/{}", dir, base)
                };
                found.push(FileConflict { path, owners: files });
            }
        }
        found.sort_by(|a, b| a.path.cmp(&b.path));
        found
    }
}
