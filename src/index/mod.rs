// src/index/mod.rs

//! Capability, requirement, obsoletes and file indexes
//!
//! All indexes are built in a single pass over the package arena once the
//! set's membership is final, and are dropped together when membership
//! changes. Buckets hold [`PkgId`]s sorted ascending and deduplicated, so the
//! order of candidates follows the order of the package arena.

mod file;

pub use file::{FileConflict, FileIndex};

use crate::package::{normalize_dir, split_path, Package, PkgId};
use smallvec::SmallVec;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::debug;

type Bucket = SmallVec<[PkgId; 2]>;

/// Maps a capability name to the packages carrying a record of that name
#[derive(Debug, Default, Clone)]
pub struct CapIndex {
    map: HashMap<String, Bucket>,
}

impl CapIndex {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
        }
    }

    pub fn add(&mut self, name: &str, pkg: PkgId) {
        match self.map.get_mut(name) {
            Some(bucket) => bucket.push(pkg),
            None => {
                let mut bucket = Bucket::new();
                bucket.push(pkg);
                self.map.insert(name.to_string(), bucket);
            }
        }
    }

    /// Sort and deduplicate every bucket
    pub fn finish(&mut self) {
        for bucket in self.map.values_mut() {
            bucket.sort_unstable();
            bucket.dedup();
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&[PkgId]> {
        self.map.get(name).map(|b| b.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Number of distinct names
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// All indexes of a package set
#[derive(Debug, Default, Clone)]
pub struct Indexes {
    /// Provided capabilities, including each package's own name
    pub caps: CapIndex,
    /// Requirement names (who requires X)
    pub reqs: CapIndex,
    /// Obsoletes targets (who obsoletes X)
    pub obsoletes: CapIndex,
    pub files: FileIndex,
}

impl Indexes {
    /// Build every index in one pass. When `depdirs` is given only files
    /// below those directories enter the file index.
    pub fn build(packages: &[Arc<Package>], depdirs: Option<&BTreeSet<String>>) -> Self {
        let n = packages.len();
        let mut idx = Indexes {
            caps: CapIndex::with_capacity(4 * n),
            reqs: CapIndex::with_capacity(4 * n),
            obsoletes: CapIndex::with_capacity(n / 5 + 4),
            files: FileIndex::with_capacity(512),
        };

        for (i, pkg) in packages.iter().enumerate() {
            let id = PkgId::new(i);
            if i % 1000 == 0 && i > 0 {
                debug!("Indexing: {} packages done", i);
            }

            // self capability
            idx.caps.add(pkg.name(), id);
            for cap in pkg.caps() {
                idx.caps.add(cap.name(), id);
            }
            for req in pkg.reqs() {
                idx.reqs.add(req.name(), id);
            }
            for cnfl in pkg.cnfls().iter().filter(|c| c.is_obsoletes()) {
                idx.obsoletes.add(cnfl.name(), id);
            }
            idx.files.add_package(id, pkg, depdirs);
        }

        idx.caps.finish();
        idx.reqs.finish();
        idx.obsoletes.finish();
        idx.files.finish();

        debug!(
            "Indexed {} packages: {} capabilities, {} requirement names, {} obsoletes, {} files",
            n,
            idx.caps.len(),
            idx.reqs.len(),
            idx.obsoletes.len(),
            idx.files.len()
        );
        idx
    }
}

/// Directories referenced by file requirements anywhere in the set
///
/// Each `/path` requirement contributes its parent directory, and the path
/// itself so that a directory-level fallback lookup can still succeed.
pub fn collect_depdirs(packages: &[Arc<Package>]) -> BTreeSet<String> {
    let mut depdirs = BTreeSet::new();
    for pkg in packages {
        for req in pkg.reqs().iter().filter(|r| r.is_file()) {
            let (dir, _) = split_path(req.name());
            if !dir.is_empty() {
                depdirs.insert(dir.to_string());
            }
            depdirs.insert(normalize_dir(req.name()).to_string());
        }
    }
    depdirs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capreq::Capreq;
    use crate::version::RpmVersion;

    fn pkg(name: &str, evr: &str) -> Package {
        Package::new(name, RpmVersion::parse(evr).unwrap())
    }

    #[test]
    fn test_cap_index_dedup() {
        let mut idx = CapIndex::default();
        idx.add("foo", PkgId::new(3));
        idx.add("foo", PkgId::new(1));
        idx.add("foo", PkgId::new(3));
        idx.finish();
        assert_eq!(idx.lookup("foo"), Some(&[PkgId::new(1), PkgId::new(3)][..]));
        assert_eq!(idx.lookup("bar"), None);
    }

    #[test]
    fn test_build_indexes() {
        let packages = vec![
            Arc::new(
                pkg("a", "1-1")
                    .provides(Capreq::new("liba.so.1"))
                    .requires(Capreq::new("/bin/sh"))
                    .obsoletes(Capreq::new("old-a")),
            ),
            Arc::new(pkg("bash", "5-1").file("/bin/sh").file("/usr/share/man/bash.1")),
        ];
        let depdirs = collect_depdirs(&packages);
        assert!(depdirs.contains("/bin"));
        assert!(depdirs.contains("/bin/sh"));

        let idx = Indexes::build(&packages, Some(&depdirs));
        assert_eq!(idx.caps.lookup("a"), Some(&[PkgId::new(0)][..]));
        assert_eq!(idx.caps.lookup("liba.so.1"), Some(&[PkgId::new(0)][..]));
        assert_eq!(idx.reqs.lookup("/bin/sh"), Some(&[PkgId::new(0)][..]));
        assert_eq!(idx.obsoletes.lookup("old-a"), Some(&[PkgId::new(0)][..]));
        assert_eq!(idx.files.lookup("/bin/sh"), vec![PkgId::new(1)]);
        // outside the depdirs
        assert!(idx.files.lookup("/usr/share/man/bash.1").is_empty());
    }
}
