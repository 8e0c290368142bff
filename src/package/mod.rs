// src/package/mod.rs

//! Package entities
//!
//! A [`Package`] is immutable once built: identity (name, EVR, arch) plus the
//! unordered capability, requirement and conflict arrays handed over by the
//! loader. Everything the resolver derives about a package (edges, taint,
//! marks) lives in the owning [`crate::PkgSet`], indexed by [`PkgId`].

mod files;
mod state;

pub use files::{FileDir, FileEntry, FileList, normalize_dir, split_path};
pub use state::{PkgFlags, PkgState};

use crate::capreq::{Capreq, CapreqFlags};
use crate::version::{RpmVersion, VersionConstraint};
use std::cmp::Ordering;
use std::fmt;

/// Stable index of a package inside a package set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PkgId(u32);

impl PkgId {
    pub fn new(index: usize) -> Self {
        Self(u32::try_from(index).expect("package set exceeds u32::MAX packages"))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PkgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A package: identity plus declared capabilities, requirements and conflicts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    name: String,
    evr: RpmVersion,
    arch: Option<String>,
    caps: Vec<Capreq>,
    reqs: Vec<Capreq>,
    cnfls: Vec<Capreq>,
    files: FileList,
}

impl Package {
    pub fn new(name: impl Into<String>, evr: RpmVersion) -> Self {
        Self {
            name: name.into(),
            evr,
            arch: None,
            caps: Vec::new(),
            reqs: Vec::new(),
            cnfls: Vec::new(),
            files: FileList::new(),
        }
    }

    pub fn with_arch(mut self, arch: impl Into<String>) -> Self {
        self.arch = Some(arch.into());
        self
    }

    /// Add a provided capability
    pub fn provides(mut self, cap: Capreq) -> Self {
        self.caps.push(cap);
        self
    }

    /// Add a requirement
    pub fn requires(mut self, req: Capreq) -> Self {
        self.reqs.push(req);
        self
    }

    /// Add a conflict
    pub fn conflicts(mut self, cnfl: Capreq) -> Self {
        self.cnfls.push(cnfl.with_flags(CapreqFlags::CONFLICT));
        self
    }

    /// Add an obsoletes record (stored with the conflicts)
    pub fn obsoletes(mut self, obsl: Capreq) -> Self {
        self.cnfls
            .push(obsl.with_flags(CapreqFlags::CONFLICT | CapreqFlags::OBSOLETES));
        self
    }

    /// Add an installed path (a trailing `/` marks a directory)
    pub fn file(mut self, path: &str) -> Self {
        self.files.add(path);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn evr(&self) -> &RpmVersion {
        &self.evr
    }

    pub fn arch(&self) -> Option<&str> {
        self.arch.as_deref()
    }

    pub fn caps(&self) -> &[Capreq] {
        &self.caps
    }

    pub fn reqs(&self) -> &[Capreq] {
        &self.reqs
    }

    pub fn cnfls(&self) -> &[Capreq] {
        &self.cnfls
    }

    pub fn files(&self) -> &FileList {
        &self.files
    }

    /// `name-[epoch:]version-release`
    pub fn nevr(&self) -> String {
        format!("{}-{}", self.name, self.evr)
    }

    /// `name-[epoch:]version-release[.arch]`, the identity used in reports
    pub fn id(&self) -> String {
        match &self.arch {
            Some(arch) => format!("{}-{}.{}", self.name, self.evr, arch),
            None => self.nevr(),
        }
    }

    /// The implicit `name = EVR` capability every package provides
    pub fn self_cap(&self) -> Capreq {
        Capreq::with_constraint(
            self.name.clone(),
            Some(VersionConstraint::exact(self.evr.clone())),
            CapreqFlags::NONE,
        )
    }

    /// Does this package satisfy `req`, looking at its own name-EVR and its
    /// declared capabilities only (files are not consulted)?
    pub fn matches_req(&self, req: &Capreq, strict: bool) -> bool {
        if self.name == req.name() {
            match req.constraint() {
                None => return true,
                Some(c) if c.satisfies(&self.evr) => return true,
                Some(_) => {}
            }
        }
        self.caps.iter().any(|cap| req.is_satisfied_by(cap, strict))
    }

    pub fn cmp_name(&self, other: &Package) -> Ordering {
        self.name.cmp(&other.name)
    }

    pub fn cmp_evr(&self, other: &Package) -> Ordering {
        self.evr.compare(&other.evr)
    }

    /// Name ascending, then EVR ascending
    pub fn cmp_name_evr(&self, other: &Package) -> Ordering {
        self.cmp_name(other).then_with(|| self.cmp_evr(other))
    }

    /// Name ascending, then EVR descending (newest first), then arch
    pub fn cmp_name_evr_rev(&self, other: &Package) -> Ordering {
        self.cmp_name(other)
            .then_with(|| other.cmp_evr(self))
            .then_with(|| self.arch.cmp(&other.arch))
    }

    pub fn same_arch(&self, other: &Package) -> bool {
        self.arch == other.arch
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pkg(name: &str, evr: &str) -> Package {
        Package::new(name, RpmVersion::parse(evr).unwrap())
    }

    #[test]
    fn test_identity() {
        let p = pkg("bash", "5.2.15-3").with_arch("x86_64");
        assert_eq!(p.nevr(), "bash-5.2.15-3");
        assert_eq!(p.id(), "bash-5.2.15-3.x86_64");
        assert_eq!(p.self_cap().to_string(), "bash = 5.2.15-3");
    }

    #[test]
    fn test_matches_req_self_and_caps() {
        let p = pkg("openssl-libs", "1:3.1.1-4")
            .provides(Capreq::new("libssl.so.3"))
            .provides(Capreq::parse("openssl-compat = 3.1").unwrap());

        assert!(p.matches_req(&Capreq::parse("openssl-libs >= 1:3.0").unwrap(), true));
        assert!(p.matches_req(&Capreq::parse("openssl-libs >= 3.0").unwrap(), true));
        assert!(!p.matches_req(&Capreq::parse("openssl-libs < 1:3.0").unwrap(), true));
        assert!(p.matches_req(&Capreq::new("libssl.so.3"), true));
        assert!(p.matches_req(&Capreq::parse("openssl-compat < 4").unwrap(), true));
        assert!(!p.matches_req(&Capreq::parse("openssl-compat > 3.1").unwrap(), true));
        // versioned requirement against an unversioned capability
        assert!(!p.matches_req(&Capreq::parse("libssl.so.3 >= 1").unwrap(), true));
        assert!(p.matches_req(&Capreq::parse("libssl.so.3 >= 1").unwrap(), false));
    }

    #[test]
    fn test_conflicts_and_obsoletes_flags() {
        let p = pkg("a", "1-1")
            .conflicts(Capreq::new("b"))
            .obsoletes(Capreq::new("c"));
        assert!(p.cnfls()[0].is_conflict());
        assert!(!p.cnfls()[0].is_obsoletes());
        assert!(p.cnfls()[1].is_conflict());
        assert!(p.cnfls()[1].is_obsoletes());
    }

    #[test]
    fn test_ordering() {
        let a1 = pkg("a", "1-1");
        let a2 = pkg("a", "2-1");
        let b = pkg("b", "0.1-1");
        assert_eq!(a1.cmp_name_evr(&a2), Ordering::Less);
        assert_eq!(a1.cmp_name_evr_rev(&a2), Ordering::Greater);
        assert_eq!(a2.cmp_name_evr_rev(&b), Ordering::Less);
    }
}
