// src/loader.rs

//! Package universe files
//!
//! A universe is a list of package records in JSON or TOML:
//!
//! ```toml
//! [[packages]]
//! name = "bash"
//! version = "5.2.26"
//! release = "3.fc40"
//! arch = "x86_64"
//! provides = ["/bin/sh"]
//! requires = ["libc.so.6", "libtinfo.so.6"]
//! requires_pre = ["filesystem >= 3"]
//! files = ["/usr/bin/bash", "/usr/share/doc/bash/"]
//! ```
//!
//! Paths ending in `/` are directory entries.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::capreq::{Capreq, CapreqFlags};
use crate::error::{Error, Result};
use crate::package::Package;
use crate::version::RpmVersion;

/// A package as described in a universe file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackageRecord {
    pub name: String,
    pub epoch: Option<u32>,
    pub version: String,
    pub release: Option<String>,
    pub arch: Option<String>,
    pub provides: Vec<String>,
    pub requires: Vec<String>,
    /// Requires(pre): also constrain install ordering
    pub requires_pre: Vec<String>,
    /// Requires(preun): also constrain removal ordering
    pub requires_preun: Vec<String>,
    pub conflicts: Vec<String>,
    pub obsoletes: Vec<String>,
    pub files: Vec<String>,
}

/// Top-level universe document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Universe {
    #[serde(default, alias = "package")]
    pub packages: Vec<PackageRecord>,
}

impl PackageRecord {
    fn invalid(&self, reason: impl Into<String>) -> Error {
        let package = if self.name.is_empty() {
            "<unnamed>".to_string()
        } else {
            self.name.clone()
        };
        Error::InvalidPackage {
            package,
            reason: reason.into(),
        }
    }

    fn capreq(&self, field: &str, s: &str, flags: CapreqFlags) -> Result<Capreq> {
        let cap = Capreq::parse(s).map_err(|e| self.invalid(format!("{}: {}", field, e)))?;
        let mut flags = flags;
        if cap.is_file() && cap.name().len() > 1 && cap.name().ends_with('/') {
            flags.insert(CapreqFlags::DIR);
        }
        Ok(cap.with_flags(flags))
    }

    /// Convert into a [`Package`], validating every field
    pub fn into_package(self) -> Result<Package> {
        if self.name.trim().is_empty() {
            return Err(self.invalid("missing name"));
        }
        if self.name.contains(char::is_whitespace) {
            return Err(self.invalid("whitespace in name"));
        }
        if self.version.is_empty() || self.version.contains('-') {
            return Err(self.invalid(format!("invalid version '{}'", self.version)));
        }
        if matches!(&self.release, Some(r) if r.is_empty() || r.contains('-')) {
            return Err(self.invalid("invalid release"));
        }

        let evr = RpmVersion::new(self.epoch, self.version.clone(), self.release.clone());
        let mut pkg = Package::new(self.name.clone(), evr);
        if let Some(arch) = &self.arch {
            pkg = pkg.with_arch(arch.clone());
        }

        for s in &self.provides {
            pkg = pkg.provides(self.capreq("provides", s, CapreqFlags::NONE)?);
        }
        for s in &self.requires {
            pkg = pkg.requires(self.capreq("requires", s, CapreqFlags::NONE)?);
        }
        for s in &self.requires_pre {
            pkg = pkg.requires(self.capreq("requires_pre", s, CapreqFlags::PREREQ)?);
        }
        for s in &self.requires_preun {
            pkg = pkg.requires(self.capreq("requires_preun", s, CapreqFlags::PREREQ_UN)?);
        }
        for s in &self.conflicts {
            pkg = pkg.conflicts(self.capreq("conflicts", s, CapreqFlags::NONE)?);
        }
        for s in &self.obsoletes {
            pkg = pkg.obsoletes(self.capreq("obsoletes", s, CapreqFlags::NONE)?);
        }
        for path in &self.files {
            if !path.starts_with('/') {
                return Err(self.invalid(format!("relative path '{}'", path)));
            }
            pkg = pkg.file(path);
        }

        Ok(pkg)
    }
}

impl Universe {
    pub fn into_packages(self) -> Result<Vec<Package>> {
        self.packages
            .into_iter()
            .map(PackageRecord::into_package)
            .collect()
    }
}

/// Parse a JSON universe
pub fn parse_universe_json(content: &str) -> Result<Vec<Package>> {
    let universe: Universe = serde_json::from_str(content)?;
    universe.into_packages()
}

/// Parse a TOML universe
pub fn parse_universe_toml(content: &str) -> Result<Vec<Package>> {
    let universe: Universe = toml::from_str(content)?;
    universe.into_packages()
}

/// Load a universe file; `.toml` files are TOML, anything else JSON
pub fn load_universe(path: &Path) -> Result<Vec<Package>> {
    let content = std::fs::read_to_string(path)?;
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let packages = if is_toml {
        parse_universe_toml(&content)?
    } else {
        parse_universe_json(&content)?
    };
    debug!("Loaded {} packages from {}", packages.len(), path.display());
    Ok(packages)
}
