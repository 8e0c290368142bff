// src/platform.rs

//! Capabilities the package manager provides on its own
//!
//! `rpmlib(...)` features and any extra names configured by the user are
//! satisfied without a providing package and without a graph edge.

use crate::capreq::Capreq;
use crate::error::Result;
use crate::version::{Relation, RpmVersion};

/// Oracle for implicitly provided capabilities
pub trait PlatformCaps {
    /// Is `req` satisfied by the platform itself?
    fn provides_builtin(&self, req: &Capreq) -> bool;

    /// The built-in capability list
    fn caps(&self) -> &[Capreq];
}

/// Feature capabilities of a current rpm, as `(name, version-release)`
const RPMLIB_FEATURES: &[(&str, &str)] = &[
    ("rpmlib(BuiltinLuaScripts)", "4.2.2-1"),
    ("rpmlib(CaretInVersions)", "4.15.0-1"),
    ("rpmlib(CompressedFileNames)", "3.0.4-1"),
    ("rpmlib(ConcurrentAccess)", "4.1-1"),
    ("rpmlib(DynamicBuildRequires)", "4.15.0-1"),
    ("rpmlib(ExplicitPackageProvide)", "4.0-1"),
    ("rpmlib(FileCaps)", "4.6.1-1"),
    ("rpmlib(FileDigests)", "4.6.0-1"),
    ("rpmlib(HeaderLoadSortsTags)", "4.0.1-1"),
    ("rpmlib(LargeFiles)", "4.12.0-1"),
    ("rpmlib(PartialHardlinkSets)", "4.0.4-1"),
    ("rpmlib(PayloadFilesHavePrefix)", "4.0-1"),
    ("rpmlib(PayloadIsBzip2)", "3.0.5-1"),
    ("rpmlib(PayloadIsLzma)", "4.4.6-1"),
    ("rpmlib(PayloadIsXz)", "5.2-1"),
    ("rpmlib(PayloadIsZstd)", "5.4.18-1"),
    ("rpmlib(RichDependencies)", "4.12.0-1"),
    ("rpmlib(ScriptletExpansion)", "4.9.0-1"),
    ("rpmlib(ScriptletInterpreterArgs)", "4.0.3-1"),
    ("rpmlib(TildeInVersions)", "4.10.0-1"),
    ("rpmlib(VersionedDependencies)", "3.0.3-1"),
];

/// Built-in capabilities kept sorted by name
///
/// An empty list means no information: every requirement asked about is
/// assumed to be provided.
#[derive(Debug, Clone, Default)]
pub struct RpmlibCaps {
    caps: Vec<Capreq>,
}

impl RpmlibCaps {
    /// No built-in list at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// The stock `rpmlib(...)` feature list
    pub fn stock() -> Self {
        let caps = RPMLIB_FEATURES
            .iter()
            .filter_map(|(name, evr)| {
                RpmVersion::parse(evr)
                    .ok()
                    .map(|evr| Capreq::versioned(*name, Relation::EQ, evr))
            })
            .collect();
        Self::from_caps(caps)
    }

    pub fn from_caps(mut caps: Vec<Capreq>) -> Self {
        caps.sort_by(|a, b| a.cmp_name_evr(b));
        caps.dedup();
        Self { caps }
    }

    /// Build from configuration: optionally the stock list, plus extra
    /// capabilities in text form
    pub fn from_config(rpmlib_defaults: bool, extra: &[String]) -> Result<Self> {
        let mut caps = if rpmlib_defaults {
            Self::stock().caps
        } else {
            Vec::new()
        };
        for s in extra {
            caps.push(Capreq::parse(s)?);
        }
        Ok(Self::from_caps(caps))
    }

    pub fn len(&self) -> usize {
        self.caps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caps.is_empty()
    }
}

impl PlatformCaps for RpmlibCaps {
    fn provides_builtin(&self, req: &Capreq) -> bool {
        if self.caps.is_empty() {
            return true;
        }

        let start = self.caps.partition_point(|c| c.name() < req.name());
        self.caps[start..]
            .iter()
            .take_while(|c| c.name() == req.name())
            .any(|cap| req.is_satisfied_by(cap, true))
    }

    fn caps(&self) -> &[Capreq] {
        &self.caps
    }
}
