// src/capreq.rs

//! Capabilities, requirements and conflicts
//!
//! A [`Capreq`] is the single record type behind all three: a name, an
//! optional version constraint and a small set of semantic flags. Names
//! starting with `/` are file-path capabilities.
//!
//! The canonical text form is `name[ op [epoch:]version[-release]]`, e.g.
//! `libfoo.so.1`, `glibc >= 2.38-4`. It is used for diagnostics and as the
//! key of the requirement cache.

use crate::error::{Error, Result};
use crate::version::{Relation, RpmVersion, VersionConstraint};
use std::cmp::Ordering;
use std::fmt;
use std::ops::BitOr;

/// Semantic flags of a capability record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CapreqFlags(u8);

impl CapreqFlags {
    pub const NONE: CapreqFlags = CapreqFlags(0);
    /// Conflict record
    pub const CONFLICT: CapreqFlags = CapreqFlags(1 << 0);
    /// Requires(pre): constrains install ordering
    pub const PREREQ: CapreqFlags = CapreqFlags(1 << 1);
    /// Requires(preun): constrains removal ordering
    pub const PREREQ_UN: CapreqFlags = CapreqFlags(1 << 2);
    /// `rpmlib(...)` feature requirement
    pub const RPMLIB: CapreqFlags = CapreqFlags(1 << 3);
    /// Directory requirement
    pub const DIR: CapreqFlags = CapreqFlags(1 << 4);
    /// Synthesized by the resolver, not declared by a package
    pub const BASTARD: CapreqFlags = CapreqFlags(1 << 5);
    /// Obsoletes record (always together with `CONFLICT`)
    pub const OBSOLETES: CapreqFlags = CapreqFlags(1 << 6);

    pub fn contains(self, other: CapreqFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: CapreqFlags) {
        self.0 |= other.0;
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for CapreqFlags {
    type Output = CapreqFlags;

    fn bitor(self, rhs: CapreqFlags) -> CapreqFlags {
        CapreqFlags(self.0 | rhs.0)
    }
}

/// A named capability with an optional version constraint
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Capreq {
    name: String,
    constraint: Option<VersionConstraint>,
    flags: CapreqFlags,
}

impl Capreq {
    /// Unversioned capability
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_constraint(name, None, CapreqFlags::NONE)
    }

    /// Versioned capability
    pub fn versioned(name: impl Into<String>, relation: Relation, evr: RpmVersion) -> Self {
        Self::with_constraint(
            name,
            Some(VersionConstraint::new(relation, evr)),
            CapreqFlags::NONE,
        )
    }

    /// Build from parts. Panics on an empty name.
    pub fn with_constraint(
        name: impl Into<String>,
        constraint: Option<VersionConstraint>,
        flags: CapreqFlags,
    ) -> Self {
        let name = name.into();
        assert!(!name.is_empty(), "capability without a name");

        let mut flags = flags;
        if name.starts_with("rpmlib(") {
            flags.insert(CapreqFlags::RPMLIB);
        }

        Self {
            name,
            constraint,
            flags,
        }
    }

    /// Parse the canonical text form: `name`, `name op evr` or `name op evr`
    /// without spaces around the operator
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::malformed(s, "empty capability"));
        }

        let op_start = s.find(['<', '>', '=', '!']);
        let Some(op_start) = op_start else {
            if s.contains(char::is_whitespace) {
                return Err(Error::malformed(s, "whitespace in unversioned name"));
            }
            return Ok(Self::new(s));
        };

        let name = s[..op_start].trim();
        if name.is_empty() {
            return Err(Error::malformed(s, "missing name"));
        }
        if name.contains(char::is_whitespace) {
            return Err(Error::malformed(s, "whitespace in name"));
        }

        let constraint = VersionConstraint::parse(&s[op_start..])
            .map_err(|e| Error::malformed(s, e.to_string()))?;

        Ok(Self::with_constraint(
            name,
            Some(constraint),
            CapreqFlags::NONE,
        ))
    }

    /// Builder-style flag addition
    pub fn with_flags(mut self, flags: CapreqFlags) -> Self {
        self.flags.insert(flags);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn constraint(&self) -> Option<&VersionConstraint> {
        self.constraint.as_ref()
    }

    pub fn evr(&self) -> Option<&RpmVersion> {
        self.constraint.as_ref().map(|c| c.evr())
    }

    pub fn flags(&self) -> CapreqFlags {
        self.flags
    }

    pub fn is_versioned(&self) -> bool {
        self.constraint.is_some()
    }

    pub fn is_file(&self) -> bool {
        self.name.starts_with('/')
    }

    pub fn is_conflict(&self) -> bool {
        self.flags.contains(CapreqFlags::CONFLICT)
    }

    pub fn is_obsoletes(&self) -> bool {
        self.flags.contains(CapreqFlags::OBSOLETES)
    }

    pub fn is_prereq(&self) -> bool {
        self.flags.contains(CapreqFlags::PREREQ)
    }

    pub fn is_prereq_un(&self) -> bool {
        self.flags.contains(CapreqFlags::PREREQ_UN)
    }

    pub fn is_rpmlib(&self) -> bool {
        self.flags.contains(CapreqFlags::RPMLIB)
    }

    pub fn is_dir(&self) -> bool {
        self.flags.contains(CapreqFlags::DIR)
    }

    pub fn is_bastard(&self) -> bool {
        self.flags.contains(CapreqFlags::BASTARD)
    }

    /// Does a provided capability satisfy this requirement?
    ///
    /// Unversioned requirements are satisfied by any capability of the same
    /// name. An unversioned capability satisfies a versioned requirement
    /// only when `strict` is off.
    pub fn is_satisfied_by(&self, cap: &Capreq, strict: bool) -> bool {
        if self.name != cap.name {
            return false;
        }
        match (&self.constraint, &cap.constraint) {
            (None, _) => true,
            (Some(_), None) => !strict,
            (Some(req), Some(provided)) => provided.overlaps(req),
        }
    }

    /// Order by name only
    pub fn cmp_name(&self, other: &Capreq) -> Ordering {
        self.name.cmp(&other.name)
    }

    /// Order by name, then version (unversioned first), then relation
    pub fn cmp_name_evr(&self, other: &Capreq) -> Ordering {
        self.cmp_name(other)
            .then_with(|| match (&self.constraint, &other.constraint) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(a), Some(b)) => a.evr().compare(b.evr()),
            })
    }
}

impl fmt::Display for Capreq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.constraint {
            Some(c) => write!(f, "{} {}", self.name, c),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Is `name` part of the package manager's own `rpmlib(...)` namespace?
pub fn is_rpmlib_name(name: &str) -> bool {
    name.starts_with("rpmlib(")
}
