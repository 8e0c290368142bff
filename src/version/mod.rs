// src/version/mod.rs

//! Version handling and constraint satisfaction for package dependencies
//!
//! This module provides version parsing and comparison for RPM-style versions,
//! including support for the epoch:version-release format and the relational
//! constraints carried by requirements and conflicts.
//!
//! Versions compare epoch first, then version, then release. Version and
//! release strings are compared token-wise: runs of digits compare
//! numerically, runs of letters compare lexically, a numeric run always
//! outranks an alphabetic one and `~` sorts before anything (pre-releases).

use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::fmt;

/// A parsed RPM version with epoch, version, and release components
///
/// A missing epoch (`None`) is distinct from an explicit epoch of `0` in the
/// textual form, but both compare as `0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RpmVersion {
    pub epoch: Option<u32>,
    pub version: String,
    pub release: Option<String>,
}

impl RpmVersion {
    /// Build a version from already separated components
    pub fn new(epoch: Option<u32>, version: impl Into<String>, release: Option<String>) -> Self {
        Self {
            epoch,
            version: version.into(),
            release,
        }
    }

    /// Parse an RPM version string
    ///
    /// Format: [epoch:]version[-release]
    /// Examples:
    /// - "1.2.3" → epoch=None, version="1.2.3", release=None
    /// - "2:1.2.3" → epoch=Some(2), version="1.2.3", release=None
    /// - "1.2.3-4.el8" → epoch=None, version="1.2.3", release=Some("4.el8")
    /// - ":1.0-1" → empty epoch, treated as no epoch
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidVersion(s.to_string()));
        }

        let (epoch, rest) = match s.split_once(':') {
            Some(("", rest)) => (None, rest),
            Some((e, rest)) => {
                let epoch = e
                    .parse::<u32>()
                    .map_err(|_| Error::InvalidVersion(s.to_string()))?;
                (Some(epoch), rest)
            }
            None => (None, s),
        };

        let (version, release) = match rest.split_once('-') {
            Some((v, r)) => {
                if r.is_empty() {
                    return Err(Error::InvalidVersion(s.to_string()));
                }
                (v, Some(r.to_string()))
            }
            None => (rest, None),
        };

        if version.is_empty() {
            return Err(Error::InvalidVersion(s.to_string()));
        }

        Ok(Self {
            epoch,
            version: version.to_string(),
            release,
        })
    }

    /// Epoch value used for comparison (a missing epoch counts as 0)
    pub fn epoch_value(&self) -> u32 {
        self.epoch.unwrap_or(0)
    }

    /// Total ordering: epoch, version, then release (a missing release sorts first)
    pub fn compare(&self, other: &RpmVersion) -> Ordering {
        self.epoch_value()
            .cmp(&other.epoch_value())
            .then_with(|| rpmvercmp(&self.version, &other.version))
            .then_with(|| match (&self.release, &other.release) {
                (Some(a), Some(b)) => rpmvercmp(a, b),
                (a, b) => a.is_some().cmp(&b.is_some()),
            })
    }

    /// Ordering used when matching a dependency: the release only takes part
    /// when both sides carry one
    pub fn compare_for_match(&self, other: &RpmVersion) -> Ordering {
        self.epoch_value()
            .cmp(&other.epoch_value())
            .then_with(|| rpmvercmp(&self.version, &other.version))
            .then_with(|| match (&self.release, &other.release) {
                (Some(a), Some(b)) => rpmvercmp(a, b),
                _ => Ordering::Equal,
            })
    }
}

impl fmt::Display for RpmVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(epoch) = self.epoch {
            write!(f, "{}:", epoch)?;
        }
        write!(f, "{}", self.version)?;
        if let Some(ref release) = self.release {
            write!(f, "-{}", release)?;
        }
        Ok(())
    }
}

/// Compare two version (or release) strings with the RPM segment rules
pub fn rpmvercmp(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    let one = a.as_bytes();
    let two = b.as_bytes();
    let (mut i, mut j) = (0usize, 0usize);

    let is_sep = |c: u8| !c.is_ascii_alphanumeric() && c != b'~';

    while i < one.len() || j < two.len() {
        while i < one.len() && is_sep(one[i]) {
            i += 1;
        }
        while j < two.len() && is_sep(two[j]) {
            j += 1;
        }

        let t1 = one.get(i) == Some(&b'~');
        let t2 = two.get(j) == Some(&b'~');
        if t1 || t2 {
            if !t1 {
                return Ordering::Greater;
            }
            if !t2 {
                return Ordering::Less;
            }
            i += 1;
            j += 1;
            continue;
        }

        if i >= one.len() || j >= two.len() {
            break;
        }

        let numeric = one[i].is_ascii_digit();
        let run = |s: &[u8], start: usize| {
            let mut end = start;
            while end < s.len()
                && (if numeric {
                    s[end].is_ascii_digit()
                } else {
                    s[end].is_ascii_alphabetic()
                })
            {
                end += 1;
            }
            end
        };

        let end1 = run(one, i);
        let end2 = run(two, j);
        let seg1 = &one[i..end1];
        let seg2 = &two[j..end2];

        // Segment types differ: numeric beats alpha
        if seg2.is_empty() {
            return if numeric {
                Ordering::Greater
            } else {
                Ordering::Less
            };
        }

        let ord = if numeric {
            let s1 = strip_leading_zeros(seg1);
            let s2 = strip_leading_zeros(seg2);
            s1.len().cmp(&s2.len()).then_with(|| s1.cmp(s2))
        } else {
            seg1.cmp(seg2)
        };
        if ord != Ordering::Equal {
            return ord;
        }

        i = end1;
        j = end2;
    }

    match (i >= one.len(), j >= two.len()) {
        (true, true) => Ordering::Equal,
        (false, _) => Ordering::Greater,
        (true, false) => Ordering::Less,
    }
}

fn strip_leading_zeros(seg: &[u8]) -> &[u8] {
    let start = seg.iter().position(|&c| c != b'0').unwrap_or(seg.len());
    &seg[start..]
}

/// Parse `[epoch:]version[-release]`
pub fn parse_evr(s: &str) -> Result<RpmVersion> {
    RpmVersion::parse(s)
}

/// Split `name-[epoch:]version-release` into its name and version parts
pub fn parse_nevr(s: &str) -> Result<(String, RpmVersion)> {
    let s = s.trim();
    let (head, release) = s
        .rsplit_once('-')
        .ok_or_else(|| Error::InvalidVersion(s.to_string()))?;
    let (name, version) = head
        .rsplit_once('-')
        .ok_or_else(|| Error::InvalidVersion(s.to_string()))?;

    if name.is_empty() || release.is_empty() {
        return Err(Error::InvalidVersion(s.to_string()));
    }

    let evr = RpmVersion::parse(&format!("{}-{}", version, release))?;
    Ok((name.to_string(), evr))
}

/// Relational operator set of a versioned capability: any combination of
/// equal, greater-than and less-than
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Relation(u8);

impl Relation {
    pub const EQ: Relation = Relation(1 << 0);
    pub const GT: Relation = Relation(1 << 1);
    pub const LT: Relation = Relation(1 << 2);
    pub const GE: Relation = Relation(Self::GT.0 | Self::EQ.0);
    pub const LE: Relation = Relation(Self::LT.0 | Self::EQ.0);
    pub const NE: Relation = Relation(Self::GT.0 | Self::LT.0);

    pub fn contains(self, other: Relation) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn union(self, other: Relation) -> Relation {
        Relation(self.0 | other.0)
    }

    /// Does a version comparing as `ord` against the constraint version pass?
    pub fn admits(self, ord: Ordering) -> bool {
        match ord {
            Ordering::Less => self.contains(Self::LT),
            Ordering::Equal => self.contains(Self::EQ),
            Ordering::Greater => self.contains(Self::GT),
        }
    }

    /// Parse an operator token
    pub fn parse(op: &str) -> Option<Relation> {
        match op {
            "=" | "==" => Some(Self::EQ),
            ">" => Some(Self::GT),
            "<" => Some(Self::LT),
            ">=" | "=>" => Some(Self::GE),
            "<=" | "=<" => Some(Self::LE),
            "!=" | "<>" => Some(Self::NE),
            _ => None,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.contains(Self::LT) {
            write!(f, "<")?;
        }
        if self.contains(Self::GT) {
            write!(f, ">")?;
        }
        if self.contains(Self::EQ) {
            write!(f, "=")?;
        }
        Ok(())
    }
}

/// A relational constraint on a version: `>= 1.2-3`, `= 2:4.0`, ...
///
/// The relation is never empty; an unversioned capability has no
/// constraint at all rather than an empty one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionConstraint {
    relation: Relation,
    evr: RpmVersion,
}

impl VersionConstraint {
    /// Create a constraint. Panics on an empty relation, which only a
    /// programming error can produce.
    pub fn new(relation: Relation, evr: RpmVersion) -> Self {
        assert!(
            !relation.is_empty(),
            "version constraint on {} without a relation",
            evr
        );
        Self { relation, evr }
    }

    /// Constraint pinning exactly one version
    pub fn exact(evr: RpmVersion) -> Self {
        Self::new(Relation::EQ, evr)
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    pub fn evr(&self) -> &RpmVersion {
        &self.evr
    }

    /// Parse a version constraint string
    ///
    /// Examples:
    /// - ">= 1.2.3" → GE 1.2.3
    /// - "< 2.0.0" → LT 2.0.0
    /// - "1.5.0" → EQ 1.5.0 (no operator means exact match)
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let op_len = s
            .bytes()
            .take_while(|c| matches!(c, b'<' | b'>' | b'=' | b'!'))
            .count();

        if op_len == 0 {
            return Ok(Self::exact(RpmVersion::parse(s)?));
        }

        let relation =
            Relation::parse(&s[..op_len]).ok_or_else(|| Error::InvalidVersion(s.to_string()))?;
        let evr = RpmVersion::parse(&s[op_len..])?;
        Ok(Self::new(relation, evr))
    }

    /// Check if a version satisfies this constraint
    pub fn satisfies(&self, version: &RpmVersion) -> bool {
        self.relation.admits(version.compare_for_match(&self.evr))
    }

    /// Check whether two constraints admit at least one common version
    ///
    /// Used when a provided capability is itself versioned with a relation
    /// other than a single point.
    pub fn overlaps(&self, other: &VersionConstraint) -> bool {
        let (a, b) = (self.relation, other.relation);
        match self.evr.compare_for_match(&other.evr) {
            Ordering::Less => a.contains(Relation::GT) || b.contains(Relation::LT),
            Ordering::Greater => a.contains(Relation::LT) || b.contains(Relation::GT),
            Ordering::Equal => {
                (a.contains(Relation::EQ) && b.contains(Relation::EQ))
                    || (a.contains(Relation::LT) && b.contains(Relation::LT))
                    || (a.contains(Relation::GT) && b.contains(Relation::GT))
            }
        }
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.relation, self.evr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> RpmVersion {
        RpmVersion::parse(s).unwrap()
    }

    #[test]
    fn test_rpm_version_parse_simple() {
        let v = RpmVersion::parse("1.2.3").unwrap();
        assert_eq!(v.epoch, None);
        assert_eq!(v.version, "1.2.3");
        assert_eq!(v.release, None);
    }

    #[test]
    fn test_rpm_version_parse_full() {
        let v = RpmVersion::parse("1:2.3.4-5.el8").unwrap();
        assert_eq!(v.epoch, Some(1));
        assert_eq!(v.version, "2.3.4");
        assert_eq!(v.release, Some("5.el8".to_string()));
    }

    #[test]
    fn test_rpm_version_parse_explicit_zero_epoch() {
        let v = RpmVersion::parse("0:1.0").unwrap();
        assert_eq!(v.epoch, Some(0));
        assert_eq!(v.to_string(), "0:1.0");

        let empty = RpmVersion::parse(":1.02.208-2.fc43").unwrap();
        assert_eq!(empty.epoch, None);
        assert_eq!(empty.release.as_deref(), Some("2.fc43"));
    }

    #[test]
    fn test_rpm_version_parse_rejects_garbage() {
        assert!(RpmVersion::parse("").is_err());
        assert!(RpmVersion::parse("1:").is_err());
        assert!(RpmVersion::parse("x:1.0").is_err());
        assert!(RpmVersion::parse("1.0-").is_err());
        assert!(RpmVersion::parse("-1").is_err());
    }

    #[test]
    fn test_rpmvercmp_segments() {
        assert_eq!(rpmvercmp("1.0", "1.0"), Ordering::Equal);
        assert_eq!(rpmvercmp("1.0", "1.1"), Ordering::Less);
        assert_eq!(rpmvercmp("1.10", "1.9"), Ordering::Greater);
        assert_eq!(rpmvercmp("1.001", "1.1"), Ordering::Equal);
        assert_eq!(rpmvercmp("2.0a", "2.0b"), Ordering::Less);
        // numeric outranks alpha
        assert_eq!(rpmvercmp("1.1", "1.a"), Ordering::Greater);
        assert_eq!(rpmvercmp("1.a", "1.1"), Ordering::Less);
        // extra segment wins
        assert_eq!(rpmvercmp("1.0.1", "1.0"), Ordering::Greater);
        assert_eq!(rpmvercmp("1.0", "1.0."), Ordering::Equal);
    }

    #[test]
    fn test_rpmvercmp_tilde() {
        assert_eq!(rpmvercmp("1.0~rc1", "1.0"), Ordering::Less);
        assert_eq!(rpmvercmp("1.0~rc1", "1.0~rc2"), Ordering::Less);
        assert_eq!(rpmvercmp("1.0", "1.0~beta"), Ordering::Greater);
    }

    #[test]
    fn test_rpm_version_compare_epochs() {
        // Higher epoch wins even with lower version
        assert_eq!(v("1:1.0.0").compare(&v("2.0.0")), Ordering::Greater);
        assert_eq!(v("0:1.0").compare(&v("1.0")), Ordering::Equal);
    }

    #[test]
    fn test_rpm_version_compare_releases() {
        assert_eq!(v("1.2.3-1").compare(&v("1.2.3-2")), Ordering::Less);
        assert_eq!(v("1.2.3").compare(&v("1.2.3-1")), Ordering::Less);
        assert_eq!(v("1.2.3").compare_for_match(&v("1.2.3-1")), Ordering::Equal);
    }

    #[test]
    fn test_parse_nevr() {
        let (name, evr) = parse_nevr("glibc-common-1:2.38-4.fc39").unwrap();
        assert_eq!(name, "glibc-common");
        assert_eq!(evr.epoch, Some(1));
        assert_eq!(evr.version, "2.38");
        assert_eq!(evr.release.as_deref(), Some("4.fc39"));

        assert!(parse_nevr("nodashes").is_err());
        assert!(parse_nevr("one-dash").is_err());
    }

    #[test]
    fn test_relation_display_and_parse() {
        for op in ["<", "<=", "=", ">=", ">"] {
            assert_eq!(Relation::parse(op).unwrap().to_string(), op);
        }
        assert_eq!(Relation::parse("!=").unwrap().to_string(), "<>");
        assert!(Relation::parse("~>").is_none());
    }

    #[test]
    fn test_version_constraint_satisfies() {
        let c = VersionConstraint::parse(">= 1.2.0").unwrap();
        assert!(c.satisfies(&v("1.2.0")));
        assert!(c.satisfies(&v("1.3.0")));
        assert!(!c.satisfies(&v("1.1.0")));

        let exact = VersionConstraint::parse("1.5-2").unwrap();
        assert!(exact.satisfies(&v("1.5-2")));
        assert!(!exact.satisfies(&v("1.5-3")));

        // constraint without a release ignores the candidate's release
        let norel = VersionConstraint::parse("= 1.5").unwrap();
        assert!(norel.satisfies(&v("1.5-9")));
    }

    #[test]
    fn test_version_constraint_overlaps() {
        let provided = VersionConstraint::parse("= 3.0.4-1").unwrap();
        assert!(provided.overlaps(&VersionConstraint::parse("<= 4.0").unwrap()));
        assert!(!provided.overlaps(&VersionConstraint::parse("> 4.0").unwrap()));

        let range = VersionConstraint::parse(">= 2.0").unwrap();
        assert!(range.overlaps(&VersionConstraint::parse("< 3.0").unwrap()));
        assert!(!range.overlaps(&VersionConstraint::parse("< 2.0").unwrap()));
    }

    #[test]
    #[should_panic]
    fn test_version_constraint_rejects_empty_relation() {
        let _ = VersionConstraint::new(Relation::default(), v("1.0"));
    }

    #[test]
    fn test_version_constraint_display() {
        let c = VersionConstraint::parse(">=2:1.0-1").unwrap();
        assert_eq!(c.to_string(), ">= 2:1.0-1");
    }
}
