// src/lib.rs

//! rpmgraph: capability resolution for RPM package sets
//!
//! Loads a universe of packages, resolves every requirement against the
//! capabilities, files and directories the set provides, and derives the
//! dependency graph from the answers.
//!
//! # Architecture
//!
//! - Arena: packages live in one vector and are referred to by [`PkgId`]
//! - Indexes: capability, requirement, obsoletes and file indexes are built
//!   once per setup and are read-only afterwards
//! - Verification: requirement edges, taint propagation, conflicts and
//!   install ordering are recomputed as one run and kept on the [`PkgSet`]
//!
//! ```
//! use rpmgraph::{Capreq, Package, PkgSet, PkgSetConfig, RpmVersion};
//!
//! let mut ps = PkgSet::new(PkgSetConfig::default())?;
//! ps.add(Package::new("app", RpmVersion::parse("1.0-1")?).requires(Capreq::parse("lib >= 2")?));
//! ps.add(Package::new("lib", RpmVersion::parse("2.1-1")?));
//! assert_eq!(ps.setup()?, 0);
//! # Ok::<(), rpmgraph::Error>(())
//! ```

pub mod capreq;
pub mod config;
mod error;
pub mod index;
pub mod loader;
pub mod mark;
pub mod package;
pub mod pkgset;
pub mod platform;
pub mod report;
pub mod resolver;
pub mod version;

pub use capreq::{Capreq, CapreqFlags};
pub use config::{load_config, PkgSetConfig, PlatformConfig};
pub use error::{Error, Result};
pub use loader::{load_universe, PackageRecord, Universe};
pub use mark::{mark_with_deps, MarkOutcome};
pub use package::{Package, PkgFlags, PkgId, PkgState};
pub use pkgset::PkgSet;
pub use platform::{PlatformCaps, RpmlibCaps};
pub use report::{ConflictEntry, Report};
pub use resolver::{DepGraph, Problem, UnmetKind, UnmetReq, Verification};
pub use version::{Relation, RpmVersion, VersionConstraint};
