// src/commands/query.rs
//! Index queries

use anyhow::{Context, Result};
use std::path::Path;

use rpmgraph::Capreq;

use super::{open_pkgset, print_packages};

/// List providers of a capability
///
/// A versioned capability goes through the full resolver and lists only
/// matching providers, best first.
pub fn cmd_provides(universe: &Path, config: Option<&Path>, capability: &str) -> Result<()> {
    let req = Capreq::parse(capability)
        .with_context(|| format!("Invalid capability: {}", capability))?;
    let ps = open_pkgset(universe, config)?;

    let ids = if req.is_versioned() {
        ps.match_req(&req)?
    } else {
        ps.what_provides(req.name())?
    };

    if ids.is_empty() {
        println!("{} is provided by the platform or by no package", req);
    }
    print_packages(&ps, &ids);
    Ok(())
}

/// List packages requiring a capability
pub fn cmd_requires(universe: &Path, config: Option<&Path>, name: &str) -> Result<()> {
    let ps = open_pkgset(universe, config)?;
    let ids = ps.what_requires(name)?;
    if ids.is_empty() {
        println!("No package requires {}", name);
    }
    print_packages(&ps, &ids);
    Ok(())
}

/// List packages obsoleting a capability
pub fn cmd_obsoletes(universe: &Path, config: Option<&Path>, name: &str) -> Result<()> {
    let ps = open_pkgset(universe, config)?;
    let ids = ps.what_obsoletes(name)?;
    if ids.is_empty() {
        println!("No package obsoletes {}", name);
    }
    print_packages(&ps, &ids);
    Ok(())
}
