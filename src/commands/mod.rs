// src/commands/mod.rs
//! Command handlers for the rpmgraph CLI

mod mark;
mod query;
mod verify;

pub use mark::cmd_mark;
pub use query::{cmd_obsoletes, cmd_provides, cmd_requires};
pub use verify::{cmd_order, cmd_verify};

use anyhow::{Context, Result};
use std::path::Path;

use rpmgraph::{load_config, load_universe, PkgId, PkgSet};

/// Load the configuration and universe and set the package set up
fn open_pkgset(universe: &Path, config: Option<&Path>) -> Result<PkgSet> {
    let config = load_config(config).context("Failed to load configuration")?;
    let packages = load_universe(universe)
        .with_context(|| format!("Failed to load universe: {}", universe.display()))?;

    let mut ps = PkgSet::new(config)?;
    ps.extend(packages);
    ps.setup()?;
    Ok(ps)
}

fn print_packages(ps: &PkgSet, ids: &[PkgId]) {
    for id in ids {
        println!("{}", ps.package(*id).id());
    }
}
