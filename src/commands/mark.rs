// src/commands/mark.rs
//! Selecting packages for installation

use anyhow::Result;
use std::path::Path;

use rpmgraph::mark::{dependents_closure, mark_with_deps};
use rpmgraph::PkgId;

use super::{open_pkgset, print_packages};

/// Mark `packages` and their dependencies, then print the selection in
/// install order
pub fn cmd_mark(
    universe: &Path,
    config: Option<&Path>,
    packages: &[String],
    dependents: bool,
) -> Result<()> {
    let mut ps = open_pkgset(universe, config)?;

    let selection = packages
        .iter()
        .map(|spec| ps.lookup_package(spec))
        .collect::<rpmgraph::Result<Vec<PkgId>>>()?;

    let outcome = mark_with_deps(&mut ps, &selection)?;
    println!(
        "Selected {} packages, {} pulled in as dependencies",
        outcome.hand_marked.len(),
        outcome.dep_marked.len()
    );

    let order: Vec<PkgId> = ps
        .ordered()?
        .iter()
        .copied()
        .filter(|id| ps.state(*id).is_marked())
        .collect();
    print_packages(&ps, &order);

    if !outcome.tainted.is_empty() {
        println!();
        println!("Cannot be installed (unsatisfied dependencies):");
        for id in &outcome.tainted {
            println!("  {}", ps.package(*id).id());
        }
    }

    if dependents {
        for id in &selection {
            let closure = dependents_closure(&ps, *id)?;
            println!();
            println!("Removing {} breaks {} packages", ps.package(*id).id(), closure.len());
            for dep in closure {
                println!("  {}", ps.package(dep).id());
            }
        }
    }

    if !outcome.tainted.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}
