// src/commands/verify.rs
//! Verification and ordering commands

use anyhow::Result;
use std::path::Path;

use rpmgraph::Report;

use super::{open_pkgset, print_packages};

/// Verify a universe and print the report
///
/// Exits with status 1 when the set has errors.
pub fn cmd_verify(universe: &Path, config: Option<&Path>, format: &str, quiet: bool) -> Result<()> {
    if !matches!(format, "text" | "json") {
        anyhow::bail!("Unknown format '{}' (expected text or json)", format);
    }

    let ps = open_pkgset(universe, config)?;
    let report = Report::from_pkgset(&ps)?;

    if quiet {
        println!("{} packages, {} errors", report.packages, report.error_count);
    } else if format == "json" {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.to_text());
    }

    if report.error_count > 0 {
        std::process::exit(1);
    }
    Ok(())
}

/// Print the install (or uninstall) order, one package per line
pub fn cmd_order(universe: &Path, config: Option<&Path>, uninstall: bool) -> Result<()> {
    let ps = open_pkgset(universe, config)?;
    let order = if uninstall {
        ps.uninstall_ordered()?
    } else {
        ps.ordered()?
    };
    print_packages(&ps, order);
    Ok(())
}
