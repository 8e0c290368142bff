// src/cli.rs
//! CLI definitions for rpmgraph
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rpmgraph")]
#[command(version)]
#[command(about = "Capability and dependency resolution for RPM package sets", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Verify dependencies, conflicts and install order of a package set
    Verify {
        /// Universe file (JSON, or TOML with a .toml extension)
        universe: PathBuf,

        /// Resolver configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format: text, json
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Only print the summary line and set the exit status
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print the install order of a package set
    Order {
        /// Universe file
        universe: PathBuf,

        /// Resolver configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the uninstall order instead
        #[arg(long)]
        uninstall: bool,
    },

    /// List packages providing a capability
    Provides {
        /// Universe file
        universe: PathBuf,

        /// Capability, optionally versioned (e.g. "libfoo >= 2.0")
        capability: String,

        /// Resolver configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List packages requiring a capability
    Requires {
        /// Universe file
        universe: PathBuf,

        /// Capability name
        name: String,

        /// Resolver configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List packages obsoleting a capability
    Obsoletes {
        /// Universe file
        universe: PathBuf,

        /// Capability name
        name: String,

        /// Resolver configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Mark packages for installation together with their dependencies
    Mark {
        /// Universe file
        universe: PathBuf,

        /// Packages to select (name, name-version-release or full id)
        #[arg(required = true)]
        packages: Vec<String>,

        /// Resolver configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Also list what breaks if each selected package is removed
        #[arg(long)]
        dependents: bool,
    },
}
