//! Command-line argument parsing and validation

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

/// bitloop - scaffold projects, bootstrap a dev machine, and drive the bundled vcpkg
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "bitloop")]
pub struct Args {
    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Root of the bitloop installation (defaults to the parent of the binary's directory)
    #[arg(long, env = "BITLOOP_ROOT", value_name = "DIR")]
    pub install_root: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scaffold something
    New {
        #[command(subcommand)]
        entity: NewEntity,
    },

    /// Install bootstrap dependencies (Linux only)
    Bootstrap {
        /// Shell startup file to update (defaults to ~/.bashrc or ~/.zshrc)
        #[arg(long, value_name = "FILE")]
        profile: Option<PathBuf>,

        /// Update the profile and links but do not install system packages
        #[arg(long)]
        skip_deps: bool,
    },

    /// Run the bundled vcpkg, forwarding all arguments
    #[command(disable_help_flag = true)]
    Vcpkg {
        /// Arguments passed to vcpkg unchanged (`--help` when empty)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, num_args = 0..)]
        args: Vec<OsString>,
    },
}

/// Things `new` can scaffold
#[derive(Subcommand, Debug)]
pub enum NewEntity {
    /// Scaffold a new project
    Project {
        /// Project name; prompted for when omitted
        name: Option<String>,
    },
}

/// Parse command line arguments
pub fn parse_args() -> Args {
    Args::parse()
}
