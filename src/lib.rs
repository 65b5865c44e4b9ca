//! # bitloop CLI
//!
//! Command-line entry point for the bitloop framework. It dispatches to
//! exactly one of three operations per invocation:
//!
//! - `new project [NAME]` scaffolds a project from the bundled template
//! - `bootstrap` prepares a Linux machine to build the framework
//! - `vcpkg [--] <args...>` forwards to the bundled vcpkg executable
//!
//! ## Example
//!
//! ```no_run
//! use bitloop_cli::{config::Config, core::ProjectScaffolder, utils::FixedName};
//!
//! let config = Config::new("/opt/bitloop", std::env::current_dir()?);
//! let report = ProjectScaffolder::new(config).create(&mut FixedName("Tiger".into()))?;
//! println!("Created {}", report.path.display());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod utils;

use anyhow::Result;
use error::BitloopError;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging with appropriate verbosity
///
/// Logs go to stderr so that stdout carries only command output.
pub fn setup_logging(debug: bool) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(true)
                .compact(),
        )
        .with(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Exit code for a failed command, taken from the first [`BitloopError`]
/// in the error chain
#[must_use]
pub fn exit_code_for(error: &anyhow::Error) -> i32 {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<BitloopError>())
        .map_or(1, BitloopError::exit_code)
}
