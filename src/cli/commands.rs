//! Command implementations for the CLI

use crate::{
    cli::{Command, NewEntity},
    config::Config,
    core::{Bootstrapper, ProjectScaffolder, VcpkgPassthrough},
    utils::{FixedName, ProcessRunner, ReaderNameProvider},
};
use anyhow::Context;
use std::ffi::OsString;
use tracing::{debug, info, instrument};

/// Execute the appropriate command and return the process exit code
#[instrument(skip(config))]
pub fn execute_command(config: &Config, command: &Command) -> anyhow::Result<i32> {
    debug!("Using configuration: {:?}", config);

    match command {
        Command::New {
            entity: NewEntity::Project { name },
        } => execute_new_project_command(config, name.as_deref()),
        Command::Bootstrap { .. } => execute_bootstrap_command(config),
        Command::Vcpkg { args } => execute_vcpkg_command(config, args),
    }
}

/// Execute the new project command, prompting when no name was given
#[instrument(skip(config))]
fn execute_new_project_command(config: &Config, name: Option<&str>) -> anyhow::Result<i32> {
    let scaffolder = ProjectScaffolder::new(config.clone());
    let report = match name {
        Some(name) => scaffolder.create(&mut FixedName(name.to_string())),
        None => scaffolder.create(&mut ReaderNameProvider::stdin()),
    }
    .context("Failed to create project")?;

    println!(
        "Created new project '{}' at {}",
        report.name,
        report.path.display()
    );
    Ok(0)
}

/// Execute the bootstrap command
#[instrument(skip(config))]
fn execute_bootstrap_command(config: &Config) -> anyhow::Result<i32> {
    info!("Bootstrapping development environment...");

    let bootstrapper = Bootstrapper::new(config.clone(), ProcessRunner::new(config.debug));
    let report = bootstrapper.run().context("Failed to bootstrap")?;

    if !report.warnings.is_empty() {
        info!("Completed with {} warning(s)", report.warnings.len());
    }
    println!("Bootstrap complete: {}", report.summary());
    Ok(0)
}

/// Execute the vcpkg passthrough, returning its exit code unchanged
#[instrument(skip(config))]
fn execute_vcpkg_command(config: &Config, args: &[OsString]) -> anyhow::Result<i32> {
    let passthrough = VcpkgPassthrough::new(config.clone(), ProcessRunner::new(config.debug));
    let code = passthrough
        .run(args)
        .with_context(|| format!("Failed to run {}", config.vcpkg_binary().display()))?;
    Ok(code)
}
