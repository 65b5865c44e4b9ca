//! Development machine bootstrap
//!
//! Runs a fixed sequence of stages. Each stage is idempotent, so a bootstrap
//! that failed halfway can simply be re-run. A fatal failure stops the
//! sequence and names the stage that failed.

use crate::{
    config::{escape_double_quoted, Config},
    core::platform::PlatformSupport,
    error::{BitloopError, Result},
    utils::{CommandRunner, CommandSpec, FileSystemUtils},
};
use std::fmt;
use tracing::{debug, info, instrument, warn};

/// Bootstrap stages in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Profile,
    ExecutableBit,
    Symlink,
    ShellReload,
    Dependencies,
}

impl Stage {
    /// Name used in logs, errors and the final summary
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::ExecutableBit => "executable bit",
            Self::Symlink => "symlink",
            Self::ShellReload => "shell reload",
            Self::Dependencies => "dependencies",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What a bootstrap run did
#[derive(Debug, Default)]
pub struct BootstrapReport {
    /// Stages that completed, in order
    pub completed: Vec<Stage>,
    /// Profile lines that were newly appended
    pub appended_lines: Vec<String>,
    /// Non-fatal problems that were skipped over
    pub warnings: Vec<String>,
}

impl BootstrapReport {
    /// Comma-separated list of completed stages
    pub fn summary(&self) -> String {
        self.completed
            .iter()
            .map(|s| s.label())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn warn(&mut self, message: String) {
        warn!("{}", message);
        self.warnings.push(message);
    }
}

/// Prepares a Linux machine to build the framework from source
pub struct Bootstrapper<R: CommandRunner> {
    config: Config,
    runner: R,
    fs_utils: FileSystemUtils,
}

impl<R: CommandRunner> Bootstrapper<R> {
    pub fn new(config: Config, runner: R) -> Self {
        Self {
            config,
            runner,
            fs_utils: FileSystemUtils::new(),
        }
    }

    /// Run every stage in order
    #[instrument(skip(self))]
    pub fn run(&self) -> Result<BootstrapReport> {
        if let PlatformSupport::Unsupported { reason } = self.config.platform.bootstrap_support() {
            return Err(BitloopError::unsupported_platform(reason));
        }

        let mut report = BootstrapReport::default();

        report.appended_lines = self
            .update_profile()
            .map_err(|e| BitloopError::stage(Stage::Profile.label(), e))?;
        report.completed.push(Stage::Profile);

        if self.mark_wrapper_executable(&mut report)? {
            report.completed.push(Stage::ExecutableBit);
        }

        if self.link_wrapper(&mut report)? {
            report.completed.push(Stage::Symlink);
        }

        if self.reload_shell(&mut report) {
            report.completed.push(Stage::ShellReload);
        }

        if self.config.bootstrap.install_dependencies {
            self.install_dependencies()
                .map_err(|e| BitloopError::stage(Stage::Dependencies.label(), e))?;
            report.completed.push(Stage::Dependencies);
        } else {
            info!("Skipping dependency installation");
        }

        Ok(report)
    }

    fn update_profile(&self) -> Result<Vec<String>> {
        let profile = self.config.profile_path()?;
        let entries = self.config.profile_entries();

        let appended = self
            .fs_utils
            .append_missing_lines(&profile, &entries)
            .map_err(|e| BitloopError::file_system("update shell profile", &profile, e))?;

        if appended.is_empty() {
            info!("{} already exports the install root", profile.display());
        } else {
            info!("Added {} line(s) to {}", appended.len(), profile.display());
        }
        Ok(appended)
    }

    /// `Ok(false)` when the wrapper script is absent
    fn mark_wrapper_executable(&self, report: &mut BootstrapReport) -> Result<bool> {
        let wrapper = self.config.wrapper_path();
        if !wrapper.is_file() {
            report.warn(format!(
                "Wrapper script not found at {}; skipping executable bit",
                wrapper.display()
            ));
            return Ok(false);
        }

        let changed = self.fs_utils.make_executable(&wrapper).map_err(|e| {
            BitloopError::stage(
                Stage::ExecutableBit.label(),
                BitloopError::file_system("chmod +x", &wrapper, e),
            )
        })?;
        debug!("Executable bit on {} changed: {}", wrapper.display(), changed);
        Ok(true)
    }

    /// `Ok(false)` when there is no wrapper to link to
    fn link_wrapper(&self, report: &mut BootstrapReport) -> Result<bool> {
        let link = self.config.link_path();
        if self.fs_utils.entry_exists(&link) {
            debug!("{} already exists; leaving it untouched", link.display());
            return Ok(true);
        }

        let wrapper = self.config.wrapper_path();
        if !wrapper.is_file() {
            report.warn(format!(
                "Not linking {}: wrapper script {} is missing",
                link.display(),
                wrapper.display()
            ));
            return Ok(false);
        }

        // Relative target keeps the link valid if the install root moves
        self.fs_utils
            .symlink(std::path::Path::new(&self.config.bootstrap.wrapper_script), &link)
            .map_err(|e| {
                BitloopError::stage(
                    Stage::Symlink.label(),
                    BitloopError::file_system("create symlink", &link, e),
                )
            })?;
        info!("Linked {} -> {}", link.display(), self.config.bootstrap.wrapper_script);
        Ok(true)
    }

    /// Re-source the profile in a subshell; failure is only a warning
    fn reload_shell(&self, report: &mut BootstrapReport) -> bool {
        let profile = match self.config.profile_path() {
            Ok(profile) => profile,
            Err(e) => {
                report.warn(format!("Cannot reload shell profile: {e}"));
                return false;
            }
        };

        let spec = CommandSpec::new(&self.config.bootstrap.shell).args([
            "-c".to_string(),
            format!(". \"{}\"", escape_double_quoted(&profile.to_string_lossy())),
        ]);

        match self.runner.run(&spec) {
            Ok(()) => true,
            Err(e) => {
                report.warn(format!(
                    "Could not re-source {} ({e}); open a new shell to pick up the changes",
                    profile.display()
                ));
                false
            }
        }
    }

    fn install_dependencies(&self) -> Result<()> {
        let pm = &self.config.bootstrap.package_manager;
        let deps = &self.config.bootstrap.dependencies;

        info!("Installing {} system packages", deps.len());
        self.runner
            .run(&CommandSpec::new(&pm.program).args(&pm.update_args))?;
        self.runner.run(
            &CommandSpec::new(&pm.program)
                .args(&pm.install_args)
                .args(deps),
        )?;

        info!("System packages installed");
        Ok(())
    }
}
