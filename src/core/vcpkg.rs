//! Passthrough to the bundled vcpkg executable

use crate::{config::Config, error::Result, utils::{CommandRunner, CommandSpec}};
use std::ffi::OsString;
use tracing::{debug, instrument};

/// Arguments as vcpkg should receive them: a leading `--` separator is
/// dropped, and an empty list becomes `--help`.
#[must_use]
pub fn forwarded_args(raw: &[OsString]) -> Vec<OsString> {
    let args = match raw.first() {
        Some(first) if first == "--" => &raw[1..],
        _ => raw,
    };

    if args.is_empty() {
        vec![OsString::from("--help")]
    } else {
        args.to_vec()
    }
}

/// Runs the bundled vcpkg from its own checkout directory
pub struct VcpkgPassthrough<R: CommandRunner> {
    config: Config,
    runner: R,
}

impl<R: CommandRunner> VcpkgPassthrough<R> {
    pub fn new(config: Config, runner: R) -> Self {
        Self { config, runner }
    }

    /// Run vcpkg and return its exit code unchanged.
    ///
    /// A missing executable is not checked up front; the launch failure
    /// itself is returned.
    #[instrument(skip(self))]
    pub fn run(&self, raw_args: &[OsString]) -> Result<i32> {
        let binary = self.config.vcpkg_binary();
        if !binary.is_file() {
            debug!("{} does not exist; launch will fail", binary.display());
        }

        let spec = CommandSpec::new(binary)
            .args(forwarded_args(raw_args))
            .current_dir(self.config.vcpkg_dir());

        self.runner.status(&spec)
    }
}
