//! Configuration management for the bitloop CLI
//!
//! Resolves the install root once per process and centralizes every path,
//! name and command the handlers need.

use crate::{
    cli::{Args, Command},
    core::platform::Platform,
    error::{BitloopError, Result},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the install root, both read and exported
pub const ROOT_ENV_VAR: &str = "BITLOOP_ROOT";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Enable debug logging
    pub debug: bool,
    /// Absolute root of the toolchain installation
    pub install_root: PathBuf,
    /// Directory new projects are created in
    pub work_dir: PathBuf,
    /// Operating system capabilities
    pub platform: Platform,
    /// Project template configuration
    pub template: TemplateConfig,
    /// Machine bootstrap configuration
    pub bootstrap: BootstrapConfig,
    /// Bundled package manager configuration
    pub vcpkg: VcpkgConfig,
}

/// Project template configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Template directory relative to the install root
    pub relative_dir: PathBuf,
    /// Token replaced with the project name in text files
    pub placeholder: String,
}

/// Machine bootstrap configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Explicit shell startup file; detected from `$SHELL` when unset
    pub profile_override: Option<PathBuf>,
    /// Login shell used to detect the profile and re-source it
    pub shell: String,
    /// Wrapper script name inside the install root
    pub wrapper_script: String,
    /// Convenience link name inside the install root
    pub link_name: String,
    /// Package manager used to install native dependencies
    pub package_manager: PackageManagerConfig,
    /// Native packages required to build windowing support
    pub dependencies: Vec<String>,
    /// Run the dependency installation stage
    pub install_dependencies: bool,
}

/// Package manager configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageManagerConfig {
    /// Program to launch (usually `sudo`)
    pub program: String,
    /// Arguments refreshing the package index
    pub update_args: Vec<String>,
    /// Arguments preceding the package list on install
    pub install_args: Vec<String>,
}

/// Bundled vcpkg configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VcpkgConfig {
    /// vcpkg checkout relative to the install root
    pub relative_dir: PathBuf,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            relative_dir: ["framework", "templates", "default"].iter().collect(),
            placeholder: "{SIM_NAME}".to_string(),
        }
    }
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            profile_override: None,
            shell: "bash".to_string(),
            wrapper_script: "bitloop.sh".to_string(),
            link_name: "bitloop".to_string(),
            package_manager: PackageManagerConfig::default(),
            dependencies: [
                "build-essential",
                "cmake",
                "ninja-build",
                "pkg-config",
                "autoconf",
                "automake",
                "libtool",
                "libx11-dev",
                "libxext-dev",
                "libxrandr-dev",
                "libxcursor-dev",
                "libxi-dev",
                "libxinerama-dev",
                "libxss-dev",
                "libxkbcommon-dev",
                "libwayland-dev",
                "libegl1-mesa-dev",
                "libgl1-mesa-dev",
                "libdbus-1-dev",
                "libudev-dev",
                "libasound2-dev",
                "libpulse-dev",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
            install_dependencies: true,
        }
    }
}

impl Default for PackageManagerConfig {
    fn default() -> Self {
        Self {
            program: "sudo".to_string(),
            update_args: vec!["apt-get".to_string(), "update".to_string()],
            install_args: vec![
                "apt-get".to_string(),
                "install".to_string(),
                "-y".to_string(),
            ],
        }
    }
}

impl Default for VcpkgConfig {
    fn default() -> Self {
        Self {
            relative_dir: PathBuf::from("vcpkg"),
        }
    }
}

impl Config {
    /// Configuration rooted at an already-resolved install root
    pub fn new(install_root: impl Into<PathBuf>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            debug: false,
            install_root: install_root.into(),
            work_dir: work_dir.into(),
            platform: Platform::current(),
            template: TemplateConfig::default(),
            bootstrap: BootstrapConfig::default(),
            vcpkg: VcpkgConfig::default(),
        }
    }

    /// Create configuration from command line arguments
    pub fn from_args(args: &Args) -> Result<Self> {
        let install_root = match &args.install_root {
            Some(root) => root.clone(),
            None => default_install_root()?,
        };
        let install_root = install_root.canonicalize().map_err(|e| {
            BitloopError::config(format!(
                "Install root {} is not accessible: {e}",
                install_root.display()
            ))
        })?;

        let work_dir = std::env::current_dir()
            .map_err(|e| BitloopError::file_system("read current directory", ".", e))?;

        let mut config = Self::new(install_root, work_dir);
        config.debug = args.debug;

        if let Ok(shell) = std::env::var("SHELL") {
            if let Some(name) = Path::new(&shell).file_name() {
                config.bootstrap.shell = name.to_string_lossy().into_owned();
            }
        }

        if let Command::Bootstrap { profile, skip_deps } = &args.command {
            config.bootstrap.profile_override = profile.clone();
            config.bootstrap.install_dependencies = !skip_deps;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !self.install_root.is_dir() {
            return Err(BitloopError::config(format!(
                "Install root is not a directory: {}",
                self.install_root.display()
            )));
        }

        if self.template.placeholder.is_empty() {
            return Err(BitloopError::config("Template placeholder must not be empty"));
        }

        Ok(())
    }

    pub fn template_dir(&self) -> PathBuf {
        self.install_root.join(&self.template.relative_dir)
    }

    pub fn wrapper_path(&self) -> PathBuf {
        self.install_root.join(&self.bootstrap.wrapper_script)
    }

    pub fn link_path(&self) -> PathBuf {
        self.install_root.join(&self.bootstrap.link_name)
    }

    pub fn vcpkg_dir(&self) -> PathBuf {
        self.install_root.join(&self.vcpkg.relative_dir)
    }

    pub fn vcpkg_binary(&self) -> PathBuf {
        self.vcpkg_dir().join(self.platform.vcpkg_binary_name())
    }

    /// Shell startup file the bootstrap writes to
    pub fn profile_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.bootstrap.profile_override {
            return Ok(path.clone());
        }

        let home = dirs::home_dir()
            .ok_or_else(|| BitloopError::config("Cannot determine the home directory"))?;
        Ok(home.join(profile_file_name(&self.bootstrap.shell)))
    }

    /// Lines that must appear exactly once in the shell startup file
    pub fn profile_entries(&self) -> Vec<String> {
        vec![
            format!(
                "export {ROOT_ENV_VAR}=\"{}\"",
                escape_double_quoted(&self.install_root.to_string_lossy())
            ),
            format!("export PATH=\"${ROOT_ENV_VAR}:$PATH\""),
        ]
    }
}

/// The install root is the parent of the directory holding the executable
fn default_install_root() -> Result<PathBuf> {
    let exe = std::env::current_exe()
        .map_err(|e| BitloopError::config(format!("Cannot locate the running executable: {e}")))?;

    exe.parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .ok_or_else(|| {
            BitloopError::config(format!(
                "Cannot derive the install root from {}; pass --install-root or set {ROOT_ENV_VAR}",
                exe.display()
            ))
        })
}

/// Startup file read by interactive shells of the given name
fn profile_file_name(shell: &str) -> &'static str {
    if shell.ends_with("zsh") {
        ".zshrc"
    } else {
        ".bashrc"
    }
}

/// Escape a value for use inside a double-quoted shell word
pub(crate) fn escape_double_quoted(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
