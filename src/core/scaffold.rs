//! Project scaffolding from the bundled template
//!
//! The template tree is copied into a staging directory next to the target
//! and renamed into place, so a failed scaffold leaves nothing behind.

use crate::{
    config::Config,
    error::{BitloopError, Result},
    utils::{FileSystemUtils, NameProvider},
};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// A validated, trimmed, non-empty project name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectName(String);

impl ProjectName {
    /// Validate a raw name as typed by the user
    pub fn parse(raw: &str) -> Result<Self> {
        let name = raw.trim();

        if name.is_empty() {
            return Err(BitloopError::invalid_input("Project name cannot be empty."));
        }
        if name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(BitloopError::invalid_input(format!(
                "Project name '{name}' must be a plain directory name"
            )));
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of a successful scaffold
#[derive(Debug)]
pub struct ScaffoldReport {
    pub name: ProjectName,
    pub path: PathBuf,
    /// Placeholder occurrences replaced across all text files
    pub replacements: usize,
}

/// Creates new projects from the install root's template
pub struct ProjectScaffolder {
    config: Config,
    fs_utils: FileSystemUtils,
}

impl ProjectScaffolder {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            fs_utils: FileSystemUtils::new(),
        }
    }

    /// Obtain a name from `names` and scaffold the project
    #[instrument(skip(self, names))]
    pub fn create(&self, names: &mut dyn NameProvider) -> Result<ScaffoldReport> {
        let raw = names
            .provide_name()
            .map_err(|e| BitloopError::file_system("read project name", "<stdin>", e))?;
        let name = ProjectName::parse(&raw)?;

        let template_dir = self.config.template_dir();
        if !template_dir.is_dir() {
            return Err(BitloopError::not_found("Template directory", template_dir));
        }

        let target = self.config.work_dir.join(name.as_str());
        let replace_empty_dir = self.check_target(&target)?;

        info!(
            "Creating project '{}' from {}",
            name,
            template_dir.display()
        );

        let staging = tempfile::Builder::new()
            .prefix(".bitloop-new-")
            .tempdir_in(&self.config.work_dir)
            .map_err(|e| {
                BitloopError::file_system("create staging directory", &self.config.work_dir, e)
            })?;

        // Dropping `staging` on any early return removes the partial tree
        let replacements = self
            .fs_utils
            .copy_tree_substituting(
                &template_dir,
                staging.path(),
                &self.config.template.placeholder,
                name.as_str(),
            )
            .map_err(|e| BitloopError::file_system("copy template", &template_dir, e))?;
        debug!("Staged template into {}", staging.path().display());

        let staged = staging.keep();
        if let Err(e) = move_into_place(&staged, &target, replace_empty_dir) {
            let _ = fs::remove_dir_all(&staged);
            return Err(BitloopError::file_system("move project into place", &target, e));
        }

        info!("Scaffolded project, {} placeholder(s) replaced", replacements);

        Ok(ScaffoldReport {
            name,
            path: target,
            replacements,
        })
    }

    /// Returns `true` when the target is an empty directory that may be replaced
    fn check_target(&self, target: &Path) -> Result<bool> {
        if !self.fs_utils.entry_exists(target) {
            return Ok(false);
        }

        if target.is_dir()
            && self
                .fs_utils
                .is_empty_dir(target)
                .map_err(|e| BitloopError::file_system("inspect", target, e))?
        {
            debug!("Target {} exists but is empty", target.display());
            return Ok(true);
        }

        Err(BitloopError::conflict(
            "Target already exists and is not empty",
            target,
        ))
    }
}

/// Rename `staged` to `target`. An empty directory at `target` is replaced,
/// and restored if the move still fails.
fn move_into_place(staged: &Path, target: &Path, replace_empty_dir: bool) -> std::io::Result<()> {
    match fs::rename(staged, target) {
        Ok(()) => Ok(()),
        Err(e) if !replace_empty_dir => Err(e),
        Err(e) => {
            // Not every platform renames a directory over an empty one
            debug!("Rename over empty directory failed ({}), removing it first", e);
            fs::remove_dir(target)?;
            fs::rename(staged, target).inspect_err(|_| {
                let _ = fs::create_dir(target);
            })
        }
    }
}
