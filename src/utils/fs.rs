//! File system utility functions
//!
//! Provides safe file operations with proper error handling: template tree
//! copying with placeholder substitution, idempotent line appends, and the
//! permission/link helpers the bootstrapper needs.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, instrument};
use walkdir::WalkDir;

/// Utility struct for file system operations
#[derive(Debug)]
pub struct FileSystemUtils;

impl FileSystemUtils {
    /// Create a new file system utilities instance
    pub fn new() -> Self {
        Self
    }

    /// Recursively copy `src` into `dst`, replacing every `token` with
    /// `replacement` inside text files.
    ///
    /// `dst` must already exist. File and directory names are copied as-is.
    /// Permissions of every copied file are preserved. Returns the number of
    /// placeholder occurrences replaced.
    #[instrument(skip(self))]
    pub fn copy_tree_substituting(
        &self,
        src: &Path,
        dst: &Path,
        token: &str,
        replacement: &str,
    ) -> io::Result<usize> {
        let mut replacements = 0;

        for entry in WalkDir::new(src).min_depth(1).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(io::Error::other)?;
            let relative = entry
                .path()
                .strip_prefix(src)
                .map_err(io::Error::other)?;
            let target = dst.join(relative);

            if entry.file_type().is_dir() {
                debug!("Creating directory: {}", target.display());
                fs::create_dir_all(&target)?;
                continue;
            }

            let bytes = fs::read(entry.path())?;
            if is_text(&bytes) && !token.is_empty() {
                // is_text guarantees valid UTF-8
                let content = String::from_utf8_lossy(&bytes);
                let count = content.matches(token).count();
                fs::write(&target, content.replace(token, replacement))?;
                debug!("Wrote text file {} ({} replacements)", target.display(), count);
                replacements += count;
            } else {
                fs::write(&target, &bytes)?;
                debug!("Copied binary file {}", target.display());
            }

            let metadata = fs::metadata(entry.path())?;
            fs::set_permissions(&target, metadata.permissions())?;
        }

        Ok(replacements)
    }

    /// Append each line of `lines` that is not already present in the file.
    ///
    /// A missing file is treated as empty and created. Returns the lines that
    /// were actually appended, in order.
    #[instrument(skip(self, lines))]
    pub fn append_missing_lines(&self, path: &Path, lines: &[String]) -> io::Result<Vec<String>> {
        let existing = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("File does not exist yet: {}", path.display());
                String::new()
            }
            Err(e) => return Err(e),
        };

        let present: Vec<&str> = existing.lines().map(str::trim_end).collect();
        let mut missing: Vec<String> = Vec::new();
        for line in lines {
            let line = line.trim_end();
            if !present.contains(&line) && !missing.iter().any(|m| m == line) {
                missing.push(line.to_string());
            }
        }

        if missing.is_empty() {
            debug!("All lines already present in {}", path.display());
            return Ok(missing);
        }

        let mut block = String::new();
        if !existing.is_empty() && !existing.ends_with('\n') {
            block.push('\n');
        }
        for line in &missing {
            block.push_str(line);
            block.push('\n');
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(block.as_bytes())?;
        debug!("Appended {} line(s) to {}", missing.len(), path.display());

        Ok(missing)
    }

    /// Whether `path` is a directory with no entries
    pub fn is_empty_dir(&self, path: &Path) -> io::Result<bool> {
        Ok(fs::read_dir(path)?.next().is_none())
    }

    /// Whether anything (file, directory, or even a dangling link) exists at `path`
    pub fn entry_exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    /// Add execute permission for owner, group and others.
    ///
    /// Returns `false` when the file was already fully executable.
    #[cfg(unix)]
    #[instrument(skip(self))]
    pub fn make_executable(&self, path: &Path) -> io::Result<bool> {
        use std::os::unix::fs::PermissionsExt;

        let mut permissions = fs::metadata(path)?.permissions();
        let mode = permissions.mode();
        if mode & 0o111 == 0o111 {
            return Ok(false);
        }
        permissions.set_mode(mode | 0o111);
        fs::set_permissions(path, permissions)?;
        debug!("Set mode {:o} on {}", mode | 0o111, path.display());
        Ok(true)
    }

    /// Executable bits do not exist on this platform
    #[cfg(not(unix))]
    pub fn make_executable(&self, path: &Path) -> io::Result<bool> {
        fs::metadata(path).map(|_| false)
    }

    /// Create a symbolic link at `link` pointing to `target`
    #[cfg(unix)]
    #[instrument(skip(self))]
    pub fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        std::os::unix::fs::symlink(target, link)
    }

    /// Create a symbolic link at `link` pointing to `target`
    #[cfg(windows)]
    pub fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        std::os::windows::fs::symlink_file(target, link)
    }
}

impl Default for FileSystemUtils {
    fn default() -> Self {
        Self::new()
    }
}

/// Deterministic text/binary classification by content sniffing:
/// text is valid UTF-8 without NUL bytes.
#[must_use]
pub fn is_text(bytes: &[u8]) -> bool {
    !bytes.contains(&0) && std::str::from_utf8(bytes).is_ok()
}
