//! Utility modules for common functionality
//!
//! Provides reusable utilities for file operations, process execution,
//! and interactive input.

pub mod fs;
pub mod process;
pub mod prompt;

pub use fs::FileSystemUtils;
pub use process::{CommandRunner, CommandSpec, ProcessRunner};
pub use prompt::{FixedName, NameProvider, ReaderNameProvider};
