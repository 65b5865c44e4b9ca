//! Core functionality of the bitloop CLI
//!
//! Contains the three command handlers: project scaffolding, machine
//! bootstrap, and the vcpkg passthrough.

pub mod bootstrap;
pub mod platform;
pub mod scaffold;
pub mod vcpkg;

pub use bootstrap::{BootstrapReport, Bootstrapper, Stage};
pub use platform::{Platform, PlatformSupport};
pub use scaffold::{ProjectName, ProjectScaffolder, ScaffoldReport};
pub use vcpkg::VcpkgPassthrough;
