//! Operating system capability checks
//!
//! Handlers ask a [`Platform`] what they may do instead of comparing OS
//! strings inline, so the decisions can be tested for any target.

use serde::{Deserialize, Serialize};

/// Whether an operation is available on a platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformSupport {
    Supported,
    Unsupported { reason: String },
}

/// The operating system the CLI runs on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    os: String,
}

impl Platform {
    /// The platform this binary was compiled for
    #[must_use]
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// A platform identified by a `std::env::consts::OS` style name
    pub fn from_os(os: impl Into<String>) -> Self {
        Self { os: os.into() }
    }

    /// Machine bootstrap only knows how to provision Linux hosts
    #[must_use]
    pub fn bootstrap_support(&self) -> PlatformSupport {
        if self.os == "linux" {
            PlatformSupport::Supported
        } else {
            PlatformSupport::Unsupported {
                reason: format!("'bootstrap' is only supported on Linux (this is {})", self.os),
            }
        }
    }

    /// File name of the bundled vcpkg executable
    #[must_use]
    pub fn vcpkg_binary_name(&self) -> &'static str {
        if self.os == "windows" {
            "vcpkg.exe"
        } else {
            "vcpkg"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_support() {
        assert_eq!(
            Platform::from_os("linux").bootstrap_support(),
            PlatformSupport::Supported
        );

        match Platform::from_os("macos").bootstrap_support() {
            PlatformSupport::Unsupported { reason } => assert!(reason.contains("macos")),
            PlatformSupport::Supported => panic!("macos must not be supported"),
        }
    }

    #[test]
    fn test_vcpkg_binary_name() {
        assert_eq!(Platform::from_os("windows").vcpkg_binary_name(), "vcpkg.exe");
        assert_eq!(Platform::from_os("linux").vcpkg_binary_name(), "vcpkg");
        assert_eq!(Platform::from_os("macos").vcpkg_binary_name(), "vcpkg");
    }
}
