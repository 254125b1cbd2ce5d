//! Packaging descriptor for header-only libraries.
//!
//! This crate ties together recipe parsing, source tree scanning, and build
//! drivers into the `Descriptor`: identity declaration, export enumeration,
//! fingerprint computation, source distribution staging, and the
//! configure → build → install pipeline.

pub mod descriptor;
pub mod exports;
pub mod package_info;

pub use descriptor::{Descriptor, InstallRequest, InstallResult};
pub use exports::{enumerate_exports, stage_exports, ExportKind, ExportManifest};
pub use package_info::{PackageInfo, PACKAGE_INFO_FILE};

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("recipe error: {0}")]
    Recipe(#[from] hdrpkg_schema::RecipeError),
    #[error("settings error: {0}")]
    Settings(#[from] hdrpkg_schema::SettingsError),
    #[error("unknown preset '{0}'")]
    UnknownPreset(String),
    #[error("cannot enumerate source root {}: {source}", .root.display())]
    SourceEnumeration {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("build tool failure: {0}")]
    BuildToolFailure(#[from] hdrpkg_driver::DriverError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    pub(crate) fn enumeration(root: &Path, source: std::io::Error) -> Self {
        Self::SourceEnumeration {
            root: root.to_path_buf(),
            source,
        }
    }
}
