//! Build/install drivers for hdrpkg.
//!
//! This crate implements the delegation layer: the `BuildDriver` trait with a
//! CMake driver that runs the external `cmake` program and a recording mock
//! driver for tests, plus prerequisite checks for the external tools.

pub mod cmake;
pub mod driver;
pub mod mock;
pub mod prereq;

pub use driver::{select_driver, BuildDriver, DriverSpec, Phase};
pub use prereq::{check_cmake_prereqs, format_missing, MissingPrereq};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("driver I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("build driver '{0}' is not available")]
    Unavailable(String),
    #[error("failed to launch '{program}' for {phase}: {source}")]
    Spawn {
        program: String,
        phase: Phase,
        #[source]
        source: std::io::Error,
    },
    #[error("{phase} failed (exit code {status}):\n{diagnostic}")]
    ToolFailed {
        phase: Phase,
        status: i32,
        diagnostic: String,
    },
}

impl DriverError {
    /// Phase the failure happened in, when it came from a driver invocation.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            Self::Spawn { phase, .. } | Self::ToolFailed { phase, .. } => Some(*phase),
            Self::Io(_) | Self::Unavailable(_) => None,
        }
    }
}
