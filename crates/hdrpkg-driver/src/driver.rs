use crate::DriverError;
use hdrpkg_schema::{BuildPlan, BuildSettings};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// One step of the configure → build → install sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Configure,
    Build,
    Install,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Configure => "configure",
            Self::Build => "build",
            Self::Install => "install",
        })
    }
}

/// Everything a driver needs to run one packaging invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DriverSpec {
    pub source_dir: PathBuf,
    pub build_dir: PathBuf,
    pub install_prefix: PathBuf,
    pub settings: BuildSettings,
    pub plan: BuildPlan,
}

impl DriverSpec {
    pub fn build_type(&self) -> &str {
        self.settings.build_type()
    }
}

pub trait BuildDriver: Send + Sync {
    fn name(&self) -> &str;

    fn configure(&self, spec: &DriverSpec) -> Result<(), DriverError>;

    fn build(&self, spec: &DriverSpec) -> Result<(), DriverError>;

    fn install(&self, spec: &DriverSpec) -> Result<(), DriverError>;
}

pub fn select_driver(plan: &BuildPlan) -> Result<Box<dyn BuildDriver>, DriverError> {
    match plan.driver.as_str() {
        "cmake" => Ok(Box::new(crate::cmake::CmakeDriver::new(&plan.program))),
        "mock" => Ok(Box::new(crate::mock::MockDriver::new())),
        other => Err(DriverError::Unavailable(other.to_owned())),
    }
}
