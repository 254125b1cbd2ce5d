use crate::driver::{BuildDriver, DriverSpec, Phase};
use crate::DriverError;
use std::ffi::OsString;
use std::process::Command;
use tracing::debug;

/// Drives an external `cmake` executable.
pub struct CmakeDriver {
    program: String,
}

impl CmakeDriver {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_owned(),
        }
    }

    /// Arguments for `cmake -S <src> -B <build> ...`.
    pub fn configure_args(spec: &DriverSpec) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-S".into(),
            spec.source_dir.clone().into_os_string(),
            "-B".into(),
            spec.build_dir.clone().into_os_string(),
            format!("-DCMAKE_BUILD_TYPE={}", spec.build_type()).into(),
        ];
        let mut prefix = OsString::from("-DCMAKE_INSTALL_PREFIX=");
        prefix.push(spec.install_prefix.as_os_str());
        args.push(prefix);
        if let Some(generator) = &spec.plan.generator {
            args.push("-G".into());
            args.push(generator.into());
        }
        args.extend(spec.plan.configure_args.iter().map(OsString::from));
        args
    }

    pub fn build_args(spec: &DriverSpec) -> Vec<OsString> {
        vec![
            "--build".into(),
            spec.build_dir.clone().into_os_string(),
            "--config".into(),
            spec.build_type().into(),
        ]
    }

    pub fn install_args(spec: &DriverSpec) -> Vec<OsString> {
        vec![
            "--install".into(),
            spec.build_dir.clone().into_os_string(),
            "--prefix".into(),
            spec.install_prefix.clone().into_os_string(),
            "--config".into(),
            spec.build_type().into(),
        ]
    }

    fn run(&self, phase: Phase, args: &[OsString]) -> Result<(), DriverError> {
        debug!("{phase}: {} {args:?}", self.program);
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|source| DriverError::Spawn {
                program: self.program.clone(),
                phase,
                source,
            })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let diagnostic = if stderr.trim().is_empty() {
            String::from_utf8_lossy(&output.stdout).into_owned()
        } else {
            stderr.into_owned()
        };
        Err(DriverError::ToolFailed {
            phase,
            status: output.status.code().unwrap_or(-1),
            diagnostic,
        })
    }
}

impl BuildDriver for CmakeDriver {
    fn name(&self) -> &'static str {
        "cmake"
    }

    fn configure(&self, spec: &DriverSpec) -> Result<(), DriverError> {
        std::fs::create_dir_all(&spec.build_dir)?;
        self.run(Phase::Configure, &Self::configure_args(spec))
    }

    fn build(&self, spec: &DriverSpec) -> Result<(), DriverError> {
        self.run(Phase::Build, &Self::build_args(spec))
    }

    fn install(&self, spec: &DriverSpec) -> Result<(), DriverError> {
        std::fs::create_dir_all(&spec.install_prefix)?;
        self.run(Phase::Install, &Self::install_args(spec))
    }
}
