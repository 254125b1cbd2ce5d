use crate::driver::{BuildDriver, DriverSpec, Phase};
use crate::DriverError;
use std::path::Path;
use std::sync::Mutex;
use walkdir::WalkDir;

const HEADER_SUFFIXES: &[&str] = &["h", "hh", "hpp", "hxx", "ipp"];

/// In-process driver that records each phase it is asked to run.
///
/// `install` copies staged headers into `<prefix>/include`, which is roughly
/// what a header-only CMake project installs.
#[derive(Default)]
pub struct MockDriver {
    calls: Mutex<Vec<Phase>>,
    fail_on: Option<Phase>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// A driver that reports a tool failure when `phase` runs.
    pub fn failing_on(phase: Phase) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on: Some(phase),
        }
    }

    /// Phases invoked so far, in order.
    pub fn calls(&self) -> Vec<Phase> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, phase: Phase) -> Result<(), DriverError> {
        self.calls
            .lock()
            .map_err(|e| DriverError::Unavailable(format!("mock state poisoned: {e}")))?
            .push(phase);
        if self.fail_on == Some(phase) {
            return Err(DriverError::ToolFailed {
                phase,
                status: 1,
                diagnostic: format!("mock {phase} failure"),
            });
        }
        Ok(())
    }
}

impl BuildDriver for MockDriver {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn configure(&self, spec: &DriverSpec) -> Result<(), DriverError> {
        self.record(Phase::Configure)?;
        std::fs::create_dir_all(&spec.build_dir)?;
        std::fs::write(
            spec.build_dir.join("mock-cache.txt"),
            format!("CMAKE_BUILD_TYPE={}\n", spec.build_type()),
        )?;
        Ok(())
    }

    fn build(&self, _spec: &DriverSpec) -> Result<(), DriverError> {
        self.record(Phase::Build)
    }

    fn install(&self, spec: &DriverSpec) -> Result<(), DriverError> {
        self.record(Phase::Install)?;
        let include = spec.install_prefix.join("include");
        std::fs::create_dir_all(&include)?;
        copy_headers(&spec.source_dir, &include)?;
        Ok(())
    }
}

fn copy_headers(source: &Path, dest: &Path) -> Result<(), DriverError> {
    if !source.is_dir() {
        return Ok(());
    }
    for entry in WalkDir::new(source).follow_links(false) {
        let entry = entry.map_err(|e| DriverError::Io(e.into()))?;
        let path = entry.path();
        let is_header = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| HEADER_SUFFIXES.contains(&e));
        if !is_header || !path.is_file() {
            continue;
        }
        let target = dest.join(path.strip_prefix(source).unwrap_or(path));
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(path, &target)?;
    }
    Ok(())
}
