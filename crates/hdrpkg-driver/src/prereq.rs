use std::fmt;
use std::process::Command;

/// A missing prerequisite with actionable install instructions.
#[derive(Debug)]
pub struct MissingPrereq {
    pub name: String,
    pub purpose: &'static str,
    pub install_hint: &'static str,
}

impl fmt::Display for MissingPrereq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "  - {}: {} (install: {})",
            self.name, self.purpose, self.install_hint
        )
    }
}

fn command_runs(program: &str) -> bool {
    Command::new(program)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Check prerequisites for the CMake driver using `program` as the cmake
/// executable. Empty list means all prerequisites are met.
pub fn check_cmake_prereqs(program: &str) -> Vec<MissingPrereq> {
    let mut missing = Vec::new();
    if !command_runs(program) {
        missing.push(MissingPrereq {
            name: program.to_owned(),
            purpose: "configuring and installing the package",
            install_hint: "apt install cmake | dnf install cmake | brew install cmake | pip install cmake",
        });
    }
    missing
}

/// Format a list of missing prerequisites into a user-friendly error message.
pub fn format_missing(missing: &[MissingPrereq]) -> String {
    use std::fmt::Write as _;
    let mut msg = String::from("missing prerequisites:\n");
    for m in missing {
        let _ = writeln!(msg, "{m}");
    }
    msg.push_str("\nhdrpkg delegates configure/build/install to these tools.");
    msg
}
