use super::{collect_settings, json_pretty, spin_fail, spin_ok, spinner, EXIT_SUCCESS};
use hdrpkg_core::{CoreError, Descriptor, InstallRequest};
use hdrpkg_driver::{check_cmake_prereqs, format_missing, select_driver};
use std::path::{Path, PathBuf};

pub struct InstallArgs<'a> {
    pub root: &'a Path,
    pub prefix: &'a Path,
    pub work_dir: Option<&'a Path>,
    pub profile: Option<&'a Path>,
    pub overrides: &'a [String],
}

pub fn run(descriptor: &Descriptor, args: &InstallArgs<'_>, json: bool) -> Result<u8, String> {
    let plan = &descriptor.recipe().build;
    if plan.driver == "cmake" && std::env::var("HDRPKG_SKIP_PREREQS").as_deref() != Ok("1") {
        let missing = check_cmake_prereqs(&plan.program);
        if !missing.is_empty() {
            return Err(format_missing(&missing));
        }
    }

    let settings = collect_settings(args.profile, args.overrides)?;
    let driver = select_driver(plan).map_err(|e| format!("build tool failure: {e}"))?;
    let request = InstallRequest {
        source_root: args.root.to_path_buf(),
        install_target: absolute(args.prefix)?,
        work_dir: args.work_dir.map(Path::to_path_buf),
        settings,
    };

    let pb = if json {
        None
    } else {
        Some(spinner(&format!(
            "installing {}...",
            descriptor.declare_identity().reference()
        )))
    };

    let result = match descriptor.package(driver.as_ref(), &request) {
        Ok(r) => {
            if let Some(ref pb) = pb {
                spin_ok(pb, "package installed");
            }
            r
        }
        Err(e) => {
            if let Some(ref pb) = pb {
                spin_fail(pb, &failure_summary(&e));
            }
            return Err(e.to_string());
        }
    };

    if json {
        println!("{}", json_pretty(&result)?);
    } else {
        println!(
            "installed {} ({}) into {}",
            result.info.reference,
            result.fingerprint.short_id,
            result.install_target.display()
        );
        println!("package_id: {}", result.fingerprint.package_id);
        println!("staged:     {} files", result.staged_files);
    }
    Ok(EXIT_SUCCESS)
}

/// One-line spinner message naming the driver phase that failed.
fn failure_summary(err: &CoreError) -> String {
    match err {
        CoreError::BuildToolFailure(e) => e
            .phase()
            .map_or_else(|| "install failed".to_owned(), |p| format!("{p} step failed")),
        _ => "install failed".to_owned(),
    }
}

fn absolute(path: &Path) -> Result<PathBuf, String> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .map_err(|e| format!("cannot resolve {}: {e}", path.display()))
}
