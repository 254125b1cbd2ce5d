use crate::CoreError;
use hdrpkg_schema::{PackageFingerprint, PackageId, PackageIdentity, PackageKind, PackageRef};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const PACKAGE_INFO_FILE: &str = "hdrpkg-info.json";

/// Consumer-facing description of an installed package.
///
/// A header-only package contributes include directories only: it has no
/// libraries to link and no executables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackageInfo {
    pub reference: PackageRef,
    pub package_id: PackageId,
    pub kind: PackageKind,
    pub license: String,
    pub include_dirs: Vec<String>,
    pub lib_dirs: Vec<String>,
    pub bin_dirs: Vec<String>,
}

impl PackageInfo {
    pub fn new(identity: &PackageIdentity, kind: PackageKind, fp: &PackageFingerprint) -> Self {
        let (lib_dirs, bin_dirs) = match kind {
            PackageKind::HeaderOnly => (Vec::new(), Vec::new()),
            PackageKind::Compiled => (vec!["lib".to_owned()], vec!["bin".to_owned()]),
        };
        Self {
            reference: identity.reference(),
            package_id: fp.package_id.clone(),
            kind,
            license: identity.license.clone(),
            include_dirs: vec!["include".to_owned()],
            lib_dirs,
            bin_dirs,
        }
    }

    /// Write `hdrpkg-info.json` into `install_dir`, replacing any previous one.
    pub fn write_to_dir(&self, install_dir: &Path) -> Result<(), CoreError> {
        fs::create_dir_all(install_dir)?;
        let content = serde_json::to_string_pretty(self)?;
        let mut tmp = tempfile::NamedTempFile::new_in(install_dir)?;
        std::io::Write::write_all(&mut tmp, content.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(install_dir.join(PACKAGE_INFO_FILE))
            .map_err(|e| CoreError::Io(e.error))?;
        Ok(())
    }

    pub fn read_from_dir(install_dir: &Path) -> Result<Self, CoreError> {
        let content = fs::read_to_string(install_dir.join(PACKAGE_INFO_FILE))?;
        Ok(serde_json::from_str(&content)?)
    }
}
