use crate::identity::{PackageIdentity, PackageKind};
use crate::settings::BuildSettings;
use crate::types::{PackageId, ShortId};
use serde::Serialize;

/// Binary-compatibility identity of a package build.
///
/// Two configurations with equal fingerprints may share one installed copy.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PackageFingerprint {
    pub package_id: PackageId,
    pub short_id: ShortId,
}

/// Compute the package fingerprint for the given settings.
///
/// A header-only package produces no compiled artifact, so the settings are
/// never fed to the hasher: every configuration maps to the same id. Compiled
/// packages hash each setting in name order. Every hashed field is
/// newline-terminated.
pub fn compute_fingerprint(
    identity: &PackageIdentity,
    kind: PackageKind,
    settings: &BuildSettings,
) -> PackageFingerprint {
    let mut hasher = blake3::Hasher::new();

    hasher.update(format!("package:{}\n", identity.reference()).as_bytes());
    hasher.update(format!("package_type:{kind}\n").as_bytes());

    if kind == PackageKind::Compiled {
        for (name, value) in settings.iter() {
            hasher.update(format!("setting:{name}={value}\n").as_bytes());
        }
    }

    let hex = hasher.finalize().to_hex().to_string();
    let short = hex[..12].to_owned();

    PackageFingerprint {
        package_id: PackageId::new(hex),
        short_id: ShortId::new(short),
    }
}
