//! Build settings: the `build_type`/`compiler`/`os`/`arch` inputs a package
//! may be fingerprinted against.
//!
//! Settings are collected from three layers, later layers winning:
//! host detection, a profile file, and `key=value` overrides.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("unknown setting '{0}', expected one of: build_type, compiler, os, arch")]
    Unknown(String),
    #[error("setting '{0}' must not be empty")]
    EmptyValue(String),
    #[error("malformed setting override '{0}', expected 'name=value'")]
    MalformedOverride(String),
    #[error("failed to read profile: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse profile: {0}")]
    ParseToml(#[from] toml::de::Error),
}

/// The recognized setting names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingName {
    BuildType,
    Compiler,
    Os,
    Arch,
}

impl SettingName {
    pub const ALL: [SettingName; 4] = [Self::BuildType, Self::Compiler, Self::Os, Self::Arch];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::BuildType => "build_type",
            Self::Compiler => "compiler",
            Self::Os => "os",
            Self::Arch => "arch",
        }
    }
}

impl fmt::Display for SettingName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingName {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|n| n.as_str() == s)
            .ok_or_else(|| SettingsError::Unknown(s.to_owned()))
    }
}

/// A set of build settings. Unset settings are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildSettings(BTreeMap<SettingName, String>);

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProfileFile {
    #[serde(default)]
    settings: BTreeMap<String, String>,
}

impl BuildSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings describing the machine this process runs on.
    pub fn detect_host() -> Self {
        let mut s = Self::new();
        s.0.insert(SettingName::Os, host_os().to_owned());
        s.0.insert(SettingName::Arch, host_arch().to_owned());
        s.0.insert(SettingName::BuildType, "Release".to_owned());
        s
    }

    /// Load the `[settings]` table of a profile file.
    pub fn from_profile_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_profile_str(&content)
    }

    pub fn from_profile_str(input: &str) -> Result<Self, SettingsError> {
        let profile: ProfileFile = toml::from_str(input)?;
        let mut s = Self::new();
        for (name, value) in &profile.settings {
            s.set(name, value)?;
        }
        Ok(s)
    }

    pub fn set(&mut self, name: &str, value: &str) -> Result<(), SettingsError> {
        let key: SettingName = name.trim().parse()?;
        let value = value.trim();
        if value.is_empty() {
            return Err(SettingsError::EmptyValue(key.to_string()));
        }
        self.0.insert(key, value.to_owned());
        Ok(())
    }

    /// Apply a `name=value` override as given on the command line.
    pub fn apply_override(&mut self, spec: &str) -> Result<(), SettingsError> {
        let Some((name, value)) = spec.split_once('=') else {
            return Err(SettingsError::MalformedOverride(spec.to_owned()));
        };
        self.set(name, value)
    }

    /// Overlay `other` on top of `self`; values in `other` win.
    #[must_use]
    pub fn merged(mut self, other: &BuildSettings) -> Self {
        for (k, v) in &other.0 {
            self.0.insert(*k, v.clone());
        }
        self
    }

    pub fn get(&self, name: SettingName) -> Option<&str> {
        self.0.get(&name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SettingName, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Build type to hand to the driver, `Release` when unset.
    pub fn build_type(&self) -> &str {
        self.get(SettingName::BuildType).unwrap_or("Release")
    }
}

fn host_os() -> &'static str {
    match std::env::consts::OS {
        "linux" => "Linux",
        "macos" => "Macos",
        "windows" => "Windows",
        "freebsd" => "FreeBSD",
        other => other,
    }
}

fn host_arch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "x86_64",
        "x86" => "x86",
        "aarch64" => "armv8",
        "arm" => "armv7",
        other => other,
    }
}
