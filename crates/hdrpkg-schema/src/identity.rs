use crate::recipe::RecipeError;
use crate::types::PackageRef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Published metadata of a package. Immutable for a given `name/version`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackageIdentity {
    pub name: String,
    pub version: String,
    pub author: String,
    pub homepage: String,
    pub url: String,
    pub license: String,
    pub description: String,
    pub topics: BTreeSet<String>,
}

impl PackageIdentity {
    /// Stable `name/version` key.
    pub fn reference(&self) -> PackageRef {
        PackageRef::new(format!("{}/{}", self.name, self.version))
    }
}

/// Whether a package produces a compiled artifact.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum PackageKind {
    HeaderOnly,
    Compiled,
}

impl PackageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HeaderOnly => "header-only",
            Self::Compiled => "compiled",
        }
    }
}

impl fmt::Display for PackageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageKind {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "header-only" | "header-library" => Ok(Self::HeaderOnly),
            "compiled" | "library" => Ok(Self::Compiled),
            other => Err(RecipeError::UnknownKind(other.to_owned())),
        }
    }
}
