use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("failed to read recipe file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse recipe: {0}")]
    ParseToml(#[from] toml::de::Error),
    #[error("unsupported recipe_version: {0}, expected 1")]
    UnsupportedVersion(u32),
    #[error("package.{0} must not be empty")]
    EmptyField(&'static str),
    #[error("package.{field} must not contain '/': '{value}'")]
    InvalidKeyPart { field: &'static str, value: String },
    #[error("package.homepage is not an http(s) URL: '{0}'")]
    InvalidHomepage(String),
    #[error("unknown package kind '{0}', expected 'header-only' or 'compiled'")]
    UnknownKind(String),
    #[error("export path '{0}' must be relative and stay inside the source root")]
    InvalidExportPath(String),
    #[error("invalid export pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("unknown build driver '{0}', expected 'cmake' or 'mock'")]
    UnknownDriver(String),
}

/// On-disk recipe describing a header-only package, version 1.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RecipeV1 {
    pub recipe_version: u32,
    pub package: PackageSection,
    #[serde(default)]
    pub exports: ExportsSection,
    #[serde(default)]
    pub build: BuildSection,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PackageSection {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub homepage: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub license: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default = "default_kind")]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ExportsSection {
    #[serde(default)]
    pub header_dirs: Vec<String>,
    #[serde(default = "default_header_extensions")]
    pub header_extensions: Vec<String>,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for ExportsSection {
    fn default() -> Self {
        Self {
            header_dirs: Vec::new(),
            header_extensions: default_header_extensions(),
            files: Vec::new(),
            patterns: Vec::new(),
            exclude: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BuildSection {
    #[serde(default = "default_driver")]
    pub driver: String,
    #[serde(default = "default_program")]
    pub program: String,
    #[serde(default)]
    pub generator: Option<String>,
    #[serde(default)]
    pub configure_args: Vec<String>,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            driver: default_driver(),
            program: default_program(),
            generator: None,
            configure_args: Vec::new(),
        }
    }
}

fn default_kind() -> String {
    "header-only".to_owned()
}

fn default_header_extensions() -> Vec<String> {
    vec!["hpp".to_owned()]
}

fn default_driver() -> String {
    "cmake".to_owned()
}

fn default_program() -> String {
    "cmake".to_owned()
}

pub fn parse_recipe_str(input: &str) -> Result<RecipeV1, RecipeError> {
    Ok(toml::from_str(input)?)
}

pub fn parse_recipe_file(path: impl AsRef<Path>) -> Result<RecipeV1, RecipeError> {
    let content = fs::read_to_string(path)?;
    parse_recipe_str(&content)
}
