use crate::identity::{PackageIdentity, PackageKind};
use crate::recipe::{RecipeError, RecipeV1};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const KNOWN_DRIVERS: &[&str] = &["cmake", "mock"];

/// Canonical, validated representation of a parsed recipe.
///
/// Lists are trimmed, sorted and deduplicated, export paths use forward
/// slashes relative to the source root, and glob patterns are known to
/// compile. This is what the descriptor operates on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizedRecipe {
    pub recipe_version: u32,
    pub identity: PackageIdentity,
    pub kind: PackageKind,
    pub exports: ExportRules,
    pub build: BuildPlan,
}

/// Which files of a source tree make up the source distribution.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExportRules {
    /// Directories scanned recursively for headers.
    pub header_dirs: Vec<String>,
    /// Header suffixes without the leading dot.
    pub header_extensions: Vec<String>,
    /// Auxiliary paths exported unconditionally.
    pub files: Vec<String>,
    pub patterns: Vec<String>,
    pub exclude: Vec<String>,
}

/// How the external build/install driver is invoked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildPlan {
    pub driver: String,
    pub program: String,
    pub generator: Option<String>,
    pub configure_args: Vec<String>,
}

impl RecipeV1 {
    /// Normalize the recipe: validate fields, sort lists, resolve defaults.
    pub fn normalize(&self) -> Result<NormalizedRecipe, RecipeError> {
        if self.recipe_version != 1 {
            return Err(RecipeError::UnsupportedVersion(self.recipe_version));
        }

        let pkg = &self.package;
        let name = key_part(&pkg.name, "name")?;
        let version = key_part(&pkg.version, "version")?;

        let homepage = pkg.homepage.trim().to_owned();
        if !homepage.is_empty() && !is_http_url(&homepage) {
            return Err(RecipeError::InvalidHomepage(homepage));
        }
        let url = match pkg.url.as_deref().map(str::trim) {
            Some(u) if !u.is_empty() => {
                if !is_http_url(u) {
                    return Err(RecipeError::InvalidHomepage(u.to_owned()));
                }
                u.to_owned()
            }
            _ => homepage.clone(),
        };

        let kind = pkg.kind.trim().parse::<PackageKind>()?;

        let identity = PackageIdentity {
            name,
            version,
            author: pkg.author.trim().to_owned(),
            homepage,
            url,
            license: pkg.license.trim().to_owned(),
            description: pkg.description.trim().to_owned(),
            topics: normalize_string_list(&pkg.topics).into_iter().collect(),
        };

        let exports = ExportRules {
            header_dirs: normalize_paths(&self.exports.header_dirs)?,
            header_extensions: normalize_string_list(
                &self
                    .exports
                    .header_extensions
                    .iter()
                    .map(|e| e.trim().trim_start_matches('.').to_owned())
                    .collect::<Vec<_>>(),
            ),
            files: normalize_paths(&self.exports.files)?,
            patterns: normalize_patterns(&self.exports.patterns)?,
            exclude: normalize_patterns(&self.exports.exclude)?,
        };

        let driver = self.build.driver.trim().to_lowercase();
        if !KNOWN_DRIVERS.contains(&driver.as_str()) {
            return Err(RecipeError::UnknownDriver(driver));
        }
        let program = match self.build.program.trim() {
            "" => driver.clone(),
            p => p.to_owned(),
        };

        Ok(NormalizedRecipe {
            recipe_version: self.recipe_version,
            identity,
            kind,
            exports,
            build: BuildPlan {
                driver,
                program,
                generator: self
                    .build
                    .generator
                    .as_deref()
                    .map(str::trim)
                    .filter(|g| !g.is_empty())
                    .map(str::to_owned),
                configure_args: self.build.configure_args.clone(),
            },
        })
    }
}

fn required(value: &str, field: &'static str) -> Result<String, RecipeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RecipeError::EmptyField(field));
    }
    Ok(trimmed.to_owned())
}

/// Name and version join into the `name/version` package key, so neither
/// may contain the separator.
fn key_part(value: &str, field: &'static str) -> Result<String, RecipeError> {
    let part = required(value, field)?;
    if part.contains('/') {
        return Err(RecipeError::InvalidKeyPart { field, value: part });
    }
    Ok(part)
}

fn is_http_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Convert a declared export path to its canonical relative form.
pub fn normalize_export_path(raw: &str) -> Result<String, RecipeError> {
    let unified = raw.trim().replace('\\', "/");
    let stripped = unified.trim_start_matches("./").trim_end_matches('/');
    if stripped.is_empty()
        || stripped.starts_with('/')
        || stripped.split('/').any(|seg| seg == "..")
        || stripped.contains(':')
    {
        return Err(RecipeError::InvalidExportPath(raw.to_owned()));
    }
    Ok(stripped
        .split('/')
        .filter(|seg| !seg.is_empty() && *seg != ".")
        .collect::<Vec<_>>()
        .join("/"))
}

fn normalize_paths(values: &[String]) -> Result<Vec<String>, RecipeError> {
    let set: BTreeSet<String> = values
        .iter()
        .map(|v| normalize_export_path(v))
        .collect::<Result<_, _>>()?;
    Ok(set.into_iter().collect())
}

fn normalize_patterns(values: &[String]) -> Result<Vec<String>, RecipeError> {
    let out = normalize_string_list(values);
    for pattern in &out {
        if pattern.starts_with('/') || pattern.split('/').any(|seg| seg == "..") {
            return Err(RecipeError::InvalidExportPath(pattern.clone()));
        }
        glob::Pattern::new(pattern).map_err(|e| RecipeError::InvalidPattern {
            pattern: pattern.clone(),
            reason: e.msg.to_owned(),
        })?;
    }
    Ok(out)
}

fn normalize_string_list(values: &[String]) -> Vec<String> {
    let mut out: Vec<String> = values
        .iter()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .collect();
    out.sort();
    out.dedup();
    out
}
