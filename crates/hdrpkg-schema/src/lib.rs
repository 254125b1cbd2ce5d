//! Recipe parsing, normalization, build settings, and package fingerprints for hdrpkg.
//!
//! This crate defines the schema layer: TOML recipe parsing (`RecipeV1`),
//! the normalized representation (`NormalizedRecipe`), package identity,
//! build settings collection (`BuildSettings`), the header-only fingerprint
//! rule (`compute_fingerprint`), and built-in recipe presets.

pub mod fingerprint;
pub mod identity;
pub mod normalize;
pub mod preset;
pub mod recipe;
pub mod settings;
pub mod types;

pub use fingerprint::{compute_fingerprint, PackageFingerprint};
pub use identity::{PackageIdentity, PackageKind};
pub use normalize::{normalize_export_path, BuildPlan, ExportRules, NormalizedRecipe};
pub use preset::{get_preset, list_presets, Preset, BUILTIN_PRESETS, DEFAULT_PRESET};
pub use recipe::{
    parse_recipe_file, parse_recipe_str, BuildSection, ExportsSection, PackageSection,
    RecipeError, RecipeV1,
};
pub use settings::{BuildSettings, SettingName, SettingsError};
pub use types::{PackageId, PackageRef, ShortId};
