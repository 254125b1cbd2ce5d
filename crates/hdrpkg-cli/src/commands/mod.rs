pub mod completions;
pub mod export;
pub mod exports;
pub mod fingerprint;
pub mod identity;
pub mod init;
pub mod install;
pub mod man_pages;
pub mod presets;

use hdrpkg_core::Descriptor;
use hdrpkg_schema::{BuildSettings, DEFAULT_PRESET};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_RECIPE_ERROR: u8 = 2;
pub const EXIT_SOURCE_ERROR: u8 = 3;
pub const EXIT_BUILD_TOOL_FAILURE: u8 = 4;

pub const DEFAULT_RECIPE: &str = "hdrpkg.toml";

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .expect("valid template")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(msg.to_owned());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn spin_ok(pb: &ProgressBar, msg: &str) {
    pb.set_style(ProgressStyle::with_template("{msg}").expect("valid template"));
    pb.finish_with_message(format!("✓ {msg}"));
}

pub fn spin_fail(pb: &ProgressBar, msg: &str) {
    pb.set_style(ProgressStyle::with_template("{msg}").expect("valid template"));
    pb.finish_with_message(format!("✗ {msg}"));
}

pub fn colorize_kind(kind: &str) -> String {
    use console::Style;
    match kind {
        "header" | "header-only" => Style::new().green().apply_to(kind).to_string(),
        "auxiliary" => Style::new().yellow().apply_to(kind).to_string(),
        "pattern" => Style::new().cyan().apply_to(kind).to_string(),
        "compiled" => Style::new().blue().apply_to(kind).to_string(),
        other => other.to_owned(),
    }
}

/// Pick the descriptor: an explicit preset, an explicit recipe file,
/// `./hdrpkg.toml` when present, or the default preset.
pub fn load_descriptor(recipe: Option<&Path>, preset: Option<&str>) -> Result<Descriptor, String> {
    if let Some(name) = preset {
        return Descriptor::from_preset(name).map_err(|e| e.to_string());
    }
    if let Some(path) = recipe {
        return Descriptor::from_recipe_file(path).map_err(|e| e.to_string());
    }
    let local = Path::new(DEFAULT_RECIPE);
    if local.exists() {
        return Descriptor::from_recipe_file(local).map_err(|e| e.to_string());
    }
    info!("no {DEFAULT_RECIPE} found, using built-in preset '{DEFAULT_PRESET}'");
    Descriptor::from_preset(DEFAULT_PRESET).map_err(|e| e.to_string())
}

/// Host detection, then the profile, then `name=value` overrides.
pub fn collect_settings(
    profile: Option<&Path>,
    overrides: &[String],
) -> Result<BuildSettings, String> {
    let mut settings = BuildSettings::detect_host();
    if let Some(path) = profile {
        let from_profile = BuildSettings::from_profile_file(path)
            .map_err(|e| format!("settings error: {e}"))?;
        settings = settings.merged(&from_profile);
    }
    for spec in overrides {
        settings
            .apply_override(spec)
            .map_err(|e| format!("settings error: {e}"))?;
    }
    Ok(settings)
}

/// Map an error message to its process exit code.
pub fn exit_code_for(msg: &str) -> u8 {
    if msg.starts_with("recipe error:")
        || msg.starts_with("settings error:")
        || msg.starts_with("failed to read recipe")
        || msg.starts_with("failed to parse recipe")
        || msg.starts_with("unknown preset")
    {
        EXIT_RECIPE_ERROR
    } else if msg.starts_with("cannot enumerate source root") {
        EXIT_SOURCE_ERROR
    } else if msg.starts_with("build tool failure:") || msg.starts_with("missing prerequisites") {
        EXIT_BUILD_TOOL_FAILURE
    } else {
        EXIT_FAILURE
    }
}
