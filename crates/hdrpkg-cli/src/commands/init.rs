use super::{json_pretty, DEFAULT_RECIPE, EXIT_SUCCESS};
use dialoguer::Confirm;
use hdrpkg_schema::{get_preset, parse_recipe_str, DEFAULT_PRESET};
use std::io::{stderr, stdin, IsTerminal, Write};
use std::path::Path;
use tempfile::NamedTempFile;

fn write_atomic(dest: &Path, content: &str) -> Result<(), String> {
    let dir = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| format!("write temp file: {e}"))?;
    tmp.write_all(content.as_bytes())
        .map_err(|e| format!("write temp file: {e}"))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| format!("fsync temp file: {e}"))?;
    tmp.persist(dest)
        .map_err(|e| format!("persist recipe: {}", e.error))?;
    Ok(())
}

fn ensure_can_write(dest: &Path, force: bool, is_tty: bool) -> Result<(), String> {
    if !dest.exists() || force {
        return Ok(());
    }
    let refusal = format!("refusing to overwrite existing {} (pass --force)", dest.display());
    if !is_tty {
        return Err(refusal);
    }
    let overwrite = Confirm::new()
        .with_prompt(format!("overwrite {}?", dest.display()))
        .default(false)
        .interact()
        .map_err(|e| format!("prompt failed: {e}"))?;
    if overwrite {
        Ok(())
    } else {
        Err(refusal)
    }
}

/// Write a recipe file seeded from a built-in preset into `dir`.
pub fn run(dir: &Path, preset: Option<&str>, force: bool, json: bool) -> Result<u8, String> {
    let name = preset.unwrap_or(DEFAULT_PRESET);
    let preset = get_preset(name).ok_or_else(|| format!("unknown preset '{name}'"))?;
    parse_recipe_str(preset.recipe)
        .and_then(|r| r.normalize())
        .map_err(|e| format!("recipe error: {e}"))?;

    let dest = dir.join(DEFAULT_RECIPE);
    let is_tty = stdin().is_terminal() && stderr().is_terminal();
    ensure_can_write(&dest, force, is_tty)?;
    write_atomic(&dest, preset.recipe)?;

    if json {
        let payload = serde_json::json!({
            "status": "written",
            "path": dest,
            "preset": name,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!("wrote {} from preset '{name}'", dest.display());
    }
    Ok(EXIT_SUCCESS)
}
