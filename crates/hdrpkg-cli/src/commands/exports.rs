use super::{colorize_kind, json_pretty, EXIT_SUCCESS};
use hdrpkg_core::{Descriptor, ExportKind};
use std::path::Path;

pub fn run(descriptor: &Descriptor, root: &Path, json: bool) -> Result<u8, String> {
    let manifest = descriptor
        .enumerate_exports(root)
        .map_err(|e| e.to_string())?;
    if json {
        println!("{}", json_pretty(&manifest)?);
        return Ok(EXIT_SUCCESS);
    }
    for path in manifest.paths() {
        let kind = match manifest.kind_of(path) {
            Some(ExportKind::Header) => "header",
            Some(ExportKind::Auxiliary) => "auxiliary",
            Some(ExportKind::Pattern) => "pattern",
            None => continue,
        };
        let missing = if root.join(path).exists() {
            ""
        } else {
            " (missing)"
        };
        println!("{:<10} {path}{missing}", colorize_kind(kind));
    }
    println!(
        "{} files ({} headers)",
        manifest.len(),
        manifest.headers().count()
    );
    Ok(EXIT_SUCCESS)
}
