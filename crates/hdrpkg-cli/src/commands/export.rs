use super::{json_pretty, EXIT_SUCCESS};
use hdrpkg_core::Descriptor;
use std::path::Path;

pub fn run(descriptor: &Descriptor, root: &Path, dest: &Path, json: bool) -> Result<u8, String> {
    let copied = descriptor
        .export_sources(root, dest)
        .map_err(|e| e.to_string())?;
    if json {
        let payload = serde_json::json!({
            "reference": descriptor.declare_identity().reference(),
            "destination": dest,
            "files": copied,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!("exported {copied} files to {}", dest.display());
    }
    Ok(EXIT_SUCCESS)
}
