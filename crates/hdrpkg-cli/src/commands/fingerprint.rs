use super::{collect_settings, json_pretty, EXIT_SUCCESS};
use hdrpkg_core::Descriptor;
use std::path::Path;

pub fn run(
    descriptor: &Descriptor,
    profile: Option<&Path>,
    overrides: &[String],
    json: bool,
) -> Result<u8, String> {
    let settings = collect_settings(profile, overrides)?;
    let fp = descriptor.compute_fingerprint(&settings);
    if json {
        let payload = serde_json::json!({
            "reference": descriptor.declare_identity().reference(),
            "kind": descriptor.recipe().kind,
            "package_id": fp.package_id,
            "short_id": fp.short_id,
            "settings": settings,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!("package_id: {}", fp.package_id);
        println!("short_id:   {}", fp.short_id);
        for (name, value) in settings.iter() {
            println!("  {name}={value}");
        }
    }
    Ok(EXIT_SUCCESS)
}
