use super::{colorize_kind, json_pretty, EXIT_SUCCESS};
use hdrpkg_core::Descriptor;

pub fn run(descriptor: &Descriptor, json: bool) -> Result<u8, String> {
    let identity = descriptor.declare_identity();
    let kind = descriptor.recipe().kind;
    if json {
        let payload = serde_json::json!({
            "reference": identity.reference(),
            "kind": kind,
            "identity": identity,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!("reference:   {}", identity.reference());
        println!("kind:        {}", colorize_kind(kind.as_str()));
        println!("author:      {}", or_none(&identity.author));
        println!("homepage:    {}", or_none(&identity.homepage));
        println!("license:     {}", or_none(&identity.license));
        let topics: Vec<&str> = identity.topics.iter().map(String::as_str).collect();
        println!("topics:      {}", or_none(&topics.join(", ")));
        if !identity.description.is_empty() {
            println!("description: {}", identity.description);
        }
    }
    Ok(EXIT_SUCCESS)
}

fn or_none(s: &str) -> &str {
    if s.is_empty() {
        "(none)"
    } else {
        s
    }
}
