use serde::Serialize;

/// A recipe shipped inside the binary.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    pub recipe: &'static str,
}

pub const DEFAULT_PRESET: &str = "cppitertools";

pub const BUILTIN_PRESETS: &[Preset] = &[Preset {
    name: "cppitertools",
    description: "Range-based for loop add-ons inspired by Python's itertools (header-only)",
    recipe: r#"recipe_version = 1

[package]
name = "cppitertools"
version = "3.0"
author = "Ryan Haining <haining.cpp@gmail.com>"
homepage = "https://github.com/ryanhaining/cppitertools"
license = "BSD 2-Clause 'Simplified' License"
description = "Range-based for loop add-ons inspired by the Python builtins and itertools library. Like itertools and the Python3 builtins, this library uses lazy evaluation wherever possible."
topics = ["itertools", "cppitertools"]
kind = "header-only"

[exports]
# The scan is recursive; internal/ is listed so the exported set names it.
header_dirs = ["cppitertools", "cppitertools/internal"]
header_extensions = ["hpp"]
files = ["CMakeLists.txt", "cmake/dummy-config.cmake.in", "LICENSE.md"]
exclude = ["build/**"]

[build]
driver = "cmake"
program = "cmake"
"#,
}];

pub fn get_preset(name: &str) -> Option<&'static Preset> {
    BUILTIN_PRESETS.iter().find(|p| p.name == name)
}

pub fn list_presets() -> &'static [Preset] {
    BUILTIN_PRESETS
}
