use crate::CoreError;
use glob::{MatchOptions, Pattern};
use hdrpkg_schema::{ExportRules, RecipeError};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Version-control directories are never part of a source distribution.
const ALWAYS_SKIPPED: &[&str] = &[".git", ".hg", ".svn"];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Why a path is part of the export manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Header,
    Auxiliary,
    Pattern,
}

/// Set of source-root-relative paths that make up the source distribution.
///
/// Paths use `/` separators. Equality is set equality: discovery order never
/// matters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportManifest {
    entries: BTreeMap<String, ExportKind>,
}

impl ExportManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a path. The first classification of a path is kept.
    pub fn insert(&mut self, path: impl Into<String>, kind: ExportKind) {
        self.entries.entry(path.into()).or_insert(kind);
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn kind_of(&self, path: &str) -> Option<ExportKind> {
        self.entries.get(path).copied()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, k)| **k == ExportKind::Header)
            .map(|(p, _)| p.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Scan `root` and build the export manifest described by `rules`.
///
/// The tree is walked on every call; nothing is cached between invocations.
pub fn enumerate_exports(root: &Path, rules: &ExportRules) -> Result<ExportManifest, CoreError> {
    let meta = fs::metadata(root).map_err(|e| CoreError::enumeration(root, e))?;
    if !meta.is_dir() {
        return Err(CoreError::enumeration(
            root,
            std::io::Error::other("not a directory"),
        ));
    }

    let exclude = compile_patterns(&rules.exclude)?;
    let extra = compile_patterns(&rules.patterns)?;
    let mut manifest = ExportManifest::new();

    // No declared header directories means the whole tree is scanned.
    let header_roots: Vec<PathBuf> = if rules.header_dirs.is_empty() {
        vec![root.to_path_buf()]
    } else {
        rules.header_dirs.iter().map(|d| root.join(d)).collect()
    };
    for start in &header_roots {
        if !start.is_dir() {
            warn!("header directory {} not found", start.display());
            continue;
        }
        for rel in walk_files(root, start, &exclude)? {
            if has_extension(&rel, &rules.header_extensions) {
                manifest.insert(rel, ExportKind::Header);
            }
        }
    }

    if !extra.is_empty() {
        for rel in walk_files(root, root, &exclude)? {
            if extra.iter().any(|p| p.matches_with(&rel, MATCH_OPTIONS)) {
                manifest.insert(rel, ExportKind::Pattern);
            }
        }
    }

    for file in &rules.files {
        let path = root.join(file);
        if path.is_dir() {
            for rel in walk_files(root, &path, &exclude)? {
                manifest.insert(rel, ExportKind::Auxiliary);
            }
            continue;
        }
        if !path.exists() {
            warn!("declared export '{file}' does not exist under {}", root.display());
        }
        manifest.insert(file.clone(), ExportKind::Auxiliary);
    }

    debug!(
        "discovered {} exports under {}: {:?}",
        manifest.len(),
        root.display(),
        manifest.paths().collect::<Vec<_>>()
    );
    Ok(manifest)
}

/// Copy every manifest path from `root` into `dest`, preserving relative
/// paths. Declared paths that do not exist are skipped. Returns the number of
/// files copied.
pub fn stage_exports(
    root: &Path,
    manifest: &ExportManifest,
    dest: &Path,
) -> Result<usize, CoreError> {
    fs::create_dir_all(dest)?;
    let mut count = 0;
    for rel in manifest.paths() {
        let src = root.join(rel);
        if !src.is_file() {
            warn!("skipping missing export '{rel}'");
            continue;
        }
        let target = dest.join(rel);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&src, &target)?;
        count += 1;
    }
    Ok(count)
}

fn walk_files(root: &Path, start: &Path, exclude: &[Pattern]) -> Result<Vec<String>, CoreError> {
    let mut out = Vec::new();
    let walker = WalkDir::new(start)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || !(e.file_type().is_dir()
                    && e.file_name()
                        .to_str()
                        .is_some_and(|n| ALWAYS_SKIPPED.contains(&n)))
        });

    for entry in walker {
        let entry = entry.map_err(|e| CoreError::enumeration(root, e.into()))?;
        let file_type = entry.file_type();
        if file_type.is_symlink() {
            // Links to regular files are exported with the target's content.
            if !entry.path().is_file() {
                warn!("skipping symlink {} (not a regular file)", entry.path().display());
                continue;
            }
        } else if !file_type.is_file() {
            continue;
        }
        let rel = relative_slash_path(root, entry.path());
        if exclude.iter().any(|p| p.matches_with(&rel, MATCH_OPTIONS)) {
            continue;
        }
        out.push(rel);
    }
    Ok(out)
}

fn relative_slash_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn has_extension(rel: &str, extensions: &[String]) -> bool {
    Path::new(rel)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|x| x == e))
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>, CoreError> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| {
                CoreError::Recipe(RecipeError::InvalidPattern {
                    pattern: p.clone(),
                    reason: e.msg.to_owned(),
                })
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> ExportRules {
        ExportRules {
            header_dirs: vec!["lib".to_owned()],
            header_extensions: vec!["hpp".to_owned()],
            files: vec!["CMakeLists.txt".to_owned(), "LICENSE.md".to_owned()],
            patterns: Vec::new(),
            exclude: vec!["lib/build/**".to_owned()],
        }
    }

    fn write(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, rel).unwrap();
    }

    #[test]
    fn finds_headers_recursively_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "lib/a.hpp");
        write(dir.path(), "lib/internal/b.hpp");
        write(dir.path(), "lib/notes.txt");
        write(dir.path(), "lib/range.cpp");

        let m = enumerate_exports(dir.path(), &rules()).unwrap();
        let headers: Vec<_> = m.headers().collect();
        assert_eq!(headers, vec!["lib/a.hpp", "lib/internal/b.hpp"]);
        assert!(!m.contains("lib/notes.txt"));
        assert!(!m.contains("lib/range.cpp"));
    }

    #[test]
    fn auxiliary_files_always_listed() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("lib")).unwrap();
        let m = enumerate_exports(dir.path(), &rules()).unwrap();
        assert_eq!(m.kind_of("CMakeLists.txt"), Some(ExportKind::Auxiliary));
        assert_eq!(m.kind_of("LICENSE.md"), Some(ExportKind::Auxiliary));
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn excluded_and_vcs_paths_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "lib/a.hpp");
        write(dir.path(), "lib/build/generated.hpp");
        write(dir.path(), "lib/.git/objects/x.hpp");

        let m = enumerate_exports(dir.path(), &rules()).unwrap();
        assert!(m.contains("lib/a.hpp"));
        assert!(!m.contains("lib/build/generated.hpp"));
        assert!(!m.contains("lib/.git/objects/x.hpp"));
    }

    #[test]
    fn extra_patterns_match_from_root() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "cmake/dummy-config.cmake.in");
        write(dir.path(), "cmake/other.txt");
        let mut r = rules();
        r.patterns = vec!["cmake/*.in".to_owned()];

        let m = enumerate_exports(dir.path(), &r).unwrap();
        assert_eq!(
            m.kind_of("cmake/dummy-config.cmake.in"),
            Some(ExportKind::Pattern)
        );
        assert!(!m.contains("cmake/other.txt"));
    }

    #[test]
    fn missing_root_is_enumeration_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = enumerate_exports(&dir.path().join("absent"), &rules()).unwrap_err();
        assert!(matches!(err, CoreError::SourceEnumeration { .. }));
    }

    #[test]
    fn file_root_is_enumeration_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "plain.txt");
        let err = enumerate_exports(&dir.path().join("plain.txt"), &rules()).unwrap_err();
        assert!(matches!(err, CoreError::SourceEnumeration { .. }));
    }

    #[test]
    fn stage_copies_existing_exports() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        write(src.path(), "lib/a.hpp");
        write(src.path(), "lib/internal/b.hpp");
        write(src.path(), "CMakeLists.txt");

        let m = enumerate_exports(src.path(), &rules()).unwrap();
        let copied = stage_exports(src.path(), &m, dst.path()).unwrap();

        // LICENSE.md is declared but absent.
        assert_eq!(copied, 3);
        assert!(dst.path().join("lib/internal/b.hpp").exists());
        assert!(dst.path().join("CMakeLists.txt").exists());
        assert!(!dst.path().join("LICENSE.md").exists());
    }

    #[test]
    fn empty_header_dirs_scan_whole_root() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.hpp");
        write(dir.path(), "lib/b.hpp");
        write(dir.path(), "lib/build/generated.hpp");
        let mut r = rules();
        r.header_dirs.clear();

        let m = enumerate_exports(dir.path(), &r).unwrap();
        let headers: Vec<_> = m.headers().collect();
        assert_eq!(headers, vec!["a.hpp", "lib/b.hpp"]);
    }

    #[test]
    fn auxiliary_directory_expands_to_filtered_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "cmake/dummy-config.cmake.in");
        write(dir.path(), "cmake/modules/find.cmake");
        write(dir.path(), "cmake/generated/cache.txt");
        write(dir.path(), "cmake/.git/HEAD");
        let mut r = rules();
        r.files = vec!["cmake".to_owned()];
        r.exclude.push("cmake/generated/**".to_owned());

        let m = enumerate_exports(dir.path(), &r).unwrap();
        let paths: Vec<_> = m.paths().collect();
        assert_eq!(
            paths,
            vec!["cmake/dummy-config.cmake.in", "cmake/modules/find.cmake"]
        );

        let dst = tempfile::tempdir().unwrap();
        assert_eq!(stage_exports(dir.path(), &m, dst.path()).unwrap(), 2);
        assert!(!dst.path().join("cmake/generated").exists());
        assert!(!dst.path().join("cmake/.git").exists());
    }

    #[cfg(unix)]
    #[test]
    fn symlink_loops_do_not_recurse() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "lib/a.hpp");
        std::os::unix::fs::symlink(dir.path().join("lib"), dir.path().join("lib/loop")).unwrap();
        let mut r = rules();
        r.files = vec!["lib".to_owned()];

        let m = enumerate_exports(dir.path(), &r).unwrap();
        assert!(m.contains("lib/a.hpp"));
        assert!(!m.paths().any(|p| p.starts_with("lib/loop")));

        let dst = tempfile::tempdir().unwrap();
        assert_eq!(stage_exports(dir.path(), &m, dst.path()).unwrap(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_header_is_exported_with_target_content() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "lib/real.hpp");
        std::os::unix::fs::symlink(dir.path().join("lib/real.hpp"), dir.path().join("lib/alias.hpp"))
            .unwrap();

        let m = enumerate_exports(dir.path(), &rules()).unwrap();
        assert_eq!(m.kind_of("lib/alias.hpp"), Some(ExportKind::Header));

        let dst = tempfile::tempdir().unwrap();
        stage_exports(dir.path(), &m, dst.path()).unwrap();
        let staged = dst.path().join("lib/alias.hpp");
        assert!(!fs::symlink_metadata(&staged).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(staged).unwrap(), "lib/real.hpp");
    }

    #[test]
    fn manifest_equality_ignores_insert_order() {
        let mut a = ExportManifest::new();
        a.insert("x.hpp", ExportKind::Header);
        a.insert("y.hpp", ExportKind::Header);
        let mut b = ExportManifest::new();
        b.insert("y.hpp", ExportKind::Header);
        b.insert("x.hpp", ExportKind::Header);
        assert_eq!(a, b);
    }
}
