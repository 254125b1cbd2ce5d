use hdrpkg_core::{CoreError, Descriptor, ExportKind, InstallRequest, PackageInfo};
use hdrpkg_driver::mock::MockDriver;
use hdrpkg_driver::{DriverError, Phase};
use hdrpkg_schema::{parse_recipe_str, BuildSettings, DEFAULT_PRESET};
use std::fs;
use std::path::Path;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A trimmed-down cppitertools checkout.
fn source_tree(root: &Path) {
    write(root, "cppitertools/range.hpp", "#pragma once\n");
    write(root, "cppitertools/zip.hpp", "#pragma once\n");
    write(root, "cppitertools/internal/iterbase.hpp", "#pragma once\n");
    write(root, "cppitertools/internal/iteratoriterator.hpp", "#pragma once\n");
    write(root, "CMakeLists.txt", "cmake_minimum_required(VERSION 3.12)\n");
    write(root, "cmake/dummy-config.cmake.in", "@PACKAGE_INIT@\n");
    write(root, "LICENSE.md", "BSD 2-Clause\n");
    write(root, "test/test_range.cpp", "int main() {}\n");
    write(root, "build/Release/CMakeCache.txt", "cache\n");
}

fn descriptor() -> Descriptor {
    Descriptor::from_preset(DEFAULT_PRESET).unwrap()
}

fn settings(pairs: &[(&str, &str)]) -> BuildSettings {
    let mut s = BuildSettings::new();
    for (k, v) in pairs {
        s.set(k, v).unwrap();
    }
    s
}

#[test]
fn fingerprint_is_invariant_under_settings() {
    let d = descriptor();
    let configs = [
        settings(&[]),
        settings(&[("build_type", "Debug")]),
        settings(&[("build_type", "Release"), ("compiler", "gcc"), ("os", "Linux"), ("arch", "x86_64")]),
        settings(&[("compiler", "msvc"), ("os", "Windows"), ("arch", "x86")]),
        settings(&[("compiler", "apple-clang"), ("os", "Macos"), ("arch", "armv8")]),
        BuildSettings::detect_host(),
    ];
    let first = d.compute_fingerprint(&configs[0]);
    for s in &configs[1..] {
        assert_eq!(d.compute_fingerprint(s), first, "settings {s:?} changed the fingerprint");
    }
}

#[test]
fn enumeration_is_idempotent() {
    let root = tempfile::tempdir().unwrap();
    source_tree(root.path());
    let d = descriptor();

    let a = d.enumerate_exports(root.path()).unwrap();
    let b = d.enumerate_exports(root.path()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn new_header_appears_on_rescan() {
    let root = tempfile::tempdir().unwrap();
    write(root.path(), "cppitertools/a.hpp", "");
    let d = descriptor();

    let before = d.enumerate_exports(root.path()).unwrap();
    assert!(before.contains("cppitertools/a.hpp"));
    assert!(!before.contains("cppitertools/b.hpp"));

    write(root.path(), "cppitertools/b.hpp", "");
    let after = d.enumerate_exports(root.path()).unwrap();
    assert!(after.contains("cppitertools/a.hpp"));
    assert!(after.contains("cppitertools/b.hpp"));
}

#[test]
fn root_level_headers_found_without_header_dirs() {
    let recipe = "recipe_version = 1\n[package]\nname = \"flat\"\nversion = \"1.0\"\n";
    let d = Descriptor::new(parse_recipe_str(recipe).unwrap().normalize().unwrap());
    let root = tempfile::tempdir().unwrap();
    write(root.path(), "a.hpp", "");

    let before = d.enumerate_exports(root.path()).unwrap();
    assert_eq!(before.headers().collect::<Vec<_>>(), vec!["a.hpp"]);

    write(root.path(), "b.hpp", "");
    let after = d.enumerate_exports(root.path()).unwrap();
    assert_eq!(after.headers().collect::<Vec<_>>(), vec!["a.hpp", "b.hpp"]);
}

#[test]
fn auxiliary_paths_present_regardless_of_headers() {
    let d = descriptor();
    let aux = ["CMakeLists.txt", "cmake/dummy-config.cmake.in", "LICENSE.md"];

    let empty = tempfile::tempdir().unwrap();
    let full = tempfile::tempdir().unwrap();
    source_tree(full.path());

    for root in [empty.path(), full.path()] {
        let m = d.enumerate_exports(root).unwrap();
        for path in aux {
            assert_eq!(m.kind_of(path), Some(ExportKind::Auxiliary), "{path} missing");
        }
    }
}

#[test]
fn manifest_contains_headers_but_no_artifacts_or_tests() {
    let root = tempfile::tempdir().unwrap();
    source_tree(root.path());
    let m = descriptor().enumerate_exports(root.path()).unwrap();

    let headers: Vec<_> = m.headers().collect();
    assert_eq!(
        headers,
        vec![
            "cppitertools/internal/iterbase.hpp",
            "cppitertools/internal/iteratoriterator.hpp",
            "cppitertools/range.hpp",
            "cppitertools/zip.hpp",
        ]
    );
    assert!(!m.contains("test/test_range.cpp"));
    assert!(!m.contains("build/Release/CMakeCache.txt"));
    assert_eq!(m.len(), 7);
}

#[test]
fn install_failure_is_single_terminal_build_tool_failure() {
    let root = tempfile::tempdir().unwrap();
    let target = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    source_tree(root.path());

    let d = descriptor();
    let driver = MockDriver::failing_on(Phase::Install);
    let request = InstallRequest {
        source_root: root.path().to_path_buf(),
        install_target: target.path().join("pkg"),
        work_dir: Some(work.path().to_path_buf()),
        settings: BuildSettings::detect_host(),
    };

    let err = d.package(&driver, &request).unwrap_err();
    match err {
        CoreError::BuildToolFailure(DriverError::ToolFailed { phase, diagnostic, .. }) => {
            assert_eq!(phase, Phase::Install);
            assert_eq!(diagnostic, "mock install failure");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(
        driver.calls(),
        vec![Phase::Configure, Phase::Build, Phase::Install]
    );
    assert!(PackageInfo::read_from_dir(&request.install_target).is_err());
}

#[test]
fn configure_failure_prevents_build_and_install() {
    let root = tempfile::tempdir().unwrap();
    let target = tempfile::tempdir().unwrap();
    source_tree(root.path());

    let driver = MockDriver::failing_on(Phase::Configure);
    let request = InstallRequest {
        source_root: root.path().to_path_buf(),
        install_target: target.path().to_path_buf(),
        work_dir: None,
        settings: BuildSettings::new(),
    };

    let err = descriptor().package(&driver, &request).unwrap_err();
    assert!(matches!(err, CoreError::BuildToolFailure(_)));
    assert_eq!(driver.calls(), vec![Phase::Configure]);
}

#[test]
fn successful_install_writes_package_info() {
    let root = tempfile::tempdir().unwrap();
    let target = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    source_tree(root.path());

    let d = descriptor();
    let driver = MockDriver::new();
    let request = InstallRequest {
        source_root: root.path().to_path_buf(),
        install_target: target.path().to_path_buf(),
        work_dir: Some(work.path().to_path_buf()),
        settings: settings(&[("build_type", "Debug")]),
    };

    let result = d.package(&driver, &request).unwrap();
    assert_eq!(result.staged_files, 7);
    assert_eq!(result.fingerprint, d.compute_fingerprint(&BuildSettings::new()));
    assert!(work.path().join("build/Debug/mock-cache.txt").exists());
    assert!(target
        .path()
        .join("include/cppitertools/internal/iterbase.hpp")
        .exists());

    let info = PackageInfo::read_from_dir(target.path()).unwrap();
    assert_eq!(info.reference, "cppitertools/3.0");
    assert!(info.lib_dirs.is_empty());
    assert!(info.bin_dirs.is_empty());
}

#[test]
fn reused_work_dir_does_not_install_removed_headers() {
    let root = tempfile::tempdir().unwrap();
    let work = tempfile::tempdir().unwrap();
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    source_tree(root.path());
    write(root.path(), "cppitertools/old.hpp", "#pragma once\n");

    let d = descriptor();
    let request = |target: &Path| InstallRequest {
        source_root: root.path().to_path_buf(),
        install_target: target.to_path_buf(),
        work_dir: Some(work.path().to_path_buf()),
        settings: BuildSettings::new(),
    };

    d.package(&MockDriver::new(), &request(first.path())).unwrap();
    assert!(first.path().join("include/cppitertools/old.hpp").exists());

    fs::remove_file(root.path().join("cppitertools/old.hpp")).unwrap();
    let result = d.package(&MockDriver::new(), &request(second.path())).unwrap();
    assert_eq!(result.staged_files, 7);
    assert!(!work.path().join("src/cppitertools/old.hpp").exists());
    assert!(!second.path().join("include/cppitertools/old.hpp").exists());
    assert!(second.path().join("include/cppitertools/range.hpp").exists());
}

#[test]
fn unreadable_root_is_source_enumeration_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = descriptor()
        .enumerate_exports(&dir.path().join("does-not-exist"))
        .unwrap_err();
    assert!(matches!(err, CoreError::SourceEnumeration { .. }));
}

#[test]
fn identity_is_non_empty_and_stable() {
    let d = descriptor();
    let a = d.declare_identity();
    let b = d.declare_identity();
    assert!(!a.name.is_empty());
    assert!(!a.version.is_empty());
    assert_eq!(a, b);
    assert_eq!(a.homepage, "https://github.com/ryanhaining/cppitertools");
    assert!(a.topics.contains("itertools"));
}

#[test]
fn export_sources_writes_distribution() {
    let root = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    source_tree(root.path());

    let copied = descriptor()
        .export_sources(root.path(), dest.path())
        .unwrap();
    assert_eq!(copied, 7);
    assert!(dest.path().join("cmake/dummy-config.cmake.in").exists());
    assert!(dest.path().join("LICENSE.md").exists());
    assert!(!dest.path().join("test").exists());
}
