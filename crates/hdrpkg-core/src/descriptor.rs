use crate::exports::{enumerate_exports, stage_exports, ExportManifest};
use crate::package_info::PackageInfo;
use crate::CoreError;
use hdrpkg_driver::{BuildDriver, DriverSpec};
use hdrpkg_schema::{
    compute_fingerprint, get_preset, parse_recipe_file, parse_recipe_str, BuildSettings,
    NormalizedRecipe, PackageFingerprint, PackageIdentity,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Packaging descriptor for one header-only library release.
///
/// The descriptor holds only the normalized recipe. Every operation is a
/// function of that recipe plus its explicit arguments; scanning a source
/// tree happens when [`Descriptor::enumerate_exports`] is called, never
/// when the descriptor is constructed.
#[derive(Debug, Clone)]
pub struct Descriptor {
    recipe: NormalizedRecipe,
}

/// Inputs of one install invocation.
#[derive(Debug, Clone)]
pub struct InstallRequest {
    pub source_root: PathBuf,
    pub install_target: PathBuf,
    /// Scratch directory for staged sources and the build tree. A temporary
    /// directory is used when unset.
    pub work_dir: Option<PathBuf>,
    pub settings: BuildSettings,
}

/// Outcome of a successful install.
#[derive(Debug, Clone, Serialize)]
pub struct InstallResult {
    pub fingerprint: PackageFingerprint,
    pub info: PackageInfo,
    pub staged_files: usize,
    pub install_target: PathBuf,
}

impl Descriptor {
    pub fn new(recipe: NormalizedRecipe) -> Self {
        Self { recipe }
    }

    pub fn from_recipe_file(path: &Path) -> Result<Self, CoreError> {
        info!("loading recipe {}", path.display());
        Ok(Self::new(parse_recipe_file(path)?.normalize()?))
    }

    pub fn from_preset(name: &str) -> Result<Self, CoreError> {
        let preset = get_preset(name).ok_or_else(|| CoreError::UnknownPreset(name.to_owned()))?;
        Ok(Self::new(parse_recipe_str(preset.recipe)?.normalize()?))
    }

    pub fn recipe(&self) -> &NormalizedRecipe {
        &self.recipe
    }

    pub fn declare_identity(&self) -> PackageIdentity {
        self.recipe.identity.clone()
    }

    pub fn enumerate_exports(&self, source_root: &Path) -> Result<ExportManifest, CoreError> {
        enumerate_exports(source_root, &self.recipe.exports)
    }

    pub fn compute_fingerprint(&self, settings: &BuildSettings) -> PackageFingerprint {
        compute_fingerprint(&self.recipe.identity, self.recipe.kind, settings)
    }

    /// Write a source distribution of `source_root` into `dest`.
    pub fn export_sources(&self, source_root: &Path, dest: &Path) -> Result<usize, CoreError> {
        let manifest = self.enumerate_exports(source_root)?;
        let copied = stage_exports(source_root, &manifest, dest)?;
        info!(
            "exported {copied} files of {} to {}",
            self.recipe.identity.reference(),
            dest.display()
        );
        Ok(copied)
    }

    /// Stage `manifest` and run configure → build → install through `driver`.
    ///
    /// Each driver phase runs at most once. The first failing phase aborts
    /// the pipeline and its diagnostic is returned unchanged as
    /// [`CoreError::BuildToolFailure`].
    pub fn install(
        &self,
        driver: &dyn BuildDriver,
        manifest: &ExportManifest,
        request: &InstallRequest,
    ) -> Result<InstallResult, CoreError> {
        let fingerprint = self.compute_fingerprint(&request.settings);
        info!(
            "installing {} ({}) into {}",
            self.recipe.identity.reference(),
            fingerprint.short_id,
            request.install_target.display()
        );

        let scratch;
        let work_dir = if let Some(dir) = &request.work_dir {
            dir.clone()
        } else {
            scratch = tempfile::tempdir()?;
            scratch.path().to_path_buf()
        };

        // A reused work dir must not carry files the current manifest dropped.
        let source_dir = work_dir.join("src");
        if source_dir.exists() {
            debug!("clearing stale staging directory {}", source_dir.display());
            std::fs::remove_dir_all(&source_dir)?;
        }
        let staged_files = stage_exports(&request.source_root, manifest, &source_dir)?;
        debug!("staged {staged_files} files into {}", source_dir.display());

        let spec = DriverSpec {
            source_dir,
            build_dir: work_dir.join("build").join(request.settings.build_type()),
            install_prefix: request.install_target.clone(),
            settings: request.settings.clone(),
            plan: self.recipe.build.clone(),
        };

        debug!("driver '{}': configure", driver.name());
        driver.configure(&spec)?;
        debug!("driver '{}': build", driver.name());
        driver.build(&spec)?;
        debug!("driver '{}': install", driver.name());
        driver.install(&spec)?;

        let info = PackageInfo::new(&self.recipe.identity, self.recipe.kind, &fingerprint);
        info.write_to_dir(&request.install_target)?;

        info!(
            "installed {} ({})",
            self.recipe.identity.reference(),
            fingerprint.short_id
        );
        Ok(InstallResult {
            fingerprint,
            info,
            staged_files,
            install_target: request.install_target.clone(),
        })
    }

    /// Full pipeline: enumerate the source tree, then install it.
    pub fn package(
        &self,
        driver: &dyn BuildDriver,
        request: &InstallRequest,
    ) -> Result<InstallResult, CoreError> {
        let manifest = self.enumerate_exports(&request.source_root)?;
        self.install(driver, &manifest, request)
    }
}
