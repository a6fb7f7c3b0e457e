// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Uniform view of an extracted package. */

use {
    crate::{
        archive::ArchiveKind,
        build_info::BuildInfo,
        error::Result,
        nuspec::{Nuspec, NuspecMetadata, NUSPEC_EXTENSION},
    },
    std::path::{Path, PathBuf},
    walkdir::WalkDir,
};

/// Native pre-install script, relative to the scratch root.
pub const NATIVE_PRE_SCRIPT: &str = "scripts/preinstall.ps1";
/// Native post-install script.
pub const NATIVE_POST_SCRIPT: &str = "scripts/postinstall.ps1";
/// Foreign pre-install script.
pub const FOREIGN_PRE_SCRIPT: &str = "tools/chocolateyBeforeInstall.ps1";
/// Foreign install script, run as the post phase.
pub const FOREIGN_POST_SCRIPT: &str = "tools/chocolateyInstall.ps1";

/// Payload subtree of native packages.
pub const NATIVE_PAYLOAD_DIR: &str = "payload";

/// Foreign metadata subtrees never mirrored to the destination.
pub const FOREIGN_METADATA_DIRS: &[&str] = &["_rels", "package", "tools"];

/// Everything known about one extracted package.
///
/// Instances live for the duration of a single invocation and are the
/// input to classification and orchestration. The scratch directory is
/// owned by the orchestrator, not by this record.
#[derive(Clone, Debug)]
pub struct PackageInfo {
    pub kind: ArchiveKind,
    pub archive_path: PathBuf,
    pub scratch_dir: PathBuf,

    /// Present when `kind` is native. Absence of `build-info.yaml` still
    /// yields an all-default instance.
    pub build_info: Option<BuildInfo>,

    /// Present when `kind` is foreign and a nuspec was found.
    pub nuspec: Option<NuspecMetadata>,

    pub has_pre_native: bool,
    pub has_post_native: bool,
    pub has_pre_foreign: bool,
    pub has_post_foreign: bool,

    /// Payload-relative paths, for display and classification. The mirror
    /// walks the filesystem itself.
    pub payload_files: Vec<PathBuf>,

    /// Total payload byte size, captured at assembly time since the
    /// scratch directory may be gone by the time it is displayed.
    pub payload_bytes: u64,
}

impl PackageInfo {
    /// Assemble a `PackageInfo` from an extracted scratch directory.
    pub fn from_scratch_dir(
        logger: &slog::Logger,
        kind: ArchiveKind,
        archive_path: &Path,
        scratch: &Path,
    ) -> Result<Self> {
        let (build_info, nuspec) = match kind {
            ArchiveKind::Native => (Some(BuildInfo::from_scratch_dir(scratch)?), None),
            ArchiveKind::Foreign => (
                None,
                Nuspec::from_scratch_dir(logger, scratch)?.map(|n| n.metadata),
            ),
        };

        let payload_files = match kind {
            ArchiveKind::Native => list_files(&scratch.join(NATIVE_PAYLOAD_DIR))?,
            ArchiveKind::Foreign => foreign_payload_files(scratch)?,
        };

        let payload_source = match kind {
            ArchiveKind::Native => scratch.join(NATIVE_PAYLOAD_DIR),
            ArchiveKind::Foreign => scratch.to_path_buf(),
        };
        let payload_bytes = payload_files
            .iter()
            .filter_map(|rel| std::fs::metadata(payload_source.join(rel)).ok())
            .map(|m| m.len())
            .sum();

        Ok(Self {
            kind,
            archive_path: archive_path.to_path_buf(),
            scratch_dir: scratch.to_path_buf(),
            build_info,
            nuspec,
            has_pre_native: scratch.join(NATIVE_PRE_SCRIPT).is_file(),
            has_post_native: scratch.join(NATIVE_POST_SCRIPT).is_file(),
            has_pre_foreign: scratch.join(FOREIGN_PRE_SCRIPT).is_file(),
            has_post_foreign: scratch.join(FOREIGN_POST_SCRIPT).is_file(),
            payload_files,
            payload_bytes,
        })
    }

    /// Root directory the payload is mirrored from.
    pub fn payload_root(&self) -> PathBuf {
        match self.kind {
            ArchiveKind::Native => self.scratch_dir.join(NATIVE_PAYLOAD_DIR),
            ArchiveKind::Foreign => self.scratch_dir.clone(),
        }
    }

    pub fn has_any_script(&self) -> bool {
        self.has_pre_native || self.has_post_native || self.has_pre_foreign || self.has_post_foreign
    }

    pub fn name(&self) -> String {
        match self.kind {
            ArchiveKind::Native => self
                .build_info
                .as_ref()
                .map(|b| b.name.clone())
                .unwrap_or_default(),
            ArchiveKind::Foreign => self
                .nuspec
                .as_ref()
                .map(|n| n.id.clone())
                .unwrap_or_default(),
        }
    }

    pub fn version(&self) -> String {
        self.field(|b| b.version.clone(), |n| n.version.clone())
    }

    pub fn description(&self) -> String {
        self.field(|b| b.description.clone(), |n| n.description.clone())
    }

    pub fn author(&self) -> String {
        self.field(|b| b.author.clone(), |n| n.authors.clone())
    }

    pub fn license(&self) -> String {
        self.field(|b| b.license.clone(), |n| n.license_url.clone())
    }

    pub fn restart_action(&self) -> String {
        self.field(|b| b.restart_action.clone(), |_| String::new())
    }

    fn field(
        &self,
        native: impl Fn(&BuildInfo) -> String,
        foreign: impl Fn(&NuspecMetadata) -> String,
    ) -> String {
        match self.kind {
            ArchiveKind::Native => self.build_info.as_ref().map(native).unwrap_or_default(),
            ArchiveKind::Foreign => self.nuspec.as_ref().map(foreign).unwrap_or_default(),
        }
    }
}

/// Enumerate files under `root` as root-relative paths, sorted.
fn list_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Ok(vec![]);
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;

        if entry.file_type().is_file() {
            if let Ok(rel) = entry.path().strip_prefix(root) {
                files.push(rel.to_path_buf());
            }
        }
    }

    Ok(files)
}

/// Enumerate a foreign package's payload: everything at the scratch root
/// outside the metadata subtrees and not a nuspec document.
fn foreign_payload_files(scratch: &Path) -> Result<Vec<PathBuf>> {
    Ok(list_files(scratch)?
        .into_iter()
        .filter(|rel| {
            let in_metadata_dir = rel
                .components()
                .next()
                .map(|c| {
                    FOREIGN_METADATA_DIRS
                        .iter()
                        .any(|d| c.as_os_str().eq_ignore_ascii_case(d))
                })
                .unwrap_or(false);

            let is_nuspec = rel
                .extension()
                .map(|e| e.eq_ignore_ascii_case(NUSPEC_EXTENSION))
                .unwrap_or(false);

            !in_metadata_dir && !is_nuspec
        })
        .collect())
}
