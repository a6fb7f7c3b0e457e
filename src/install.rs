// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! The install lifecycle.

One invocation walks a linear state machine:

```text
OpenArchive -> Extract -> ParseMeta -> Classify ->
  PrivilegeCheck -> PreScript -> Mirror -> PostScript -> Cleanup
```

Any failure jumps straight to cleanup. The scratch directory is removed
on every exit path after it is created; a cleanup failure is logged and
never masks the primary result. Partial state in the destination from a
failed mirror is not rolled back.
*/

use {
    crate::{
        archive::{extract_archive, validate_archive, ArchiveKind},
        classify::{classify, InstallMode},
        elevation::{is_elevated, requires_elevation},
        error::{InstallerError, Result},
        mirror::{mirror_tree, mirror_tree_filtered},
        nuspec::NUSPEC_EXTENSION,
        options::{InstallOptions, Verbosity},
        package_info::{
            PackageInfo, FOREIGN_METADATA_DIRS, FOREIGN_POST_SCRIPT, FOREIGN_PRE_SCRIPT,
            NATIVE_PAYLOAD_DIR, NATIVE_POST_SCRIPT, NATIVE_PRE_SCRIPT,
        },
        scripts::{run_script, ScriptJob, ScriptKind, ScriptPhase},
        shim::materialize_shim,
        target::resolve_target_root,
    },
    slog::{info, warn},
    std::path::{Path, PathBuf},
};

/// What one successful invocation did.
#[derive(Clone, Debug)]
pub struct InstallReport {
    pub mode: InstallMode,
    pub destination: Option<PathBuf>,
    pub files_copied: u64,
    pub script_log: Vec<String>,
}

/// Run a complete install for the given options.
pub fn run_install(logger: &slog::Logger, options: &InstallOptions) -> Result<InstallReport> {
    let package = options
        .package
        .as_deref()
        .ok_or_else(|| InstallerError::BadInput("no package archive given (--pkg)".into()))?;

    let kind = ArchiveKind::from_path(package)?;

    // Nothing is extracted yet; a corrupt archive needs no cleanup.
    validate_archive(package)?;

    let scratch = tempfile::Builder::new()
        .prefix("installer-scratch-")
        .tempdir()?;

    let result = install_extracted(logger, options, kind, package, scratch.path());

    cleanup_scratch(logger, scratch);

    result
}

/// Extract a package for inspection only. The caller receives the
/// assembled [PackageInfo]; the scratch directory is cleaned up before
/// returning.
pub fn inspect_package(logger: &slog::Logger, package: &Path) -> Result<PackageInfo> {
    let kind = ArchiveKind::from_path(package)?;

    validate_archive(package)?;

    let scratch = tempfile::Builder::new()
        .prefix("installer-scratch-")
        .tempdir()?;

    let result = extract_archive(logger, package, scratch.path())
        .and_then(|_| PackageInfo::from_scratch_dir(logger, kind, package, scratch.path()));

    cleanup_scratch(logger, scratch);

    result
}

fn cleanup_scratch(logger: &slog::Logger, scratch: tempfile::TempDir) {
    let path = scratch.path().to_path_buf();

    if let Err(e) = scratch.close() {
        warn!(
            logger,
            "unable to remove scratch directory {}: {}",
            path.display(),
            e
        );
    }
}

fn install_extracted(
    logger: &slog::Logger,
    options: &InstallOptions,
    kind: ArchiveKind,
    package: &Path,
    scratch: &Path,
) -> Result<InstallReport> {
    extract_archive(logger, package, scratch)?;

    let info = PackageInfo::from_scratch_dir(logger, kind, package, scratch)?;

    let target_root = resolve_target_root(&options.target)?;
    let mode = classify(&info, &target_root);

    if options.verbosity >= Verbosity::Verbose {
        info!(
            logger,
            "{} package {} classified as {:?}",
            info.kind,
            package.display(),
            mode
        );
    }

    privilege_check(&info, &mode)?;

    let mut script_log = Vec::new();

    if let Some(job) = select_script(&info, ScriptPhase::Pre)? {
        script_log.extend(run_script(logger, &job, options.verbosity)?);
    }

    let (destination, files_copied) = match &mode {
        InstallMode::Copy { destination } => {
            let copied = match info.kind {
                ArchiveKind::Native => {
                    mirror_tree(logger, &info.payload_root(), destination)?
                }
                ArchiveKind::Foreign => mirror_tree_filtered(
                    logger,
                    &info.payload_root(),
                    destination,
                    foreign_mirror_filter,
                )?,
            };

            (Some(destination.clone()), copied)
        }
        InstallMode::ScriptOnly | InstallMode::Installer => (None, 0),
    };

    if let Some(job) = select_script(&info, ScriptPhase::Post)? {
        script_log.extend(run_script(logger, &job, options.verbosity)?);
    }

    if options.verbosity == Verbosity::DumpLog {
        for line in &script_log {
            info!(logger, "{}", line);
        }
    }

    info!(
        logger,
        "installed {}: {} files copied{}",
        info.name(),
        files_copied,
        destination
            .as_ref()
            .map(|d| format!(" to {}", d.display()))
            .unwrap_or_default()
    );

    Ok(InstallReport {
        mode,
        destination,
        files_copied,
        script_log,
    })
}

/// Abort before any side effect when the planned work needs rights the
/// process does not hold.
fn privilege_check(info: &PackageInfo, mode: &InstallMode) -> Result<()> {
    if is_elevated() {
        return Ok(());
    }

    // Scripts may touch arbitrary state and always presume elevation.
    if info.has_any_script() {
        return Err(InstallerError::NeedsElevation(
            "package scripts require administrator rights".into(),
        ));
    }

    if let InstallMode::Copy { destination } = mode {
        if let Some(reason) = requires_elevation(destination) {
            return Err(InstallerError::NeedsElevation(reason));
        }
    }

    Ok(())
}

/// Pick the script to run for a phase. Native wins over foreign when a
/// package carries both; at most one script runs per phase.
fn select_script(info: &PackageInfo, phase: ScriptPhase) -> Result<Option<ScriptJob>> {
    let (has_native, native_rel, has_foreign, foreign_rel) = match phase {
        ScriptPhase::Pre => (
            info.has_pre_native,
            NATIVE_PRE_SCRIPT,
            info.has_pre_foreign,
            FOREIGN_PRE_SCRIPT,
        ),
        ScriptPhase::Post => (
            info.has_post_native,
            NATIVE_POST_SCRIPT,
            info.has_post_foreign,
            FOREIGN_POST_SCRIPT,
        ),
    };

    if has_native {
        let payload = info.scratch_dir.join(NATIVE_PAYLOAD_DIR);
        let payload = payload.display().to_string();

        return Ok(Some(ScriptJob {
            script: info.scratch_dir.join(native_rel),
            kind: ScriptKind::Native,
            phase,
            scratch: info.scratch_dir.clone(),
            env: vec![
                ("payloadRoot".to_string(), payload.clone()),
                ("payloadDir".to_string(), payload.clone()),
                ("PAYLOAD_ROOT".to_string(), payload.clone()),
                ("PAYLOAD_DIR".to_string(), payload),
            ],
            shim: None,
        }));
    }

    if has_foreign {
        let shim = materialize_shim(&info.scratch_dir)?;

        return Ok(Some(ScriptJob {
            script: info.scratch_dir.join(foreign_rel),
            kind: ScriptKind::Foreign,
            phase,
            scratch: info.scratch_dir.clone(),
            env: vec![
                ("ChocolateyPackageName".to_string(), info.name()),
                (
                    "ChocolateyPackageFolder".to_string(),
                    info.scratch_dir.display().to_string(),
                ),
                ("ChocolateyPackageVersion".to_string(), info.version()),
            ],
            shim: Some(shim),
        }));
    }

    Ok(None)
}

/// Mirror filter for foreign copy-type packages: metadata subtrees and
/// nuspec documents never reach the destination.
fn foreign_mirror_filter(rel: &Path) -> bool {
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
}
