// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Deterministic package installation for Windows.
//!
//! This crate implements a self-contained package installer modeled on
//! the macOS `/usr/sbin/installer` command. One invocation consumes a
//! single archive on disk, extracts it to a uniquely-named scratch
//! directory, runs optional pre- and post-install scripts, and mirrors a
//! payload tree into a target location. There is no package database, no
//! dependency resolution, and no cache.
//!
//! # Package Formats
//!
//! Two archive layouts are accepted, both zip files:
//!
//! *Native* packages (`.zip`) carry a `build-info.yaml` build spec at the
//! root, an optional `payload/` subtree, and optional
//! `scripts/preinstall.ps1` / `scripts/postinstall.ps1` scripts.
//!
//! *Foreign* packages (`.nupkg`) are Chocolatey-style: a `*.nuspec` XML
//! spec at the root, content in subtrees such as `lib/` and `content/`,
//! and optional `tools/chocolateyBeforeInstall.ps1` /
//! `tools/chocolateyInstall.ps1` scripts. Foreign scripts run with an
//! embedded compatibility shim dot-sourced ahead of them, providing the
//! common Chocolatey helper routines.
//!
//! # Install Modes
//!
//! A package installs one of three ways, decided by [classify::classify]:
//! *copy-type* packages have their payload mirrored to a resolved
//! location; *installer-type* packages ship a vendor installer their
//! scripts drive against the payload in place; *script-only* packages
//! have no payload at all.
//!
//! # Lifecycle
//!
//! [install::run_install] sequences one invocation:
//!
//! ```text
//! OpenArchive -> Extract -> ParseMeta -> Classify ->
//!   PrivilegeCheck -> PreScript -> Mirror -> PostScript -> Cleanup
//! ```
//!
//! The scratch directory is deleted on every exit path. Partial state in
//! the destination from a failed mirror is not rolled back.

pub mod archive;
pub mod build_info;
pub mod classify;
pub mod elevation;
pub mod error;
pub mod info;
pub mod install;
pub mod logging;
pub mod mirror;
pub mod nuspec;
pub mod options;
pub mod package_info;
pub mod plist;
pub mod scripts;
pub mod shim;
pub mod sysdirs;
pub mod target;
#[cfg(test)]
mod testutil;
pub mod volumes;

pub use {
    archive::ArchiveKind,
    classify::InstallMode,
    error::{InstallerError, Result},
    install::{inspect_package, run_install, InstallReport},
    options::{InstallOptions, Verbosity},
    package_info::PackageInfo,
};

/// Tool version, stamped as `YYYY.MM.DD.HHMM` at release time.
pub const TOOL_VERSION: &str = "2025.05.28.1416";
