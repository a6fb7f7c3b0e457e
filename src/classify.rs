// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Install mode classification.

A pure function over [PackageInfo] and the resolved target root. The
foreign-package heuristics are deterministic: the same payload always
classifies the same way.
*/

use {
    crate::{
        archive::ArchiveKind,
        package_info::PackageInfo,
        sysdirs,
        target::join_install_location,
    },
    std::path::{Path, PathBuf},
};

/// Filename substrings that mark a payload binary as a vendor installer.
const INSTALLER_NAME_MARKERS: &[&str] = &["setup", "installer", "install"];

/// Executable name endings that mark a vendor installer.
const VENDOR_INSTALLER_SUFFIXES: &[&str] = &["setup.exe", "install.exe", "installer.exe"];

/// Extensions counted as font files for the default-location heuristic.
const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "ttc", "fon"];

/// How a package's effects reach the filesystem.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InstallMode {
    /// No payload. Scripts produce all effects.
    ScriptOnly,

    /// The payload tree is mirrored to `destination`.
    Copy { destination: PathBuf },

    /// Scripts drive a vendor installer against the payload in place
    /// under the scratch directory.
    Installer,
}

/// Whether a payload file looks like a vendor installer executable.
fn is_installer_executable(rel: &Path) -> bool {
    let name = rel
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if rel
        .extension()
        .map(|e| e.eq_ignore_ascii_case("msi"))
        .unwrap_or(false)
    {
        return true;
    }

    if INSTALLER_NAME_MARKERS.iter().any(|m| name.contains(m)) {
        return true;
    }

    VENDOR_INSTALLER_SUFFIXES.iter().any(|s| name.ends_with(s))
}

fn is_font_file(rel: &Path) -> bool {
    rel.extension()
        .map(|e| {
            let e = e.to_string_lossy().to_lowercase();
            FONT_EXTENSIONS.iter().any(|f| *f == e)
        })
        .unwrap_or(false)
}

/// Default destination for a foreign copy-type package.
fn foreign_default_destination(info: &PackageInfo) -> PathBuf {
    let fonts = info.payload_files.iter().filter(|p| is_font_file(p)).count();

    if fonts * 2 > info.payload_files.len() {
        return PathBuf::from(sysdirs::fonts_dir());
    }

    let mut product = info.name();
    if product.is_empty() {
        product = info
            .archive_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "package".to_string());
    }

    PathBuf::from(format!("{}\\{}", sysdirs::program_files(), product))
}

/// Compute the install mode and effective install location.
pub fn classify(info: &PackageInfo, target_root: &Path) -> InstallMode {
    if info.payload_files.is_empty() {
        return InstallMode::ScriptOnly;
    }

    match info.kind {
        ArchiveKind::Native => {
            let location = info
                .build_info
                .as_ref()
                .map(|b| b.install_location.trim().to_string())
                .unwrap_or_default();

            if location.is_empty() {
                InstallMode::Installer
            } else {
                InstallMode::Copy {
                    destination: join_install_location(target_root, &location),
                }
            }
        }
        ArchiveKind::Foreign => {
            if info.payload_files.iter().any(|p| is_installer_executable(p)) {
                InstallMode::Installer
            } else {
                InstallMode::Copy {
                    destination: foreign_default_destination(info),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(kind: ArchiveKind, payload: &[&str]) -> PackageInfo {
        PackageInfo {
            kind,
            archive_path: PathBuf::from("demo.zip"),
            scratch_dir: PathBuf::from("scratch"),
            build_info: match kind {
                ArchiveKind::Native => Some(Default::default()),
                ArchiveKind::Foreign => None,
            },
            nuspec: None,
            has_pre_native: false,
            has_post_native: false,
            has_pre_foreign: false,
            has_post_foreign: false,
            payload_files: payload.iter().map(PathBuf::from).collect(),
            payload_bytes: 0,
        }
    }

    #[test]
    fn no_payload_is_script_only() {
        let info = package(ArchiveKind::Native, &[]);
        assert_eq!(classify(&info, Path::new("C:\\")), InstallMode::ScriptOnly);
    }

    #[test]
    fn native_blank_location_is_installer_type() {
        let info = package(ArchiveKind::Native, &["hello.txt"]);
        assert_eq!(classify(&info, Path::new("C:\\")), InstallMode::Installer);
    }

    #[test]
    fn native_location_is_copy_type() {
        let mut info = package(ArchiveKind::Native, &["hello.txt"]);
        info.build_info.as_mut().unwrap().install_location = "C:\\Apps\\Demo".to_string();

        assert_eq!(
            classify(&info, Path::new("C:\\")),
            InstallMode::Copy {
                destination: PathBuf::from("C:\\Apps\\Demo")
            }
        );
    }

    #[test]
    fn native_relative_location_joins_target_root() {
        let mut info = package(ArchiveKind::Native, &["hello.txt"]);
        info.build_info.as_mut().unwrap().install_location = "Apps\\Demo".to_string();

        assert_eq!(
            classify(&info, Path::new("D:\\")),
            InstallMode::Copy {
                destination: PathBuf::from("D:\\Apps\\Demo")
            }
        );
    }

    #[test]
    fn foreign_installer_executables() {
        for payload in [
            &["Setup_v3.exe"][..],
            &["tools2/product-installer.exe"],
            &["product.msi"],
            &["lib/QuietInstall.exe"],
        ] {
            let info = package(ArchiveKind::Foreign, payload);
            assert_eq!(
                classify(&info, Path::new("C:\\")),
                InstallMode::Installer,
                "payload {:?}",
                payload
            );
        }
    }

    #[test]
    fn foreign_fonts_go_to_fonts_directory() {
        let info = package(ArchiveKind::Foreign, &["a.ttf", "b.otf", "readme.txt"]);

        assert_eq!(
            classify(&info, Path::new("C:\\")),
            InstallMode::Copy {
                destination: PathBuf::from(crate::sysdirs::fonts_dir())
            }
        );
    }

    #[test]
    fn foreign_default_is_program_files_product_dir() {
        let mut info = package(ArchiveKind::Foreign, &["lib/demo.dll"]);
        info.nuspec = Some(crate::nuspec::NuspecMetadata {
            id: "demo".to_string(),
            ..Default::default()
        });

        assert_eq!(
            classify(&info, Path::new("C:\\")),
            InstallMode::Copy {
                destination: PathBuf::from(format!(
                    "{}\\demo",
                    crate::sysdirs::program_files()
                ))
            }
        );
    }
}
