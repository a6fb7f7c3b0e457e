// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Package archive reading.

Both package flavors are zip files on disk. The reader validates the
central directory before anything is written to the scratch directory and
confines every extracted entry to the scratch root.
*/

use {
    crate::error::{InstallerError, Result},
    slog::info,
    std::{
        fmt::Display,
        fs::File,
        io::Read,
        path::{Path, PathBuf},
    },
};

/// The flavor of a package archive, derived from its file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArchiveKind {
    /// The tool's own package layout (`.zip`).
    Native,
    /// A Chocolatey-style package (`.nupkg`).
    Foreign,
}

impl ArchiveKind {
    /// Classify an archive path by extension, case-insensitively.
    ///
    /// The path must exist. Unsupported extensions are an input error.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(InstallerError::ArchiveNotFound(path.to_path_buf()));
        }

        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "zip" => Ok(Self::Native),
            "nupkg" => Ok(Self::Foreign),
            _ => Err(InstallerError::BadInput(format!(
                "unsupported archive extension: {}",
                path.display()
            ))),
        }
    }
}

impl Display for ArchiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Native => "native",
            Self::Foreign => "foreign",
        })
    }
}

fn corrupt(path: &Path, e: impl std::fmt::Display) -> InstallerError {
    let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

    InstallerError::CorruptArchive {
        path: path.to_path_buf(),
        size,
        reason: e.to_string(),
    }
}

/// Open an archive and validate its central directory.
///
/// Returns the number of entries. No filesystem writes occur.
pub fn validate_archive(path: &Path) -> Result<usize> {
    let fh = File::open(path)?;
    let archive = zip::ZipArchive::new(fh).map_err(|e| corrupt(path, e))?;

    Ok(archive.len())
}

/// Compute the scratch-relative path for an archive entry name.
///
/// Entry names use `/` or `\` separators. Names with `..` segments,
/// absolute components, or drive prefixes escape the extraction root and
/// are rejected.
fn entry_relative_path(name: &str) -> Result<PathBuf> {
    let normalized = name.replace('\\', "/");

    if normalized.starts_with('/') {
        return Err(InstallerError::MalformedEntry(name.to_string()));
    }

    let mut rel = PathBuf::new();

    for part in normalized.split('/') {
        match part {
            "" | "." => {}
            ".." => return Err(InstallerError::MalformedEntry(name.to_string())),
            p if p.contains(':') => {
                return Err(InstallerError::MalformedEntry(name.to_string()))
            }
            p => rel.push(p),
        }
    }

    Ok(rel)
}

fn is_symlink_entry(file: &zip::read::ZipFile) -> bool {
    match file.unix_mode() {
        Some(mode) => mode & 0o170000 == 0o120000,
        None => false,
    }
}

/// Extract all archive entries under `dest`, preserving relative paths.
///
/// Returns the relative paths of the files written, in archive order.
pub fn extract_archive(logger: &slog::Logger, path: &Path, dest: &Path) -> Result<Vec<PathBuf>> {
    let fh = File::open(path)?;
    let mut archive = zip::ZipArchive::new(fh).map_err(|e| corrupt(path, e))?;

    let mut written = Vec::new();

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;

        if is_symlink_entry(&file) {
            return Err(InstallerError::SymlinkEntry(file.name().to_string()));
        }

        let rel = entry_relative_path(file.name())?;

        if rel.as_os_str().is_empty() {
            continue;
        }

        let dest_path = dest.join(&rel);

        if file.is_dir() {
            std::fs::create_dir_all(&dest_path)?;
            continue;
        }

        if let Some(parent) = dest_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut b: Vec<u8> = Vec::new();
        file.read_to_end(&mut b)?;
        std::fs::write(&dest_path, &b)?;

        written.push(rel);
    }

    info!(
        logger,
        "extracted {} files from {}",
        written.len(),
        path.display()
    );

    Ok(written)
}

#[cfg(test)]
mod tests {
    use {super::*, crate::testutil::*, std::io::Write};

    #[test]
    fn kind_from_extension() -> Result<()> {
        let td = tempfile::tempdir()?;

        let zip_path = td.path().join("Pkg.ZIP");
        std::fs::write(&zip_path, b"x")?;
        assert_eq!(ArchiveKind::from_path(&zip_path)?, ArchiveKind::Native);

        let nupkg_path = td.path().join("pkg.nupkg");
        std::fs::write(&nupkg_path, b"x")?;
        assert_eq!(ArchiveKind::from_path(&nupkg_path)?, ArchiveKind::Foreign);

        let other = td.path().join("pkg.msi");
        std::fs::write(&other, b"x")?;
        assert!(matches!(
            ArchiveKind::from_path(&other),
            Err(InstallerError::BadInput(_))
        ));

        assert!(matches!(
            ArchiveKind::from_path(&td.path().join("missing.zip")),
            Err(InstallerError::ArchiveNotFound(_))
        ));

        Ok(())
    }

    #[test]
    fn entry_paths_confined() {
        assert_eq!(
            entry_relative_path("payload/hello.txt").unwrap(),
            PathBuf::from("payload").join("hello.txt")
        );
        assert_eq!(
            entry_relative_path("a\\b.txt").unwrap(),
            PathBuf::from("a").join("b.txt")
        );

        assert!(entry_relative_path("../evil.txt").is_err());
        assert!(entry_relative_path("a/../../evil.txt").is_err());
        assert!(entry_relative_path("/abs.txt").is_err());
        assert!(entry_relative_path("C:/evil.txt").is_err());
        assert!(entry_relative_path("..\\evil.txt").is_err());
    }

    #[test]
    fn extract_writes_under_dest() -> Result<()> {
        let logger = test_logger();
        let td = tempfile::tempdir()?;

        let archive_path = td.path().join("pkg.zip");
        write_zip(
            &archive_path,
            &[
                ("build-info.yaml", b"name: demo\n".as_slice()),
                ("payload/hello.txt", b"hi"),
            ],
        )?;

        let dest = td.path().join("scratch");
        std::fs::create_dir_all(&dest)?;

        let written = extract_archive(&logger, &archive_path, &dest)?;
        assert_eq!(written.len(), 2);
        assert_eq!(std::fs::read(dest.join("payload/hello.txt"))?, b"hi");

        Ok(())
    }

    #[test]
    fn extract_rejects_traversal_entries() -> Result<()> {
        let logger = test_logger();
        let td = tempfile::tempdir()?;

        let archive_path = td.path().join("pkg.zip");
        write_zip(&archive_path, &[("../evil.txt", b"x".as_slice())])?;

        let dest = td.path().join("scratch");
        std::fs::create_dir_all(&dest)?;

        assert!(matches!(
            extract_archive(&logger, &archive_path, &dest),
            Err(InstallerError::MalformedEntry(_))
        ));
        assert!(!td.path().join("evil.txt").exists());

        Ok(())
    }

    #[test]
    fn truncated_archive_is_corrupt() -> Result<()> {
        let td = tempfile::tempdir()?;

        let archive_path = td.path().join("pkg.zip");
        write_zip(&archive_path, &[("payload/a.txt", b"content".as_slice())])?;

        let data = std::fs::read(&archive_path)?;
        let keep = data.len().saturating_sub(16);
        let truncated = td.path().join("broken.zip");
        let mut fh = File::create(&truncated)?;
        fh.write_all(&data[..keep])?;
        drop(fh);

        match validate_archive(&truncated) {
            Err(InstallerError::CorruptArchive { path, size, .. }) => {
                assert_eq!(path, truncated);
                assert_eq!(size as usize, keep);
            }
            other => panic!("expected corrupt archive, got {:?}", other.map(|_| ())),
        }

        Ok(())
    }
}
