// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! `--target` resolution.

The resolver only produces the target root. The final install directory
is the join of this root with the package's install location, which wins
outright when it is itself absolute.
*/

use {
    crate::error::{InstallerError, Result},
    std::path::{Path, PathBuf},
};

/// The system drive, `C:` unless the environment says otherwise.
pub fn system_drive() -> String {
    std::env::var("SystemDrive").unwrap_or_else(|_| "C:".to_string())
}

/// Whether a path string is absolute in Windows terms.
///
/// `Path::is_absolute` cannot be used here: drive-letter paths are not
/// absolute on non-Windows hosts, and path strings flow through the
/// resolver before any filesystem access.
pub fn is_windows_absolute(s: &str) -> bool {
    let mut chars = s.chars();

    match (chars.next(), chars.next()) {
        (Some(drive), Some(':')) if drive.is_ascii_alphabetic() => true,
        (Some('\\'), _) | (Some('/'), _) => true,
        _ => false,
    }
}

/// Translate a `--target` specification into an absolute root directory.
pub fn resolve_target_root(spec: &str) -> Result<PathBuf> {
    let spec = spec.trim();

    if spec == "/" || spec == "\\" {
        return Ok(PathBuf::from(format!("{}\\", system_drive())));
    }

    if spec == "CurrentUserHomeDirectory" {
        return dirs::home_dir().ok_or_else(|| {
            InstallerError::BadInput("unable to resolve the current user's home directory".into())
        });
    }

    let forward = spec.replace('\\', "/");
    if let Some(name) = forward.strip_prefix("/Volumes/") {
        let name = name.trim_matches('/');
        if name.is_empty() {
            return Err(InstallerError::BadInput(format!(
                "volume target has no name: {}",
                spec
            )));
        }
        return Ok(PathBuf::from(format!("{}:\\", name)));
    }

    if spec.len() == 1 && spec.chars().all(|c| c.is_ascii_alphabetic()) {
        return Ok(PathBuf::from(format!("{}:\\", spec.to_uppercase())));
    }

    let mut normalized = spec.replace('/', "\\");
    if normalized.ends_with(':') {
        normalized.push('\\');
    }

    Ok(PathBuf::from(normalized))
}

/// Join an install location to the resolved target root.
///
/// Absolute locations are used verbatim and the root is ignored, matching
/// the semantics of the macOS installer this tool mimics. The join is
/// performed textually with Windows separators so the result is stable
/// regardless of host platform.
pub fn join_install_location(root: &Path, location: &str) -> PathBuf {
    let location = location.trim();

    if location.is_empty() {
        return root.to_path_buf();
    }

    // Absolute locations pass through untouched so host-native paths
    // survive verbatim.
    if is_windows_absolute(location) {
        return PathBuf::from(location);
    }

    let location = location.replace('/', "\\");

    let mut base = root.to_string_lossy().to_string();
    if !base.ends_with('\\') {
        base.push('\\');
    }

    PathBuf::from(format!("{}{}", base, location.trim_start_matches('\\')))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_resolves_to_system_drive() -> Result<()> {
        let root = resolve_target_root("/")?;
        let drive = system_drive();
        assert_eq!(root, PathBuf::from(format!("{}\\", drive)));
        assert_eq!(resolve_target_root("\\")?, root);

        Ok(())
    }

    #[test]
    fn home_directory_token() -> Result<()> {
        let root = resolve_target_root("CurrentUserHomeDirectory")?;
        assert_eq!(root, dirs::home_dir().unwrap());

        Ok(())
    }

    #[test]
    fn volumes_prefix() -> Result<()> {
        assert_eq!(resolve_target_root("/Volumes/D")?, PathBuf::from("D:\\"));
        assert_eq!(
            resolve_target_root("/Volumes/Backup")?,
            PathBuf::from("Backup:\\")
        );
        assert!(resolve_target_root("/Volumes/").is_err());

        Ok(())
    }

    #[test]
    fn single_letter_is_drive() -> Result<()> {
        assert_eq!(resolve_target_root("d")?, PathBuf::from("D:\\"));
        assert_eq!(resolve_target_root("E")?, PathBuf::from("E:\\"));

        Ok(())
    }

    #[test]
    fn other_strings_are_absolute_paths() -> Result<()> {
        assert_eq!(
            resolve_target_root("D:\\Staging")?,
            PathBuf::from("D:\\Staging")
        );
        assert_eq!(
            resolve_target_root("D:/Staging/sub")?,
            PathBuf::from("D:\\Staging\\sub")
        );
        assert_eq!(resolve_target_root("D:")?, PathBuf::from("D:\\"));

        Ok(())
    }

    #[test]
    fn join_relative_location() {
        let root = PathBuf::from("C:\\");
        assert_eq!(
            join_install_location(&root, "Apps\\Demo"),
            PathBuf::from("C:\\Apps\\Demo")
        );
        assert_eq!(
            join_install_location(&root, "Apps/Demo"),
            PathBuf::from("C:\\Apps\\Demo")
        );
        assert_eq!(join_install_location(&root, ""), root);
    }

    #[test]
    fn join_absolute_location_ignores_root() {
        let root = PathBuf::from("D:\\");
        assert_eq!(
            join_install_location(&root, "C:\\Apps\\Demo"),
            PathBuf::from("C:\\Apps\\Demo")
        );
    }

    #[test]
    fn windows_absolute_detection() {
        assert!(is_windows_absolute("C:\\x"));
        assert!(is_windows_absolute("c:/x"));
        assert!(is_windows_absolute("\\\\server\\share"));
        assert!(is_windows_absolute("/x"));
        assert!(!is_windows_absolute("Apps\\Demo"));
        assert!(!is_windows_absolute(""));
    }
}
