// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! The Chocolatey compatibility shim.

An embedded PowerShell library re-implementing the common Chocolatey
helper routines. It is materialized into the package's `tools/`
directory, which is excluded from mirroring, and dot-sourced ahead of
foreign scripts so the helper names resolve in the script's scope.
Helpers outside this set fail naturally when the name resolves to
nothing.
*/

use {
    crate::error::Result,
    std::path::{Path, PathBuf},
};

/// File name the shim is materialized under.
pub const SHIM_FILE_NAME: &str = "chocolateyHelpers.ps1";

/// The embedded helper library.
pub const SHIM_SOURCE: &str = include_str!("chocolatey_shim.ps1");

/// Write the shim into the scratch directory's `tools/` subtree.
///
/// Returns the path to dot-source. Never injected for native scripts.
pub fn materialize_shim(scratch: &Path) -> Result<PathBuf> {
    let tools = scratch.join("tools");
    std::fs::create_dir_all(&tools)?;

    let path = tools.join(SHIM_FILE_NAME);
    std::fs::write(&path, SHIM_SOURCE)?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELPER_FUNCTIONS: &[&str] = &[
        "Install-ChocolateyPath",
        "Install-ChocolateyEnvironmentVariable",
        "Get-ChocolateyWebFile",
        "Install-ChocolateyPackage",
        "Install-ChocolateyZipPackage",
        "Get-ChocolateyUnzip",
        "Install-ChocolateyShortcut",
        "Get-OSArchitectureWidth",
        "Get-EnvironmentVariable",
        "Update-SessionEnvironment",
        "Write-ChocolateySuccess",
        "Write-ChocolateyFailure",
    ];

    #[test]
    fn shim_defines_all_helpers() {
        for name in HELPER_FUNCTIONS {
            assert!(
                SHIM_SOURCE.contains(&format!("function {}", name)),
                "shim missing {}",
                name
            );
        }
    }

    #[test]
    fn materialize_writes_under_tools() -> Result<()> {
        let td = tempfile::tempdir()?;

        let path = materialize_shim(td.path())?;
        assert!(path.starts_with(td.path().join("tools")));
        assert_eq!(std::fs::read_to_string(path)?, SHIM_SOURCE);

        Ok(())
    }
}
