// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! `build-info.yaml` build spec files. */

use {
    crate::error::Result,
    serde::{Deserialize, Serialize},
    std::path::Path,
};

/// Well-known metadata file name for native packages.
pub const BUILD_INFO_FILE: &str = "build-info.yaml";

/// Build spec metadata carried by native packages.
///
/// Every field is optional in the document. Unmatched properties are
/// ignored. `dependencies` is informational only and never resolved.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct BuildInfo {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub author: String,

    #[serde(default)]
    pub license: String,

    #[serde(default)]
    pub homepage: String,

    #[serde(default)]
    pub target: String,

    /// Where the payload is mirrored. Blank selects installer-type
    /// semantics.
    #[serde(default)]
    pub install_location: String,

    #[serde(default)]
    pub restart_action: String,

    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl BuildInfo {
    /// Parse a build spec document from a string.
    pub fn from_yaml(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Load `build-info.yaml` from the scratch root.
    ///
    /// A missing file is allowed and yields all-default metadata.
    pub fn from_scratch_dir(scratch: &Path) -> Result<Self> {
        let path = scratch.join(BUILD_INFO_FILE);

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::from_yaml(&std::fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_document() -> Result<()> {
        let info = BuildInfo::from_yaml(
            "name: demo\n\
             version: 1.2.3\n\
             description: A demo package\n\
             author: Example Corp\n\
             license: MIT\n\
             homepage: https://example.com\n\
             install_location: 'C:\\Apps\\Demo'\n\
             restart_action: None\n\
             dependencies:\n  - other-package\n",
        )?;

        assert_eq!(info.name, "demo");
        assert_eq!(info.version, "1.2.3");
        assert_eq!(info.install_location, "C:\\Apps\\Demo");
        assert_eq!(info.dependencies, vec!["other-package".to_string()]);

        Ok(())
    }

    #[test]
    fn unmatched_properties_ignored() -> Result<()> {
        let info = BuildInfo::from_yaml("name: demo\nunknown_field: whatever\n")?;
        assert_eq!(info.name, "demo");
        assert_eq!(info.version, "");

        Ok(())
    }

    #[test]
    fn missing_file_yields_defaults() -> Result<()> {
        let td = tempfile::tempdir()?;
        let info = BuildInfo::from_scratch_dir(td.path())?;
        assert_eq!(info, BuildInfo::default());

        Ok(())
    }

    #[test]
    fn malformed_document_is_error() {
        assert!(BuildInfo::from_yaml("name: [unclosed").is_err());
    }
}
