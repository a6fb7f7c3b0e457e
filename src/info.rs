// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Package metadata summaries and field queries. */

use {
    crate::{
        error::{InstallerError, Result},
        package_info::PackageInfo,
        volumes::human_size,
    },
};

/// Fields `--query` understands, in their documented spellings.
pub const QUERY_FIELDS: &[&str] = &[
    "name",
    "version",
    "description",
    "author",
    "license",
    "RestartAction",
];

/// Resolve one metadata field by name, case-insensitively.
pub fn query_field(info: &PackageInfo, field: &str) -> Result<String> {
    match field.to_lowercase().as_str() {
        "name" => Ok(info.name()),
        "version" => Ok(info.version()),
        "description" => Ok(info.description()),
        "author" => Ok(info.author()),
        "license" => Ok(info.license()),
        "restartaction" => Ok(info.restart_action()),
        _ => Err(InstallerError::BadInput(format!(
            "unknown query field '{}' (expected one of: {})",
            field,
            QUERY_FIELDS.join(", ")
        ))),
    }
}

/// Key/value pairs for the `--pkginfo` summary.
pub fn pkginfo_pairs(info: &PackageInfo) -> Vec<(String, String)> {
    vec![
        ("name".to_string(), info.name()),
        ("version".to_string(), info.version()),
        ("description".to_string(), info.description()),
        ("author".to_string(), info.author()),
        ("license".to_string(), info.license()),
        ("RestartAction".to_string(), info.restart_action()),
        ("kind".to_string(), info.kind.to_string()),
        (
            "payload files".to_string(),
            info.payload_files.len().to_string(),
        ),
        (
            "payload size".to_string(),
            human_size(info.payload_bytes),
        ),
    ]
}
