// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Error handling. */

use {
    crate::scripts::{ScriptKind, ScriptPhase},
    std::path::PathBuf,
    thiserror::Error,
};

/// Primary crate error type.
#[derive(Debug, Error)]
pub enum InstallerError {
    #[error("bad input: {0}")]
    BadInput(String),

    #[error("package archive does not exist: {}", .0.display())]
    ArchiveNotFound(PathBuf),

    #[error("corrupt archive {} ({} bytes): {}", .path.display(), .size, .reason)]
    CorruptArchive {
        path: PathBuf,
        size: u64,
        reason: String,
    },

    #[error("archive entry escapes extraction root: {0}")]
    MalformedEntry(String),

    #[error("archive entry is a symbolic link: {0}")]
    SymlinkEntry(String),

    #[error("bad metadata: {0}")]
    BadMetadata(String),

    #[error("bad metadata: {0}")]
    YamlMetadata(#[from] serde_yaml::Error),

    #[error("bad metadata: {0}")]
    XmlMetadata(#[from] serde_xml_rs::Error),

    #[error("XML read error: {0}")]
    XmlRead(#[from] xml::reader::Error),

    #[error("XML write error: {0}")]
    XmlWrite(#[from] xml::writer::Error),

    #[error("administrator privileges required: {0}")]
    NeedsElevation(String),

    #[error("{phase} {kind} script failed with exit code {code}\n{tail}")]
    ScriptFailed {
        phase: ScriptPhase,
        kind: ScriptKind,
        code: i32,
        tail: String,
    },

    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl InstallerError {
    /// Process exit code to report for this error.
    ///
    /// Script failures propagate the child's exit code; everything else is 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ScriptFailed { code, .. } if *code != 0 => *code,
            _ => 1,
        }
    }
}

/// Result type for this crate.
pub type Result<T> = std::result::Result<T, InstallerError>;
