// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Parsed command line options. */

use std::{fmt::Display, path::PathBuf};

/// How much captured script output to surface while running.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Collect output silently.
    Quiet,
    /// Announce lifecycle steps.
    Verbose,
    /// Announce lifecycle steps and echo script output as it arrives.
    VerboseR,
    /// Echo everything, including the full collected log at the end.
    DumpLog,
}

impl Verbosity {
    /// Whether captured script output lines should be echoed live.
    pub fn echo_script_output(&self) -> bool {
        matches!(self, Self::VerboseR | Self::DumpLog)
    }
}

impl Display for Verbosity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Quiet => "quiet",
            Self::Verbose => "verbose",
            Self::VerboseR => "verboseR",
            Self::DumpLog => "dumplog",
        })
    }
}

/// Options record produced by the argument parser.
///
/// One instance describes one invocation. There is no global state.
#[derive(Clone, Debug)]
pub struct InstallOptions {
    /// Path to the package archive, when an operation needs one.
    pub package: Option<PathBuf>,

    /// Raw `--target` specification. Resolved by [crate::target].
    pub target: String,

    /// Print a metadata summary instead of installing.
    pub pkginfo: bool,

    /// Print the fixed list of installation domains.
    pub dominfo: bool,

    /// Print available filesystem volumes.
    pub volinfo: bool,

    /// Print a single metadata field.
    pub query: Option<String>,

    /// Frame informational output as an XML property list.
    pub plist: bool,

    /// Accepted and ignored. Reserved for signature verification.
    pub allow_untrusted: bool,

    pub verbosity: Verbosity,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            package: None,
            target: "/".to_string(),
            pkginfo: false,
            dominfo: false,
            volinfo: false,
            query: None,
            plist: false,
            allow_untrusted: false,
            verbosity: Verbosity::Quiet,
        }
    }
}
