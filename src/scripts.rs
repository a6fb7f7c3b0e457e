// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Install script execution.

Scripts run in a PowerShell child process with the scratch directory as
working directory. The child inherits the entire parent environment;
package-specific variables are layered on top. Output is captured line
by line and folded through a small mojibake table before collection.
*/

use {
    crate::{
        error::{InstallerError, Result},
        options::Verbosity,
    },
    duct::cmd,
    slog::info,
    std::{
        fmt::Display,
        io::{BufRead, BufReader},
        path::PathBuf,
    },
};

/// Which packaging ecosystem a script comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptKind {
    Native,
    Foreign,
}

impl Display for ScriptKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Native => "native",
            Self::Foreign => "foreign",
        })
    }
}

/// Where in the install lifecycle a script runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScriptPhase {
    Pre,
    Post,
}

impl Display for ScriptPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Pre => "pre-install",
            Self::Post => "post-install",
        })
    }
}

/// Lines of failure output carried in a script error.
const OUTPUT_TAIL_LINES: usize = 20;

/// Mis-decoded UTF-8 sequences folded back to their intended glyphs.
///
/// Longer sequences first so shared prefixes resolve correctly. The pass
/// never changes line structure.
const MOJIBAKE_FOLDS: &[(&str, &str)] = &[
    ("\u{00e2}\u{0153}\u{201c}", "\u{2713}"), // ✓
    ("\u{00e2}\u{0153}\u{201d}", "\u{2714}"), // ✔
    ("\u{00e2}\u{2020}\u{2019}", "\u{2192}"), // →
    ("\u{00e2}\u{20ac}\u{00a2}", "\u{2022}"), // •
    ("\u{00e2}\u{20ac}\u{201c}", "\u{2013}"), // –
    ("\u{00e2}\u{20ac}\u{2122}", "\u{2019}"), // ’
];

/// Fold common mojibake sequences in a captured output line.
pub fn sanitize_output_line(line: &str) -> String {
    let mut line = line.to_string();

    for (pattern, replacement) in MOJIBAKE_FOLDS {
        if line.contains(pattern) {
            line = line.replace(pattern, replacement);
        }
    }

    line
}

/// The shell interpreter used for install scripts.
pub fn powershell_exe() -> &'static str {
    if cfg!(windows) {
        "powershell.exe"
    } else {
        "pwsh"
    }
}

/// One script to execute.
pub struct ScriptJob {
    pub script: PathBuf,
    pub kind: ScriptKind,
    pub phase: ScriptPhase,

    /// Working directory for the child. Always the scratch root.
    pub scratch: PathBuf,

    /// Package-specific environment layered over the inherited one.
    pub env: Vec<(String, String)>,

    /// Helper library dot-sourced ahead of foreign scripts.
    pub shim: Option<PathBuf>,
}

fn build_args(job: &ScriptJob) -> Vec<String> {
    let mut args = vec![
        "-NoProfile".to_string(),
        "-ExecutionPolicy".to_string(),
        "Bypass".to_string(),
    ];

    match &job.shim {
        Some(shim) => {
            args.push("-Command".to_string());
            args.push(format!(
                "& {{ . '{}'; . '{}' }}",
                shim.display(),
                job.script.display()
            ));
        }
        None => {
            args.push("-File".to_string());
            args.push(job.script.display().to_string());
        }
    }

    args
}

/// Run one install script to completion and collect its output.
///
/// stdout and stderr are merged and captured line by line. A nonzero
/// exit surfaces as `ScriptFailed` carrying a bounded tail of the
/// output.
pub fn run_script(
    logger: &slog::Logger,
    job: &ScriptJob,
    verbosity: Verbosity,
) -> Result<Vec<String>> {
    let args = build_args(job);

    if verbosity >= Verbosity::Verbose {
        info!(
            logger,
            "running {} {} script {}",
            job.phase,
            job.kind,
            job.script.display()
        );
    }

    let mut expression = cmd(powershell_exe(), &args)
        .dir(&job.scratch)
        .stderr_to_stdout()
        .unchecked();

    for (name, value) in &job.env {
        expression = expression.env(name, value);
    }

    let reader = expression.reader()?;

    let mut collected = Vec::new();
    {
        let buffered = BufReader::new(&reader);
        for line in buffered.lines() {
            let line = sanitize_output_line(&line?);
            if verbosity.echo_script_output() {
                info!(logger, "{}", line);
            }
            collected.push(line);
        }
    }

    let output = reader.try_wait()?.ok_or_else(|| {
        InstallerError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "script process did not report an exit status",
        ))
    })?;

    if !output.status.success() {
        let tail_start = collected.len().saturating_sub(OUTPUT_TAIL_LINES);

        return Err(InstallerError::ScriptFailed {
            phase: job.phase,
            kind: job.kind,
            code: output.status.code().unwrap_or(1),
            tail: collected[tail_start..].join("\n"),
        });
    }

    Ok(collected)
}
