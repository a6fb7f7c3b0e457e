// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Well-known system directories.

Resolved from the standard environment variables with conventional
fallbacks, so the values are meaningful on any host and deterministic
under test.
*/

fn env_or(var: &str, fallback: &str) -> String {
    match std::env::var(var) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => fallback.to_string(),
    }
}

pub fn program_files() -> String {
    env_or("ProgramFiles", "C:\\Program Files")
}

pub fn program_files_x86() -> String {
    env_or("ProgramFiles(x86)", "C:\\Program Files (x86)")
}

pub fn windows_dir() -> String {
    match std::env::var("windir") {
        Ok(v) if !v.trim().is_empty() => v,
        _ => env_or("SystemRoot", "C:\\Windows"),
    }
}

pub fn program_data() -> String {
    env_or("ProgramData", "C:\\ProgramData")
}

pub fn fonts_dir() -> String {
    format!("{}\\Fonts", windows_dir())
}
