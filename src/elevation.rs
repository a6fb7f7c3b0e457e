// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Administrator state detection and the elevation decision.

Elevation is decided from the resolved install path against system-owned
roots, never from the raw `--target` string. The orchestrator aborts
before any side effect when elevation is needed but not held; there is no
attempt to self-elevate.
*/

use {
    crate::{sysdirs, target::system_drive},
    std::path::Path,
};

/// Whether the current process holds administrator rights.
#[cfg(windows)]
pub fn is_elevated() -> bool {
    use winapi::um::{
        handleapi::CloseHandle,
        processthreadsapi::{GetCurrentProcess, OpenProcessToken},
        securitybaseapi::GetTokenInformation,
        winnt::{TokenElevation, HANDLE, TOKEN_ELEVATION, TOKEN_QUERY},
    };

    unsafe {
        let mut token: HANDLE = std::ptr::null_mut();
        if OpenProcessToken(GetCurrentProcess(), TOKEN_QUERY, &mut token) == 0 {
            return false;
        }

        let mut elevation = TOKEN_ELEVATION { TokenIsElevated: 0 };
        let mut size = std::mem::size_of::<TOKEN_ELEVATION>() as u32;
        let ok = GetTokenInformation(
            token,
            TokenElevation,
            &mut elevation as *mut _ as *mut _,
            size,
            &mut size,
        );
        CloseHandle(token);

        ok != 0 && elevation.TokenIsElevated != 0
    }
}

/// Whether the current process holds administrator rights.
///
/// Off Windows this maps to the effective uid so the decision logic can
/// be exercised anywhere.
#[cfg(unix)]
pub fn is_elevated() -> bool {
    unsafe { libc::geteuid() == 0 }
}

fn components(path: &str) -> Vec<String> {
    path.replace('/', "\\")
        .trim_end_matches('\\')
        .to_lowercase()
        .split('\\')
        .filter(|c| !c.is_empty())
        .map(|c| c.to_string())
        .collect()
}

fn is_under(path: &[String], root: &[String]) -> bool {
    path.len() >= root.len() && path[..root.len()] == *root
}

/// Whether installing into `destination` requires administrator rights.
///
/// Returns the reason when it does. The system drive root itself needs
/// elevation; so does anything at or under the program-files roots, the
/// Windows directory, or the program-data directory.
pub fn requires_elevation(destination: &Path) -> Option<String> {
    let dest = components(&destination.to_string_lossy());

    let system_root = components(&format!("{}\\", system_drive()));
    if dest == system_root {
        return Some(format!(
            "install location {} is the system drive root",
            destination.display()
        ));
    }

    for root in [
        sysdirs::program_files(),
        sysdirs::program_files_x86(),
        sysdirs::windows_dir(),
        sysdirs::program_data(),
    ] {
        if is_under(&dest, &components(&root)) {
            return Some(format!(
                "install location {} is under {}",
                destination.display(),
                root
            ));
        }
    }

    None
}
