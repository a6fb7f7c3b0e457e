// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Installation domains and filesystem volumes. */

use crate::error::Result;

#[cfg(unix)]
use crate::error::InstallerError;

/// The fixed list of installation domains.
pub const INSTALL_DOMAINS: &[&str] = &["anywhere", "CurrentUserHomeDirectory", "LocalSystem"];

/// One mounted volume.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VolumeInfo {
    /// Root path, e.g. `C:\`.
    pub root: String,
    pub total_bytes: u64,
    pub free_bytes: u64,
}

impl VolumeInfo {
    /// One-line rendering used by `--volinfo`.
    pub fn describe(&self) -> String {
        format!(
            "{}  {} total, {} free",
            self.root,
            human_size(self.total_bytes),
            human_size(self.free_bytes)
        )
    }
}

/// Render a byte count with a binary unit suffix.
pub fn human_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB"];

    let mut value = bytes as f64;
    let mut unit = 0;

    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} {}", bytes, UNITS[unit])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// Enumerate mounted volumes with their sizes.
#[cfg(windows)]
pub fn list_volumes() -> Result<Vec<VolumeInfo>> {
    use winapi::um::fileapi::{GetDiskFreeSpaceExW, GetLogicalDrives};

    let mask = unsafe { GetLogicalDrives() };
    if mask == 0 {
        return Err(std::io::Error::last_os_error().into());
    }

    let mut volumes = Vec::new();

    for i in 0..26u32 {
        if mask & (1 << i) == 0 {
            continue;
        }

        let root = format!("{}:\\", (b'A' + i as u8) as char);
        let wide: Vec<u16> = root.encode_utf16().chain(std::iter::once(0)).collect();

        unsafe {
            let mut available = std::mem::zeroed();
            let mut total = std::mem::zeroed();
            let mut free = std::mem::zeroed();

            if GetDiskFreeSpaceExW(wide.as_ptr(), &mut available, &mut total, &mut free) != 0 {
                volumes.push(VolumeInfo {
                    root,
                    total_bytes: *total.QuadPart(),
                    free_bytes: *free.QuadPart(),
                });
            }
        }
    }

    Ok(volumes)
}

/// Enumerate mounted volumes with their sizes.
#[cfg(unix)]
pub fn list_volumes() -> Result<Vec<VolumeInfo>> {
    Err(InstallerError::BadInput(
        "volume enumeration is only supported on Windows".into(),
    ))
}
