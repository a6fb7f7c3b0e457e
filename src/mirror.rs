// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Payload mirroring.

Copies a subtree into the install destination with overwrite semantics.
File content is preserved exactly; timestamps and ACLs are not.
*/

use {
    crate::error::Result,
    slog::info,
    std::path::Path,
    walkdir::WalkDir,
};

/// Mirror `source` into `dest`, creating directories as needed and
/// replacing existing files. Returns the number of files copied.
pub fn mirror_tree(logger: &slog::Logger, source: &Path, dest: &Path) -> Result<u64> {
    mirror_tree_filtered(logger, source, dest, |_| true)
}

/// Mirror `source` into `dest`, skipping entries for which `keep`
/// returns false. A skipped directory prunes its whole subtree.
pub fn mirror_tree_filtered(
    logger: &slog::Logger,
    source: &Path,
    dest: &Path,
    keep: impl Fn(&Path) -> bool,
) -> Result<u64> {
    let mut copied = 0u64;

    let walker = WalkDir::new(source)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            match entry.path().strip_prefix(source) {
                Ok(rel) if rel.as_os_str().is_empty() => true,
                Ok(rel) => keep(rel),
                Err(_) => false,
            }
        });

    for entry in walker {
        let entry = entry.map_err(std::io::Error::from)?;
        let rel = match entry.path().strip_prefix(source) {
            Ok(rel) if !rel.as_os_str().is_empty() => rel,
            _ => continue,
        };

        let dest_path = dest.join(rel);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&dest_path)?;
            continue;
        }

        if let Some(parent) = dest_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::copy(entry.path(), &dest_path)?;
        copied += 1;
    }

    info!(
        logger,
        "mirrored {} files to {}",
        copied,
        dest.display()
    );

    Ok(copied)
}
