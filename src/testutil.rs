// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use {
    crate::error::Result,
    std::{io::Write, path::Path},
};

pub fn test_logger() -> slog::Logger {
    slog::Logger::root(slog::Discard, slog::o!())
}

/// Author a zip archive at `path` with the given (name, content) entries.
pub fn write_zip(path: &Path, entries: &[(&str, &[u8])]) -> Result<()> {
    let fh = std::fs::File::create(path)?;
    let mut zf = zip::ZipWriter::new(fh);
    let options = zip::write::FileOptions::default();

    for (name, data) in entries {
        zf.start_file(*name, options)?;
        zf.write_all(data)?;
    }

    zf.finish()?;

    Ok(())
}
