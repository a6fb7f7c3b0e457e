// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Logging support. */

use slog::Drain;

/// Terminal drain for the installer frontend.
///
/// Informational records print to stdout as bare lines, so echoed
/// script output stays clean for capture. Warnings and errors go to
/// stderr carrying the tool name and severity.
pub struct InstallerDrain {}

impl slog::Drain for InstallerDrain {
    type Ok = ();
    type Err = std::io::Error;

    fn log(
        &self,
        record: &slog::Record,
        _values: &slog::OwnedKVList,
    ) -> Result<Self::Ok, Self::Err> {
        match record.level() {
            slog::Level::Critical | slog::Level::Error => {
                eprintln!("installer: error: {}", record.msg());
            }
            slog::Level::Warning => {
                eprintln!("installer: warning: {}", record.msg());
            }
            _ => {
                println!("{}", record.msg());
            }
        }

        Ok(())
    }
}

/// Construct the root logger for the command line frontend.
pub fn default_logger() -> slog::Logger {
    slog::Logger::root(InstallerDrain {}.fuse(), slog::o!())
}
