// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! XML property list framing for informational output.

Mirrors the macOS conventions for the small set of shapes this tool
emits: an array of strings or a dict of string pairs.
*/

use {
    crate::error::{InstallerError, Result},
    xml::{
        common::XmlVersion,
        writer::{EmitterConfig, EventWriter, XmlEvent},
    },
};

fn with_plist_body(
    build: impl FnOnce(&mut EventWriter<&mut Vec<u8>>) -> Result<()>,
) -> Result<String> {
    let mut output: Vec<u8> = Vec::new();

    {
        let mut writer = EmitterConfig::new()
            .perform_indent(true)
            .create_writer(&mut output);

        writer.write(XmlEvent::StartDocument {
            version: XmlVersion::Version10,
            encoding: Some("UTF-8"),
            standalone: None,
        })?;

        writer.write(XmlEvent::start_element("plist").attr("version", "1.0"))?;

        build(&mut writer)?;

        writer.write(XmlEvent::end_element())?;
    }

    String::from_utf8(output).map_err(|e| InstallerError::BadMetadata(e.to_string()))
}

/// Frame a list of strings as a plist `<array>`.
pub fn plist_string_array(values: &[String]) -> Result<String> {
    with_plist_body(|writer| {
        writer.write(XmlEvent::start_element("array"))?;

        for value in values {
            writer.write(XmlEvent::start_element("string"))?;
            writer.write(XmlEvent::characters(value))?;
            writer.write(XmlEvent::end_element())?;
        }

        writer.write(XmlEvent::end_element())?;

        Ok(())
    })
}

/// Frame key/value string pairs as a plist `<dict>`.
pub fn plist_string_dict(pairs: &[(String, String)]) -> Result<String> {
    with_plist_body(|writer| {
        writer.write(XmlEvent::start_element("dict"))?;

        for (key, value) in pairs {
            writer.write(XmlEvent::start_element("key"))?;
            writer.write(XmlEvent::characters(key))?;
            writer.write(XmlEvent::end_element())?;

            writer.write(XmlEvent::start_element("string"))?;
            writer.write(XmlEvent::characters(value))?;
            writer.write(XmlEvent::end_element())?;
        }

        writer.write(XmlEvent::end_element())?;

        Ok(())
    })
}
