// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! `.nuspec` package spec files.

The nuspec schema has several historically distinct namespace versions.
Documents are rewritten with every element renamed to its local name and
all namespace declarations dropped before binding, so element names
compare structurally and a single decoder accepts every schema version.
*/

use {
    crate::error::{InstallerError, Result},
    serde::Deserialize,
    slog::warn,
    std::path::{Path, PathBuf},
    xml::{
        reader::{EventReader, XmlEvent as ReadEvent},
        writer::{EmitterConfig, XmlEvent as WriteEvent},
    },
};

/// File extension of foreign metadata documents.
pub const NUSPEC_EXTENSION: &str = "nuspec";

/// A parsed nuspec document.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Nuspec {
    pub metadata: NuspecMetadata,
}

/// The `<metadata>` element of a nuspec document.
///
/// All fields beyond id and version are informational.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NuspecMetadata {
    pub id: String,

    pub version: String,

    pub title: String,

    pub authors: String,

    pub owners: String,

    pub description: String,

    pub summary: String,

    #[serde(rename = "releaseNotes")]
    pub release_notes: String,

    pub copyright: String,

    pub tags: String,

    pub language: String,

    #[serde(rename = "projectUrl")]
    pub project_url: String,

    #[serde(rename = "licenseUrl")]
    pub license_url: String,

    #[serde(rename = "iconUrl")]
    pub icon_url: String,

    #[serde(rename = "requireLicenseAcceptance")]
    pub require_license_acceptance: bool,
}

/// Rewrite an XML document with namespaces removed.
///
/// Elements and attributes are renamed to their local names and namespace
/// declaration attributes are dropped. Text content is preserved.
pub fn strip_namespaces(xml: &str) -> Result<String> {
    let reader = EventReader::new(xml.as_bytes());

    let mut output: Vec<u8> = Vec::new();
    let mut writer = EmitterConfig::new()
        .write_document_declaration(false)
        .perform_indent(false)
        .create_writer(&mut output);

    for event in reader {
        match event? {
            ReadEvent::StartElement {
                name, attributes, ..
            } => {
                let mut elem = WriteEvent::start_element(name.local_name.as_str());

                for attr in &attributes {
                    elem = elem.attr(
                        xml::name::Name::local(attr.name.local_name.as_str()),
                        attr.value.as_str(),
                    );
                }

                writer.write(elem)?;
            }
            ReadEvent::EndElement { .. } => {
                writer.write(WriteEvent::end_element())?;
            }
            ReadEvent::Characters(text) | ReadEvent::CData(text) => {
                writer.write(WriteEvent::characters(&text))?;
            }
            _ => {}
        }
    }

    String::from_utf8(output).map_err(|e| InstallerError::BadMetadata(e.to_string()))
}

impl Nuspec {
    /// Parse a nuspec document from a string, accepting any schema
    /// namespace.
    pub fn from_xml(s: &str) -> Result<Self> {
        let stripped = strip_namespaces(s)?;

        Ok(serde_xml_rs::from_str(&stripped)?)
    }

    /// Locate and parse the nuspec document at the scratch root.
    ///
    /// Resolves to `None` when no `*.nuspec` exists. When multiple exist,
    /// the lexicographically first is used.
    pub fn from_scratch_dir(logger: &slog::Logger, scratch: &Path) -> Result<Option<Self>> {
        let path = match find_nuspec(logger, scratch)? {
            Some(path) => path,
            None => return Ok(None),
        };

        Ok(Some(Self::from_xml(&std::fs::read_to_string(path)?)?))
    }
}

fn find_nuspec(logger: &slog::Logger, scratch: &Path) -> Result<Option<PathBuf>> {
    let pattern = scratch.join(format!("*.{}", NUSPEC_EXTENSION));

    let mut matches = glob::glob(&pattern.to_string_lossy())
        .map_err(|e| InstallerError::BadMetadata(e.to_string()))?
        .filter_map(|entry| entry.ok())
        .collect::<Vec<_>>();

    matches.sort();

    match matches.len() {
        0 => {
            warn!(logger, "no .nuspec found in {}", scratch.display());
            Ok(None)
        }
        1 => Ok(Some(matches.remove(0))),
        n => {
            warn!(
                logger,
                "{} .nuspec files found in {}; using {}",
                n,
                scratch.display(),
                matches[0].display()
            );
            Ok(Some(matches.remove(0)))
        }
    }
}
