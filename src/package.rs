//! Reading and escaping the configured files into page records.
//!
//! [`package_files`] is all-or-nothing: it either returns one
//! [`PackagedFile`] per [`FileSpec`], in order, or the first error. Nothing
//! is written here, so a failed run never leaves a partial page behind.

use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, info};

use crate::config::FileSpec;
use crate::error::{Error, Result};
use crate::escape::{encode_carriage_returns, escape, guard_script_markup};

/// Separator between records in the page's file array.
pub const RECORD_SEPARATOR: &str = ",\n";

/// A file read and escaped for embedding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagedFile {
    /// Display name from the [`FileSpec`].
    pub name: String,
    /// Content exactly as read from disk.
    pub raw_content: String,
    /// Content after [`escape`].
    pub escaped_content: String,
}

impl PackagedFile {
    /// Escape `raw_content` for embedding under `name`.
    pub fn new(name: impl Into<String>, raw_content: String) -> Self {
        let name = name.into();
        let escaped_content = escape(&raw_content);
        debug!(
            name = %name,
            raw_len = raw_content.len(),
            escaped_len = escaped_content.len(),
            "escaped file content"
        );
        Self {
            name,
            raw_content,
            escaped_content,
        }
    }

    /// Serialize as one JS object literal for the page's file array.
    pub fn to_record(&self) -> String {
        // A JSON string is also a valid JS string literal.
        let name = serde_json::Value::String(self.name.clone()).to_string();
        let name = guard_script_markup(&name);
        let content = guard_script_markup(&encode_carriage_returns(&self.escaped_content));

        format!(
            "
            {{
                name: {name},
                content: `
{content}
                `
            }}
            "
        )
    }
}

/// The packaged files plus their combined array body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// One entry per configured file, in configured order.
    pub files: Vec<PackagedFile>,
    /// All records joined with [`RECORD_SEPARATOR`].
    pub combined: String,
}

impl Package {
    /// Build from already-packaged files.
    pub fn from_files(files: Vec<PackagedFile>) -> Self {
        let combined = files
            .iter()
            .map(PackagedFile::to_record)
            .collect::<Vec<_>>()
            .join(RECORD_SEPARATOR);
        Self { files, combined }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Read, escape and serialize every spec, in order.
///
/// Stops at the first file that is missing, unreadable or not UTF-8.
pub fn package_files(specs: &[FileSpec]) -> Result<Package> {
    let mut files = Vec::with_capacity(specs.len());

    for spec in specs {
        let content = read_utf8(&spec.path)?;
        info!(path = %spec.path.display(), bytes = content.len(), "read");
        files.push(PackagedFile::new(spec.name.clone(), content));
    }

    Ok(Package::from_files(files))
}

/// Read a whole file as UTF-8, mapping failures onto [`Error`].
pub(crate) fn read_utf8(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            Error::MissingFile {
                path: path.to_path_buf(),
            }
        } else {
            Error::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    String::from_utf8(bytes).map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })
}
