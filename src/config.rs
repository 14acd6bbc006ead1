//! Run configuration: which files to package and where the page goes.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::package::read_utf8;

/// Output file name used when none is configured.
pub const DEFAULT_OUTPUT: &str = "final_extension_installer.html";

/// Page title used when none is configured.
pub const DEFAULT_TITLE: &str = "VS Code Extension Source Installer";

/// One file to package: the name shown on the page and where to read it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSpec {
    /// Name shown above the file's block (and the file to recreate).
    pub name: String,
    /// Source path, relative paths resolve against the project root.
    pub path: PathBuf,
}

impl FileSpec {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

impl FromStr for FileSpec {
    type Err = Error;

    /// Parse `NAME=PATH`, or a bare `PATH` whose file name becomes the name.
    fn from_str(s: &str) -> Result<Self> {
        if let Some((name, path)) = s.split_once('=') {
            if name.is_empty() || path.is_empty() {
                return Err(Error::InvalidFileArg(s.to_string()));
            }
            return Ok(Self::new(name, path));
        }

        let path = Path::new(s);
        match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => Ok(Self::new(name, path)),
            None => Err(Error::InvalidFileArg(s.to_string())),
        }
    }
}

/// Everything a run needs.
///
/// Missing fields fall back to [`PackConfig::default`] when deserializing, so a
/// config file may set only what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackConfig {
    /// Files to embed, in page order.
    pub files: Vec<FileSpec>,
    /// Where the page is written. Any existing file is replaced.
    pub output: PathBuf,
    /// Page title.
    pub title: String,
    /// Custom page template; the built-in one is used when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,
}

impl Default for PackConfig {
    /// The layout of a compiled VS Code extension project.
    fn default() -> Self {
        Self {
            files: vec![
                FileSpec::new("package.json", "package.json"),
                FileSpec::new("extension.js", "out/extension.js"),
                FileSpec::new("README.md", "README.md"),
            ],
            output: PathBuf::from(DEFAULT_OUTPUT),
            title: DEFAULT_TITLE.to_string(),
            template: None,
        }
    }
}

impl PackConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = read_utf8(path)?;
        Self::from_json_str(&text).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a config from JSON text.
    pub fn from_json_str(text: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn with_files(mut self, files: Vec<FileSpec>) -> Self {
        self.files = files;
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_template(mut self, template: impl Into<PathBuf>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Join every relative path (sources, output, template) onto `root`.
    pub fn resolve_paths(mut self, root: &Path) -> Self {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = root.join(&*p);
            }
        };

        for spec in &mut self.files {
            resolve(&mut spec.path);
        }
        resolve(&mut self.output);
        if let Some(template) = self.template.as_mut() {
            resolve(template);
        }
        self
    }
}
