//! # airlift
//!
//! Packs a handful of project files into one self-contained HTML page, so
//! they can be carried as plain text to an offline machine and recreated there
//! with a Copy button per file.
//!
//! ## Pipeline
//!
//! 1. [`package_files`] reads each configured [`FileSpec`] in order and
//!    escapes it for a JavaScript template literal ([`escape::escape`])
//! 2. [`render_installer`] drops the combined records into the page template
//! 3. [`write::write_atomic`] replaces the output file in one step
//!
//! Reads all happen before the write, so a missing or unreadable input never
//! leaves a partial page behind.
//!
//! ## Quick Start
//!
//! ```no_run
//! use airlift::{FileSpec, PackConfig, build_installer};
//!
//! let config = PackConfig::new()
//!     .with_files(vec![
//!         FileSpec::new("package.json", "package.json"),
//!         FileSpec::new("extension.js", "out/extension.js"),
//!     ])
//!     .with_output("installer.html");
//!
//! let report = build_installer(&config)?;
//! println!("wrote {} files to {}", report.files.len(), report.output.display());
//! # Ok::<(), airlift::Error>(())
//! ```
//!
//! The pieces can also be used separately:
//!
//! ```
//! use airlift::{Package, PackagedFile, render};
//!
//! let package = Package::from_files(vec![PackagedFile::new("a.txt", "`hi`".into())]);
//! let page = render(&package.combined, "<script>[{js_array_content}]</script>");
//! assert!(page.contains("\\`hi\\`"));
//! ```

use std::path::PathBuf;

pub mod config;
pub mod error;
pub mod escape;
pub mod package;
pub mod render;
pub mod write;

pub use config::{FileSpec, PackConfig};
pub use error::{Error, Result};
pub use package::{Package, PackagedFile, package_files};
pub use render::{DEFAULT_TEMPLATE, PLACEHOLDER, render, render_installer};

/// Summary of a successful [`build_installer`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Path the page was written to.
    pub output: PathBuf,
    /// Display names of the packaged files, in page order.
    pub files: Vec<String>,
    /// Size of the written page.
    pub bytes: usize,
}

/// Package, render and write the installer page described by `config`.
///
/// The output file is only touched once every input has been read.
pub fn build_installer(config: &PackConfig) -> Result<BuildReport> {
    let package = package_files(&config.files)?;
    let page = render_installer(&package, config)?;
    write::write_atomic(&config.output, &page)?;

    Ok(BuildReport {
        output: config.output.clone(),
        files: package.files.into_iter().map(|f| f.name).collect(),
        bytes: page.len(),
    })
}
