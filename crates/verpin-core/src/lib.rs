//! Resolve-and-rewrite engine for verpin.
//!
//! This crate ties the schema layer to the filesystem: `ProjectLayout`
//! validates a project directory, `resolve_installed` reads the installed
//! version of each declared dependency out of `node_modules`, and `Pinner`
//! writes the pinned `package.json` back in one step.

pub mod layout;
pub mod pin;
pub mod resolve;

pub use layout::ProjectLayout;
pub use pin::{PinReport, Pinner};
pub use resolve::{resolve_installed, NullReporter, ProgressReporter};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("manifest error: {0}")]
    Manifest(#[from] verpin_schema::ManifestError),
    #[error("manifest error: installed package '{name}' is invalid: {source}")]
    InstalledManifest {
        name: String,
        source: verpin_schema::ManifestError,
    },
    #[error("project error: {} not found", .0.display())]
    MissingManifest(PathBuf),
    #[error("project error: {} is not a regular file", .0.display())]
    ManifestNotFile(PathBuf),
    #[error("project error: {} not found (install dependencies first)", .0.display())]
    MissingModulesDir(PathBuf),
    #[error("project error: {} is not a directory", .0.display())]
    ModulesNotDir(PathBuf),
    #[error("project error: '{name}' is not installed ({} not found)", .path.display())]
    NotInstalled { name: String, path: PathBuf },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_errors_share_prefix() {
        let e = CoreError::MissingModulesDir(PathBuf::from("/p/node_modules"));
        assert!(e.to_string().starts_with("project error:"));
        assert!(e.to_string().contains("/p/node_modules"));
    }

    #[test]
    fn not_installed_names_package_and_path() {
        let e = CoreError::NotInstalled {
            name: "@scope/pkg".to_owned(),
            path: PathBuf::from("node_modules/@scope/pkg/package.json"),
        };
        let msg = e.to_string();
        assert!(msg.contains("'@scope/pkg'"));
        assert!(msg.contains("node_modules/@scope/pkg/package.json"));
    }
}
