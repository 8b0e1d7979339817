use crate::CoreError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use verpin_schema::{parse_manifest_file, PackageManifest, PackageName};

const MANIFEST_FILE: &str = "package.json";
const MODULES_DIR: &str = "node_modules";

/// File layout of a single npm-style project directory.
///
/// All paths are derived from the project root; nothing is created.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[inline]
    pub fn manifest_file(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    #[inline]
    pub fn modules_dir(&self) -> PathBuf {
        self.root.join(MODULES_DIR)
    }

    /// `node_modules/<name>/package.json`, or
    /// `node_modules/@<scope>/<name>/package.json` for scoped packages.
    #[inline]
    pub fn installed_manifest(&self, name: &PackageName) -> PathBuf {
        self.modules_dir().join(name.install_dir()).join(MANIFEST_FILE)
    }

    /// Check that `package.json` is a regular file and `node_modules` a
    /// directory, in that order.
    pub fn validate(&self) -> Result<(), CoreError> {
        let manifest = self.manifest_file();
        match fs::metadata(&manifest) {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(CoreError::ManifestNotFile(manifest)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(CoreError::MissingManifest(manifest))
            }
            Err(e) => return Err(e.into()),
        }

        let modules = self.modules_dir();
        match fs::metadata(&modules) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(CoreError::ModulesNotDir(modules)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(CoreError::MissingModulesDir(modules)),
            Err(e) => Err(e.into()),
        }
    }

    /// Validate the project and parse its `package.json`.
    pub fn load_manifest(&self) -> Result<PackageManifest, CoreError> {
        self.validate()?;
        Ok(parse_manifest_file(self.manifest_file())?)
    }
}
