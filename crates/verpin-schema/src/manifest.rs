use crate::name::PackageName;
use crate::resolved::ResolvedVersions;
use crate::types::{InstalledVersion, VersionSpec};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse manifest: {0}")]
    ParseJson(#[from] serde_json::Error),
    #[error("manifest root must be a JSON object")]
    NotAnObject,
    #[error("'{field}' must be an object mapping package names to version strings")]
    InvalidDependencies { field: &'static str },
    #[error("'{field}.{name}' must be a version string")]
    InvalidSpecifier { field: &'static str, name: String },
    #[error("invalid package name: '{0}'")]
    InvalidPackageName(String),
}

/// The two dependency maps of `package.json` that get pinned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum DependencyKind {
    Runtime,
    Development,
}

impl DependencyKind {
    /// Order in which installed versions are looked up.
    pub const RESOLUTION_ORDER: [Self; 2] = [Self::Development, Self::Runtime];

    pub fn field(self) -> &'static str {
        match self {
            Self::Runtime => "dependencies",
            Self::Development => "devDependencies",
        }
    }
}

/// One entry of a dependency map as declared by the developer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredDependency {
    pub kind: DependencyKind,
    pub name: PackageName,
    pub spec: VersionSpec,
}

/// A parsed `package.json`.
///
/// The whole document is kept as an ordered JSON object so that fields this
/// tool does not understand survive a rewrite with their values and positions
/// intact. The two dependency maps are additionally validated and parsed into
/// [`DeclaredDependency`] lists at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageManifest {
    document: Map<String, Value>,
    runtime: Vec<DeclaredDependency>,
    development: Vec<DeclaredDependency>,
    trailing_newline: bool,
}

impl PackageManifest {
    pub fn from_document(document: Map<String, Value>) -> Result<Self, ManifestError> {
        let runtime = parse_dependency_map(&document, DependencyKind::Runtime)?;
        let development = parse_dependency_map(&document, DependencyKind::Development)?;
        Ok(Self {
            document,
            runtime,
            development,
            trailing_newline: false,
        })
    }

    pub fn document(&self) -> &Map<String, Value> {
        &self.document
    }

    /// Declared entries of one category, in document order.
    pub fn declared(&self, kind: DependencyKind) -> &[DeclaredDependency] {
        match kind {
            DependencyKind::Runtime => &self.runtime,
            DependencyKind::Development => &self.development,
        }
    }

    /// All declared entries in [`DependencyKind::RESOLUTION_ORDER`].
    pub fn declared_in_resolution_order(&self) -> impl Iterator<Item = &DeclaredDependency> {
        DependencyKind::RESOLUTION_ORDER
            .into_iter()
            .flat_map(move |kind| self.declared(kind).iter())
    }

    pub fn declared_count(&self) -> usize {
        self.runtime.len() + self.development.len()
    }

    /// Copy of this manifest with both dependency maps replaced by `resolved`.
    ///
    /// A category with no resolved entries is dropped from the document, so a
    /// source `"devDependencies": {}` disappears and an absent field stays
    /// absent. Replaced fields keep their original position; every other field
    /// is copied as-is.
    #[must_use]
    pub fn with_resolved(&self, resolved: &ResolvedVersions) -> Self {
        let replacement = |kind: DependencyKind| -> Option<Value> {
            resolved.to_json_map(kind).map(Value::Object)
        };

        let mut document = Map::with_capacity(self.document.len());
        for (key, value) in &self.document {
            let kind = DependencyKind::RESOLUTION_ORDER
                .into_iter()
                .find(|k| k.field() == key.as_str());
            match kind {
                Some(kind) => {
                    if let Some(map) = replacement(kind) {
                        document.insert(key.clone(), map);
                    }
                }
                None => {
                    document.insert(key.clone(), value.clone());
                }
            }
        }

        let pinned = |kind: DependencyKind| -> Vec<DeclaredDependency> {
            resolved
                .get(kind)
                .iter()
                .map(|p| DeclaredDependency {
                    kind,
                    name: p.name.clone(),
                    spec: VersionSpec::new(p.version.as_str()),
                })
                .collect()
        };

        Self {
            document,
            runtime: pinned(DependencyKind::Runtime),
            development: pinned(DependencyKind::Development),
            trailing_newline: self.trailing_newline,
        }
    }

    /// Serialize with tab indentation. A trailing newline is written only if
    /// the source text had one.
    pub fn to_pretty_string(&self) -> Result<String, ManifestError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.document.serialize(&mut ser)?;
        if self.trailing_newline {
            buf.push(b'\n');
        }
        String::from_utf8(buf).map_err(|e| {
            ManifestError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })
    }
}

fn parse_dependency_map(
    document: &Map<String, Value>,
    kind: DependencyKind,
) -> Result<Vec<DeclaredDependency>, ManifestError> {
    let field = kind.field();
    let entries = match document.get(field) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Object(entries)) => entries,
        Some(_) => return Err(ManifestError::InvalidDependencies { field }),
    };

    entries
        .iter()
        .map(|(name, spec)| {
            let spec = spec
                .as_str()
                .ok_or_else(|| ManifestError::InvalidSpecifier {
                    field,
                    name: name.clone(),
                })?;
            Ok(DeclaredDependency {
                kind,
                name: PackageName::parse(name)?,
                spec: VersionSpec::new(spec),
            })
        })
        .collect()
}

/// Editors on some platforms save JSON with a leading UTF-8 byte order mark.
fn strip_bom(input: &str) -> &str {
    input.strip_prefix('\u{feff}').unwrap_or(input)
}

pub fn parse_manifest_str(input: &str) -> Result<PackageManifest, ManifestError> {
    let input = strip_bom(input);
    let Value::Object(document) = serde_json::from_str::<Value>(input)? else {
        return Err(ManifestError::NotAnObject);
    };
    let mut manifest = PackageManifest::from_document(document)?;
    manifest.trailing_newline = input.ends_with('\n');
    Ok(manifest)
}

pub fn parse_manifest_file(path: impl AsRef<Path>) -> Result<PackageManifest, ManifestError> {
    let content = fs::read_to_string(path)?;
    parse_manifest_str(&content)
}

/// The fields read from an installed package's own `package.json`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct InstalledPackage {
    #[serde(default)]
    pub name: Option<String>,
    pub version: InstalledVersion,
}

pub fn parse_installed_str(input: &str) -> Result<InstalledPackage, ManifestError> {
    Ok(serde_json::from_str(strip_bom(input))?)
}

pub fn parse_installed_file(path: impl AsRef<Path>) -> Result<InstalledPackage, ManifestError> {
    let content = fs::read_to_string(path)?;
    parse_installed_str(&content)
}
