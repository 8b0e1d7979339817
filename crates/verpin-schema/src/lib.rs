//! Document model for verpin.
//!
//! This crate defines the schema layer: order-preserving `package.json`
//! parsing (`PackageManifest`), structured dependency names (`PackageName`),
//! declared/installed version newtypes, the per-run resolved version map
//! (`ResolvedVersions`), and the tab-indented serialization used when the
//! pinned manifest is written back.

pub mod manifest;
pub mod name;
pub mod resolved;
pub mod types;

pub use manifest::{
    parse_installed_file, parse_installed_str, parse_manifest_file, parse_manifest_str,
    DeclaredDependency, DependencyKind, InstalledPackage, ManifestError, PackageManifest,
};
pub use name::PackageName;
pub use resolved::{ResolvedPackage, ResolvedVersions};
pub use types::{InstalledVersion, VersionSpec};
