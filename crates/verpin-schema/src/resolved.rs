use crate::manifest::DependencyKind;
use crate::name::PackageName;
use crate::types::InstalledVersion;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// A declared dependency paired with the version found in `node_modules`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPackage {
    pub name: PackageName,
    pub version: InstalledVersion,
}

/// Installed versions per dependency category, in the order they were resolved.
///
/// Built fresh on every run and only ever consumed by
/// [`PackageManifest::with_resolved`](crate::PackageManifest::with_resolved).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedVersions {
    runtime: Vec<ResolvedPackage>,
    development: Vec<ResolvedPackage>,
}

impl ResolvedVersions {
    /// Record `name` under `kind`. A repeated name overwrites its earlier version.
    pub fn insert(&mut self, kind: DependencyKind, name: PackageName, version: InstalledVersion) {
        let entries = self.entries_mut(kind);
        if let Some(existing) = entries.iter_mut().find(|p| p.name == name) {
            existing.version = version;
        } else {
            entries.push(ResolvedPackage { name, version });
        }
    }

    pub fn get(&self, kind: DependencyKind) -> &[ResolvedPackage] {
        match kind {
            DependencyKind::Runtime => &self.runtime,
            DependencyKind::Development => &self.development,
        }
    }

    pub fn version_of(&self, kind: DependencyKind, name: &PackageName) -> Option<&InstalledVersion> {
        self.get(kind)
            .iter()
            .find(|p| p.name == *name)
            .map(|p| &p.version)
    }

    pub fn len(&self) -> usize {
        self.runtime.len() + self.development.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runtime.is_empty() && self.development.is_empty()
    }

    /// The `package.json` object for one category, or `None` when nothing was
    /// resolved for it.
    pub fn to_json_map(&self, kind: DependencyKind) -> Option<Map<String, Value>> {
        let entries = self.get(kind);
        if entries.is_empty() {
            return None;
        }
        Some(
            entries
                .iter()
                .map(|p| (p.name.to_string(), Value::String(p.version.to_string())))
                .collect(),
        )
    }

    fn entries_mut(&mut self, kind: DependencyKind) -> &mut Vec<ResolvedPackage> {
        match kind {
            DependencyKind::Runtime => &mut self.runtime,
            DependencyKind::Development => &mut self.development,
        }
    }
}

// Same shape as the pinned section of package.json; empty categories are omitted.
impl Serialize for ResolvedVersions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for kind in [DependencyKind::Runtime, DependencyKind::Development] {
            if let Some(entries) = self.to_json_map(kind) {
                map.serialize_entry(kind.field(), &entries)?;
            }
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(raw: &str) -> PackageName {
        PackageName::parse(raw).unwrap()
    }

    #[test]
    fn insert_keeps_resolution_order() {
        let mut resolved = ResolvedVersions::default();
        resolved.insert(DependencyKind::Runtime, name("zod"), "3.22.4".into());
        resolved.insert(DependencyKind::Runtime, name("axios"), "1.6.0".into());
        let names: Vec<String> = resolved
            .get(DependencyKind::Runtime)
            .iter()
            .map(|p| p.name.to_string())
            .collect();
        assert_eq!(names, ["zod", "axios"]);
        assert_eq!(resolved.len(), 2);
    }

    #[test]
    fn insert_same_name_overwrites() {
        let mut resolved = ResolvedVersions::default();
        resolved.insert(DependencyKind::Development, name("jest"), "29.0.0".into());
        resolved.insert(DependencyKind::Development, name("jest"), "29.7.0".into());
        assert_eq!(resolved.len(), 1);
        assert_eq!(
            resolved
                .version_of(DependencyKind::Development, &name("jest"))
                .unwrap(),
            "29.7.0"
        );
    }

    #[test]
    fn categories_are_independent() {
        let mut resolved = ResolvedVersions::default();
        resolved.insert(DependencyKind::Runtime, name("react"), "18.2.0".into());
        assert!(resolved
            .version_of(DependencyKind::Development, &name("react"))
            .is_none());
        assert!(resolved.to_json_map(DependencyKind::Development).is_none());
    }

    #[test]
    fn json_map_uses_original_keys() {
        let mut resolved = ResolvedVersions::default();
        resolved.insert(DependencyKind::Runtime, name("@types/node"), "20.1.0".into());
        let map = resolved.to_json_map(DependencyKind::Runtime).unwrap();
        assert_eq!(map["@types/node"], "20.1.0");
    }

    #[test]
    fn serializes_like_package_json_sections() {
        let mut resolved = ResolvedVersions::default();
        assert!(resolved.is_empty());
        resolved.insert(DependencyKind::Development, name("jest"), "29.7.0".into());
        let json = serde_json::to_value(&resolved).unwrap();
        assert_eq!(json, serde_json::json!({"devDependencies": {"jest": "29.7.0"}}));
    }
}
