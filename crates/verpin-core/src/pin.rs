use crate::layout::ProjectLayout;
use crate::resolve::{resolve_installed, ProgressReporter};
use crate::CoreError;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;
use verpin_schema::{PackageManifest, ResolvedVersions};

/// Outcome of a successful pin.
#[derive(Debug, Clone, Serialize)]
pub struct PinReport {
    pub manifest: PathBuf,
    /// Number of declared dependencies that were resolved.
    pub total: usize,
    /// Entries whose written version differs from what was declared.
    pub changed: usize,
    pub resolved: ResolvedVersions,
}

/// Rewrites one project's `package.json` so every dependency is pinned to
/// the version installed in its `node_modules`.
pub struct Pinner {
    layout: ProjectLayout,
}

impl Pinner {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            layout: ProjectLayout::new(project_root),
        }
    }

    /// Validate the project, resolve installed versions, and overwrite
    /// `package.json`. Nothing is written unless every dependency resolved.
    pub fn pin(&self, reporter: &dyn ProgressReporter) -> Result<PinReport, CoreError> {
        info!("pinning dependencies in {}", self.layout.root().display());
        let manifest = self.layout.load_manifest()?;
        let resolved = resolve_installed(&self.layout, &manifest, reporter)?;

        let pinned = manifest.with_resolved(&resolved);
        let text = pinned.to_pretty_string()?;
        let manifest_path = self.layout.manifest_file();
        write_atomic(&manifest_path, &text)?;

        let changed = count_changed(&manifest, &resolved);
        info!(
            "wrote {} ({changed} of {} entries changed)",
            manifest_path.display(),
            resolved.len()
        );
        Ok(PinReport {
            manifest: manifest_path,
            total: resolved.len(),
            changed,
            resolved,
        })
    }
}

fn count_changed(manifest: &PackageManifest, resolved: &ResolvedVersions) -> usize {
    manifest
        .declared_in_resolution_order()
        .filter(|d| {
            resolved
                .version_of(d.kind, &d.name)
                .is_some_and(|v| !v.matches_spec(&d.spec))
        })
        .count()
}

/// Replace `dest` in full. Symlinks are followed so the link target is what
/// gets rewritten; the new content goes to a temp file beside that target and
/// is renamed over it, carrying over the original permissions.
fn write_atomic(dest: &Path, content: &str) -> Result<(), CoreError> {
    let target = fs::canonicalize(dest)?;
    let dir = target
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let permissions = fs::metadata(&target)?.permissions();

    let mut tmp = NamedTempFile::new_in(&dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().set_permissions(permissions)?;
    tmp.as_file().sync_all()?;
    tmp.persist(&target).map_err(|e| CoreError::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::NullReporter;

    fn project_with(manifest: &str, installed: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("package.json"), manifest).unwrap();
        fs::create_dir(dir.path().join("node_modules")).unwrap();
        for (name, version) in installed {
            let pkg = dir.path().join("node_modules").join(name);
            fs::create_dir_all(&pkg).unwrap();
            fs::write(
                pkg.join("package.json"),
                format!(r#"{{"name": "{name}", "version": "{version}"}}"#),
            )
            .unwrap();
        }
        dir
    }

    #[test]
    fn pins_declared_range_to_installed_version() {
        let dir = project_with(
            r#"{"dependencies": {"lodash": "^4.0.0"}}"#,
            &[("lodash", "4.17.21")],
        );
        let report = Pinner::new(dir.path()).pin(&NullReporter).unwrap();
        assert_eq!(report.total, 1);
        assert_eq!(report.changed, 1);

        let written = fs::read_to_string(dir.path().join("package.json")).unwrap();
        assert_eq!(written, "{\n\t\"dependencies\": {\n\t\t\"lodash\": \"4.17.21\"\n\t}\n}");
    }

    #[test]
    fn already_pinned_entries_are_not_counted_as_changed() {
        let dir = project_with(
            r#"{"dependencies": {"a": "1.0.0", "b": "^2.0.0"}}"#,
            &[("a", "1.0.0"), ("b", "2.3.1")],
        );
        let report = Pinner::new(dir.path()).pin(&NullReporter).unwrap();
        assert_eq!(report.total, 2);
        assert_eq!(report.changed, 1);
    }

    #[test]
    fn failed_resolution_leaves_manifest_untouched() {
        let source = r#"{"dependencies": {"missing": "^1.0.0"}}"#;
        let dir = project_with(source, &[]);
        let err = Pinner::new(dir.path()).pin(&NullReporter).unwrap_err();
        assert!(matches!(err, CoreError::NotInstalled { .. }));
        let after = fs::read_to_string(dir.path().join("package.json")).unwrap();
        assert_eq!(after, source);
    }

    #[cfg(unix)]
    #[test]
    fn rewrite_keeps_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = project_with(r#"{"dependencies": {"a": "^1"}}"#, &[("a", "1.2.0")]);
        let path = dir.path().join("package.json");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        Pinner::new(dir.path()).pin(&NullReporter).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn rewrite_writes_through_symlinked_manifest() {
        let dir = project_with(r#"{"dependencies": {"a": "^1"}}"#, &[("a", "1.2.0")]);
        let link = dir.path().join("package.json");
        let shared = dir.path().join("shared-package.json");
        fs::rename(&link, &shared).unwrap();
        std::os::unix::fs::symlink(&shared, &link).unwrap();

        Pinner::new(dir.path()).pin(&NullReporter).unwrap();

        let link_meta = fs::symlink_metadata(&link).unwrap();
        assert!(link_meta.file_type().is_symlink(), "link must survive");
        let target = fs::read_to_string(&shared).unwrap();
        assert!(target.contains("\"a\": \"1.2.0\""), "{target}");
    }

    #[test]
    fn manifest_with_byte_order_mark_is_pinned() {
        let dir = project_with(
            "\u{feff}{\"dependencies\": {\"a\": \"^1\"}}",
            &[("a", "1.2.0")],
        );
        let report = Pinner::new(dir.path()).pin(&NullReporter).unwrap();
        assert_eq!(report.changed, 1);

        let written = fs::read_to_string(dir.path().join("package.json")).unwrap();
        assert_eq!(written, "{\n\t\"dependencies\": {\n\t\t\"a\": \"1.2.0\"\n\t}\n}");
    }

    #[test]
    fn report_serializes_resolved_sections() {
        let dir = project_with(
            r#"{"devDependencies": {"jest": "^29.0.0"}}"#,
            &[("jest", "29.7.0")],
        );
        let report = Pinner::new(dir.path()).pin(&NullReporter).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["resolved"]["devDependencies"]["jest"], "29.7.0");
        assert!(json["resolved"].get("dependencies").is_none());
        assert_eq!(json["changed"], 1);
    }
}
