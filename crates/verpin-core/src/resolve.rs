use crate::layout::ProjectLayout;
use crate::CoreError;
use std::io::ErrorKind;
use tracing::{debug, info, warn};
use verpin_schema::{
    parse_installed_file, DeclaredDependency, InstalledVersion, ManifestError, PackageManifest,
    ResolvedVersions,
};

/// Observer for resolution progress.
///
/// Purely informational: nothing a reporter does can change what gets
/// resolved or written.
pub trait ProgressReporter {
    fn start(&self, total: usize);

    fn advance(&self, dependency: &DeclaredDependency, version: &InstalledVersion);

    fn finish(&self);

    /// Called instead of [`finish`](Self::finish) when resolution fails.
    fn abandon(&self) {}
}

/// Reporter that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn start(&self, _total: usize) {}

    fn advance(&self, _dependency: &DeclaredDependency, _version: &InstalledVersion) {}

    fn finish(&self) {}
}

/// Look up the installed version of every declared dependency.
///
/// Development dependencies are resolved first, then runtime dependencies,
/// each in declaration order. The first dependency that cannot be resolved
/// aborts the whole run.
pub fn resolve_installed(
    layout: &ProjectLayout,
    manifest: &PackageManifest,
    reporter: &dyn ProgressReporter,
) -> Result<ResolvedVersions, CoreError> {
    let total = manifest.declared_count();
    reporter.start(total);

    let mut resolved = ResolvedVersions::default();
    for dependency in manifest.declared_in_resolution_order() {
        let version = match resolve_one(layout, dependency) {
            Ok(version) => version,
            Err(e) => {
                reporter.abandon();
                return Err(e);
            }
        };
        reporter.advance(dependency, &version);
        resolved.insert(dependency.kind, dependency.name.clone(), version);
    }

    reporter.finish();
    info!(
        "resolved {total} installed versions under {}",
        layout.modules_dir().display()
    );
    Ok(resolved)
}

fn resolve_one(
    layout: &ProjectLayout,
    dependency: &DeclaredDependency,
) -> Result<InstalledVersion, CoreError> {
    let path = layout.installed_manifest(&dependency.name);
    let installed = parse_installed_file(&path).map_err(|e| match e {
        ManifestError::Io(io) if io.kind() == ErrorKind::NotFound => CoreError::NotInstalled {
            name: dependency.name.to_string(),
            path: path.clone(),
        },
        other => CoreError::InstalledManifest {
            name: dependency.name.to_string(),
            source: other,
        },
    })?;

    if let Some(installed_name) = installed.name.as_deref() {
        if installed_name != dependency.name.to_string() {
            warn!(
                "{} declares '{}' but the installed package is named '{installed_name}'",
                path.display(),
                dependency.name
            );
        }
    }

    debug!(
        "{} {}: {} -> {}",
        dependency.kind.field(),
        dependency.name,
        dependency.spec,
        installed.version
    );
    Ok(installed.version)
}
