use crate::ManifestError;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// A dependency key from `package.json`, parsed once into its scope/name parts.
///
/// `@scope/name` becomes [`PackageName::Scoped`] (the `@` is not stored);
/// everything else is [`PackageName::Unscoped`]. [`Display`](fmt::Display)
/// reproduces the original key exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PackageName {
    Unscoped(String),
    Scoped { scope: String, name: String },
}

impl PackageName {
    pub fn parse(raw: &str) -> Result<Self, ManifestError> {
        let invalid = || ManifestError::InvalidPackageName(raw.to_owned());

        if let Some(rest) = raw.strip_prefix('@') {
            let (scope, name) = rest.split_once('/').ok_or_else(invalid)?;
            if !is_path_segment(scope) || !is_path_segment(name) {
                return Err(invalid());
            }
            return Ok(Self::Scoped {
                scope: scope.to_owned(),
                name: name.to_owned(),
            });
        }

        if !is_path_segment(raw) {
            return Err(invalid());
        }
        Ok(Self::Unscoped(raw.to_owned()))
    }

    /// Directory of this package relative to `node_modules`.
    pub fn install_dir(&self) -> PathBuf {
        match self {
            Self::Unscoped(name) => PathBuf::from(name),
            Self::Scoped { scope, name } => PathBuf::from(format!("@{scope}")).join(name),
        }
    }
}

// One directory level: no separators, no traversal.
fn is_path_segment(s: &str) -> bool {
    !s.is_empty() && s != "." && s != ".." && !s.contains(['/', '\\'])
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unscoped(name) => f.write_str(name),
            Self::Scoped { scope, name } => write!(f, "@{scope}/{name}"),
        }
    }
}

impl FromStr for PackageName {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
