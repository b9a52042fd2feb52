//! Argument types accepting either one value or a sequence of values.

use std::path::{Path, PathBuf};

/// One or more `.proto` file paths merged into a single schema root.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchemaPaths(Vec<PathBuf>);

impl SchemaPaths {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self(paths)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.0.iter().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for SchemaPaths {
    fn from(path: &str) -> Self {
        Self(vec![PathBuf::from(path)])
    }
}

impl From<String> for SchemaPaths {
    fn from(path: String) -> Self {
        Self(vec![PathBuf::from(path)])
    }
}

impl From<&Path> for SchemaPaths {
    fn from(path: &Path) -> Self {
        Self(vec![path.to_path_buf()])
    }
}

impl From<PathBuf> for SchemaPaths {
    fn from(path: PathBuf) -> Self {
        Self(vec![path])
    }
}

impl From<&PathBuf> for SchemaPaths {
    fn from(path: &PathBuf) -> Self {
        Self(vec![path.clone()])
    }
}

impl<P: AsRef<Path>> From<Vec<P>> for SchemaPaths {
    fn from(paths: Vec<P>) -> Self {
        Self(paths.iter().map(|p| p.as_ref().to_path_buf()).collect())
    }
}

impl<P: AsRef<Path>> From<&[P]> for SchemaPaths {
    fn from(paths: &[P]) -> Self {
        Self(paths.iter().map(|p| p.as_ref().to_path_buf()).collect())
    }
}

impl<P: AsRef<Path>, const N: usize> From<[P; N]> for SchemaPaths {
    fn from(paths: [P; N]) -> Self {
        Self(paths.iter().map(|p| p.as_ref().to_path_buf()).collect())
    }
}

/// A message type name: one dotted name, or a sequence of name segments.
///
/// Segments are joined with `.`, so `["pkg", "Outer", "Inner"]` and
/// `"pkg.Outer.Inner"` name the same type. A leading `.` (or a leading empty
/// segment) makes the name absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeName(String);

impl TypeName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name without a leading `.`, if the name is absolute.
    pub fn absolute(&self) -> Option<&str> {
        self.0.strip_prefix('.')
    }
}

impl std::fmt::Display for TypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&String> for TypeName {
    fn from(name: &String) -> Self {
        Self(name.clone())
    }
}

impl<S: AsRef<str>> From<Vec<S>> for TypeName {
    fn from(segments: Vec<S>) -> Self {
        Self::from(segments.as_slice())
    }
}

impl<S: AsRef<str>> From<&[S]> for TypeName {
    fn from(segments: &[S]) -> Self {
        Self(
            segments
                .iter()
                .map(|s| s.as_ref())
                .collect::<Vec<_>>()
                .join("."),
        )
    }
}

impl<S: AsRef<str>, const N: usize> From<[S; N]> for TypeName {
    fn from(segments: [S; N]) -> Self {
        Self::from(segments.as_slice())
    }
}
