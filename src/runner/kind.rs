//! Supported source languages.

use serde::{Deserialize, Serialize};
use std::{fmt, path::Path};

/// Language of a source file, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageKind {
    Cpp,
    C,
    Java,
    Python,
}

impl LanguageKind {
    /// Detect the language from a file extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "cpp" | "cc" | "cxx" => Some(Self::Cpp),
            "c" => Some(Self::C),
            "java" => Some(Self::Java),
            "py" => Some(Self::Python),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Canonical extension for newly created files.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Cpp => "cpp",
            Self::C => "c",
            Self::Java => "java",
            Self::Python => "py",
        }
    }

    /// Whether `/* ... */` comments exist, i.e. scripted inputs can be embedded.
    pub const fn has_block_comments(self) -> bool {
        !matches!(self, Self::Python)
    }
}

impl fmt::Display for LanguageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Cpp => "cpp",
            Self::C => "c",
            Self::Java => "java",
            Self::Python => "python",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(
            LanguageKind::from_path(Path::new("/cp/AoC/day1.cpp")),
            Some(LanguageKind::Cpp)
        );
        assert_eq!(
            LanguageKind::from_path(Path::new("Main.java")),
            Some(LanguageKind::Java)
        );
        assert_eq!(
            LanguageKind::from_path(Path::new("sol.py")),
            Some(LanguageKind::Python)
        );
        assert_eq!(LanguageKind::from_path(Path::new("notes.md")), None);
        assert_eq!(LanguageKind::from_path(Path::new("Makefile")), None);
    }

    #[test]
    fn test_extension_roundtrips() {
        let all = [
            LanguageKind::Cpp,
            LanguageKind::C,
            LanguageKind::Java,
            LanguageKind::Python,
        ];
        for kind in all {
            assert_eq!(LanguageKind::from_extension(kind.extension()), Some(kind));
        }
    }

    #[test]
    fn test_serde_lowercase() {
        let kind: LanguageKind = serde_json::from_str("\"java\"").unwrap();
        assert_eq!(kind, LanguageKind::Java);
        assert_eq!(serde_json::to_string(&LanguageKind::Cpp).unwrap(), "\"cpp\"");
    }

    #[test]
    fn test_python_has_no_block_comments() {
        assert!(!LanguageKind::Python.has_block_comments());
        assert!(LanguageKind::C.has_block_comments());
    }
}
