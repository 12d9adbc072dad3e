//! `[lang]` section configuration.
//!
//! Toolchain and flags for every supported language.
//!
//! # Example
//!
//! ```toml
//! [lang]
//! out_dir = "out"
//!
//! [lang.cpp]
//! compiler = "g++"
//! flags = ["-std=c++20", "-Wall", "-Wshadow", "-Werror", "-g", "-fsanitize=address,undefined"]
//!
//! [lang.java]
//! compiler = "javac"
//! runtime = "java"
//!
//! [lang.python]
//! interpreter = "pypy3"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Toolchains per language.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LangConfig {
    /// Build products (`<out_dir>/<stem>`), relative to the watch root.
    pub out_dir: PathBuf,
    pub cpp: CppConfig,
    pub c: CConfig,
    pub java: JavaConfig,
    pub python: PythonConfig,
}

impl Default for LangConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("out"),
            cpp: CppConfig::default(),
            c: CConfig::default(),
            java: JavaConfig::default(),
            python: PythonConfig::default(),
        }
    }
}

impl LangConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let programs = [
            (FieldPath::new("lang.cpp.compiler"), &self.cpp.compiler),
            (FieldPath::new("lang.c.compiler"), &self.c.compiler),
            (FieldPath::new("lang.java.compiler"), &self.java.compiler),
            (FieldPath::new("lang.java.runtime"), &self.java.runtime),
            (FieldPath::new("lang.python.interpreter"), &self.python.interpreter),
        ];
        for (field, program) in programs {
            if program.trim().is_empty() {
                diag.error(field, "must not be empty");
            }
        }
    }
}

/// `[lang.cpp]`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CppConfig {
    pub compiler: String,
    pub flags: Vec<String>,
    /// Flags placed after the source file (libraries).
    pub link_flags: Vec<String>,
}

impl Default for CppConfig {
    fn default() -> Self {
        Self {
            compiler: "g++".into(),
            flags: strings(&[
                "-std=c++20",
                "-Wall",
                "-Wshadow",
                "-Werror",
                "-g",
                "-fsanitize=address,undefined",
            ]),
            link_flags: Vec::new(),
        }
    }
}

/// `[lang.c]`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CConfig {
    pub compiler: String,
    pub flags: Vec<String>,
    /// Flags placed after the source file (libraries).
    pub link_flags: Vec<String>,
}

impl Default for CConfig {
    fn default() -> Self {
        Self {
            compiler: "gcc".into(),
            flags: strings(&[
                "-std=c17",
                "-Wall",
                "-Wshadow",
                "-Werror",
                "-g",
                "-fsanitize=address,undefined",
            ]),
            link_flags: strings(&["-lm"]),
        }
    }
}

/// `[lang.java]`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JavaConfig {
    pub compiler: String,
    pub flags: Vec<String>,
    /// JVM launcher, given the entry class name.
    pub runtime: String,
    pub runtime_flags: Vec<String>,
}

impl Default for JavaConfig {
    fn default() -> Self {
        Self {
            compiler: "javac".into(),
            flags: strings(&["-Werror", "-Xlint:all", "-g"]),
            runtime: "java".into(),
            runtime_flags: Vec::new(),
        }
    }
}

/// `[lang.python]`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PythonConfig {
    pub interpreter: String,
    pub flags: Vec<String>,
}

impl Default for PythonConfig {
    fn default() -> Self {
        Self {
            interpreter: "python3".into(),
            flags: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{ConfigDiagnostics, test_parse_config};

    #[test]
    fn test_lang_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.lang.cpp.compiler, "g++");
        assert!(config.lang.cpp.flags.iter().any(|f| f == "-Werror"));
        assert!(config.lang.cpp.flags.iter().any(|f| f.starts_with("-fsanitize")));
        assert_eq!(config.lang.c.link_flags, vec!["-lm".to_string()]);
        assert_eq!(config.lang.java.runtime, "java");
    }

    #[test]
    fn test_partial_language_keeps_other_defaults() {
        let config = test_parse_config("[lang.cpp]\ncompiler = \"clang++\"");
        assert_eq!(config.lang.cpp.compiler, "clang++");
        // flags of the overridden table fall back to the cpp defaults
        assert!(config.lang.cpp.flags.iter().any(|f| f == "-std=c++20"));
        assert_eq!(config.lang.c.compiler, "gcc");
    }

    #[test]
    fn test_empty_program_rejected() {
        let config = test_parse_config("[lang.python]\ninterpreter = \"\"");
        let mut diag = ConfigDiagnostics::new();
        config.lang.validate(&mut diag);
        assert_eq!(diag.len(), 1);
        assert_eq!(diag.errors()[0].field.as_str(), "lang.python.interpreter");
    }
}
