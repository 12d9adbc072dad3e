//! Runner for languages with a separate compile step.

use super::{LanguageKind, Pipeline, RunError, Runner};
use crate::config::Config;
use crate::utils::exec::Cmd;
use regex::Regex;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

/// Compile with a fixed flag set into `out_dir`, then run the product.
#[derive(Debug, Clone)]
pub struct CompiledRunner {
    kind: LanguageKind,
    compiler: String,
    flags: Vec<String>,
    /// Placed after the source file.
    link_flags: Vec<String>,
    out_dir: PathBuf,
    /// Java only: launcher and its flags.
    runtime: Option<(String, Vec<String>)>,
}

impl CompiledRunner {
    pub fn cpp(config: &Config) -> Self {
        let lang = &config.lang;
        let mut flags = lang.cpp.flags.clone();
        if config.precompile.enable {
            // Lets `#include <bits/stdc++.h>` pick up the cached .gch
            flags.insert(0, format!("-I{}", config.precompile.cache_dir.display()));
        }
        Self {
            kind: LanguageKind::Cpp,
            compiler: lang.cpp.compiler.clone(),
            flags,
            link_flags: lang.cpp.link_flags.clone(),
            out_dir: lang.out_dir.clone(),
            runtime: None,
        }
    }

    pub fn c(config: &Config) -> Self {
        let lang = &config.lang;
        Self {
            kind: LanguageKind::C,
            compiler: lang.c.compiler.clone(),
            flags: lang.c.flags.clone(),
            link_flags: lang.c.link_flags.clone(),
            out_dir: lang.out_dir.clone(),
            runtime: None,
        }
    }

    pub fn java(config: &Config) -> Self {
        let lang = &config.lang;
        Self {
            kind: LanguageKind::Java,
            compiler: lang.java.compiler.clone(),
            flags: lang.java.flags.clone(),
            link_flags: Vec::new(),
            out_dir: lang.out_dir.clone(),
            runtime: Some((lang.java.runtime.clone(), lang.java.runtime_flags.clone())),
        }
    }

    fn prepare_native(&self, source: &Path, stem: &str) -> Pipeline {
        let binary = self.out_dir.join(stem);
        let compile = Cmd::new(&self.compiler)
            .args(&self.flags)
            .arg(source)
            .arg("-o")
            .arg(&binary)
            .args(&self.link_flags);
        let execute = Cmd::new(&binary).cwd(parent_dir(source));
        Pipeline::compiled(source, compile, execute)
    }

    fn prepare_java(
        &self,
        source: &Path,
        stem: &str,
        (runtime, runtime_flags): &(String, Vec<String>),
    ) -> Result<Pipeline, RunError> {
        let text =
            fs::read_to_string(source).map_err(|e| RunError::Io(source.to_path_buf(), e))?;
        let class = resolve_entry_class(&text).ok_or_else(|| RunError::EntryPointNotFound {
            path: source.to_path_buf(),
        })?;

        let classes = self.out_dir.join(stem);
        fs::create_dir_all(&classes).map_err(|e| RunError::Io(classes.clone(), e))?;

        let compile = Cmd::new(&self.compiler)
            .args(&self.flags)
            .arg("-d")
            .arg(&classes)
            .arg(source);
        let execute = Cmd::new(runtime)
            .args(runtime_flags)
            .arg("-cp")
            .arg(&classes)
            .arg(class)
            .cwd(parent_dir(source));
        Ok(Pipeline::compiled(source, compile, execute))
    }
}

impl Runner for CompiledRunner {
    fn kind(&self) -> LanguageKind {
        self.kind
    }

    fn prepare(&self, source: &Path) -> Result<Pipeline, RunError> {
        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| RunError::UnsupportedLanguage {
                path: source.to_path_buf(),
            })?;

        fs::create_dir_all(&self.out_dir).map_err(|e| RunError::Io(self.out_dir.clone(), e))?;

        match &self.runtime {
            Some(runtime) => self.prepare_java(source, stem, runtime),
            None => Ok(self.prepare_native(source, stem)),
        }
    }
}

fn parent_dir(path: &Path) -> &Path {
    path.parent().unwrap_or(Path::new("."))
}

// ============================================================================
// Entry point resolution
// ============================================================================

static COMMENTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)/\*.*?\*/|//[^\n]*|"(?:\\.|[^"\\])*""#).unwrap());

static PUBLIC_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?:^|[^[:word:]$])public[[:space:]]+",
        r"(?:(?:final|abstract|static)[[:space:]]+)*",
        r"class[[:space:]]+([A-Za-z_$][[:word:]$]*)",
    ))
    .unwrap()
});

static ANY_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^[:word:]$])class[[:space:]]+([A-Za-z_$][[:word:]$]*)").unwrap()
});

/// Find the class to hand to the JVM launcher.
///
/// Prefers the `public class`; otherwise the first class declared. Comments
/// and string literals are ignored. Patterns stick to ASCII classes (the
/// regex build carries no Unicode tables).
pub fn resolve_entry_class(source: &str) -> Option<String> {
    let code = COMMENTS.replace_all(source, " ");
    PUBLIC_CLASS
        .captures(&code)
        .or_else(|| ANY_CLASS.captures(&code))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
