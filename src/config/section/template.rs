//! `[template]` section configuration.
//!
//! Controls how a problem received on the control endpoint becomes a file.
//!
//! # Example
//!
//! ```toml
//! [template]
//! language = "cpp"
//! dir = "templates"
//! default = "codeforces.cpp"
//! editor = ["code", "-a", "{root}", "{file}"]
//!
//! [[template.special]]
//! url = "atcoder.jp"
//! file = "atcoder.cpp"
//! ```
//!
//! `special` entries are tried in order; the first whose `url` is a substring
//! of the problem URL wins.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::runner::LanguageKind;

/// A template bound to a judge by URL substring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialTemplate {
    pub url: String,
    pub file: PathBuf,
}

impl SpecialTemplate {
    fn new(url: &str, file: &str) -> Self {
        Self {
            url: url.into(),
            file: PathBuf::from(file),
        }
    }
}

/// Problem file templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Language of materialized problem files.
    pub language: LanguageKind,

    /// Template directory, relative to the watch root.
    pub dir: PathBuf,

    /// Template used when no `special` entry matches (relative to `dir`).
    pub default: PathBuf,

    /// Judge-specific templates.
    pub special: Vec<SpecialTemplate>,

    /// Editor command. `{root}` and `{file}` are substituted.
    pub editor: Vec<String>,

    /// Open new problem files in the editor.
    pub open_editor: bool,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            language: LanguageKind::Cpp,
            dir: PathBuf::from("templates"),
            default: PathBuf::from("codeforces.cpp"),
            special: vec![
                SpecialTemplate::new("codeforces.com", "codeforces.cpp"),
                SpecialTemplate::new("codechef.com", "codechef.cpp"),
                SpecialTemplate::new("codingcompetitions.withgoogle.com", "google.cpp"),
            ],
            editor: vec!["code".into(), "-a".into(), "{root}".into(), "{file}".into()],
            open_editor: true,
        }
    }
}

impl TemplateConfig {
    const LANGUAGE: FieldPath = FieldPath::new("template.language");
    const EDITOR: FieldPath = FieldPath::new("template.editor");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !self.language.has_block_comments() {
            diag.error_with_hint(
                Self::LANGUAGE,
                format!(
                    "`{}` has no `/* */` comments to carry sample tests",
                    self.language
                ),
                "use cpp, c or java",
            );
        }
        if self.open_editor && self.editor.is_empty() {
            diag.error_with_hint(
                Self::EDITOR,
                "must not be empty when `open_editor` is enabled",
                "set `open_editor = false` to skip launching an editor",
            );
        }
    }

    /// Pick the template for a problem URL.
    pub fn select(&self, url: &str) -> PathBuf {
        let file = self
            .special
            .iter()
            .find(|t| url.contains(t.url.as_str()))
            .map_or(&self.default, |t| &t.file);
        self.dir.join(file)
    }

    /// Editor argv with placeholders substituted.
    pub fn editor_command(&self, root: &Path, file: &Path) -> Vec<String> {
        let root = root.display().to_string();
        let file = file.display().to_string();
        self.editor
            .iter()
            .map(|arg| arg.replace("{root}", &root).replace("{file}", &file))
            .collect()
    }
}
