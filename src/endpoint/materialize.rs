//! Problem file creation from a template.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::thread;

use super::{EndpointError, ProblemInfo};
use crate::config::Config;
use crate::utils::exec::Cmd;
use crate::{debug, log, logger};

/// Result of a materialize request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Materialized {
    Created(PathBuf),
    /// Left untouched.
    Existing(PathBuf),
}

impl Materialized {
    pub fn path(&self) -> &Path {
        match self {
            Self::Created(path) | Self::Existing(path) => path,
        }
    }
}

/// Where the problem's source file lives.
fn problem_path(problem: &ProblemInfo, config: &Config) -> PathBuf {
    let name = problem.file_stem();
    let ext = config.template.language.extension();
    config.root_join(format!("{name}.{ext}"))
}

/// Full file content: preamble, template, sample tests as trailing blocks.
fn render(problem: &ProblemInfo, template: &str) -> String {
    let mut out = String::new();
    out.push_str("/*\n");
    out.push_str(&format!(" * {}\n", problem.name));
    out.push_str(" *\n");
    out.push_str(&format!(" * Time Limit: {}\n", problem.time_limit_display()));
    out.push_str(&format!(" * Problem URL: {}\n", problem.url));
    out.push_str(" */\n");

    out.push('\n');
    out.push_str(template);
    out.push('\n');

    for test in &problem.tests {
        out.push_str("/*\n");
        out.push_str(&test.input);
        if !test.input.ends_with('\n') {
            out.push('\n');
        }
        out.push_str("*/");
    }
    out.push('\n');
    out
}

/// Read the template selected by URL. A missing template is an empty one.
fn load_template(problem: &ProblemInfo, config: &Config) -> String {
    let path = config.template.select(&problem.url);
    match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            debug!("serve"; "template {} unavailable ({}), using empty", path.display(), e);
            String::new()
        }
    }
}

/// Create the problem file unless it already exists. Never overwrites.
pub fn materialize(problem: &ProblemInfo, config: &Config) -> Result<Materialized, EndpointError> {
    let path = problem_path(problem, config);

    let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            log!("serve"; "{} already exists", config.root_relative(&path).display());
            return Ok(Materialized::Existing(path));
        }
        Err(e) => return Err(EndpointError::Io(path, e)),
    };

    let content = render(problem, &load_template(problem, config));
    file.write_all(content.as_bytes())
        .map_err(|e| EndpointError::Io(path.clone(), e))?;

    logger::status_success(&format!(
        "created {} ({} tests)",
        config.root_relative(&path).display(),
        problem.tests.len()
    ));
    Ok(Materialized::Created(path))
}

/// Open a file in the configured editor without waiting for it.
pub fn open_in_editor(config: &Config, file: &Path) {
    if !config.template.open_editor {
        return;
    }
    let argv = config.template.editor_command(config.get_root(), file);
    if argv.is_empty() {
        return;
    }

    let cmd = Cmd::from_slice(&argv);
    thread::spawn(move || {
        if let Err(e) = cmd.status() {
            logger::status_error("failed to open editor", &format!("{e:#}"));
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config_at;
    use crate::endpoint::problem::TestCase;
    use crate::runner::extract_scripted_inputs;
    use tempfile::TempDir;

    fn problem(name: &str) -> ProblemInfo {
        ProblemInfo {
            name: name.into(),
            url: "https://codeforces.com/contest/4/problem/A".into(),
            time_limit: 1000,
            tests: vec![
                TestCase {
                    input: "8\n".into(),
                    output: Some("YES\n".into()),
                },
                TestCase {
                    input: "5".into(),
                    output: None,
                },
            ],
        }
    }

    #[test]
    fn test_render_layout() {
        let content = render(&problem("A. Watermelon"), "int main() {}");
        assert!(content.starts_with("/*\n * A. Watermelon\n *\n * Time Limit: 1s\n"));
        assert!(content.contains(" * Problem URL: https://codeforces.com/contest/4/problem/A\n */\n"));
        assert!(content.contains("\nint main() {}\n"));
        assert!(content.ends_with("/*\n8\n*//*\n5\n*/\n"));
    }

    #[test]
    fn test_rendered_tests_become_scripted_inputs() {
        let content = render(&problem("A"), "int main() {}");
        assert_eq!(extract_scripted_inputs(&content), vec!["8\n", "5\n"]);
    }

    #[test]
    fn test_materialize_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let config = test_config_at(temp.path(), "[template]\nopen_editor = false");

        let first = materialize(&problem("A. Watermelon"), &config).unwrap();
        assert!(matches!(first, Materialized::Created(_)));
        fs::write(first.path(), "my solution").unwrap();

        let second = materialize(&problem("A. Watermelon"), &config).unwrap();
        assert_eq!(second, Materialized::Existing(first.path().to_path_buf()));
        assert_eq!(fs::read_to_string(first.path()).unwrap(), "my solution");
    }

    #[test]
    fn test_materialize_uses_selected_template() {
        let temp = TempDir::new().unwrap();
        let config = test_config_at(temp.path(), "");
        fs::create_dir_all(&config.template.dir).unwrap();
        fs::write(config.template.dir.join("codeforces.cpp"), "// cf template").unwrap();

        let created = materialize(&problem("B"), &config).unwrap();
        let content = fs::read_to_string(created.path()).unwrap();
        assert!(content.contains("// cf template"));
    }

    #[test]
    fn test_name_with_slash_stays_in_root() {
        let temp = TempDir::new().unwrap();
        let config = test_config_at(temp.path(), "");
        let path = problem_path(&problem("A/B"), &config);
        assert_eq!(path, config.root_join("A_B.cpp"));
    }
}
