//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
///
/// # Example
/// ```text
/// /home/user/cp/AoC2024/       ← cwd
/// /home/user/cp/cpwatch.toml   ← found!
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_from(&cwd, config_name)
}

fn find_config_from(start: &Path, config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

/// Expand a leading `~` in a configured path.
pub fn expand_path(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(shellexpand::tilde(s).into_owned()),
        None => path.to_path_buf(),
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_walks_upward() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("AoC2024").join("day1");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(temp.path().join("cpwatch.toml"), "").unwrap();

        let found = find_config_from(&nested, Path::new("cpwatch.toml")).unwrap();
        assert_eq!(found, temp.path().join("cpwatch.toml"));
    }

    #[test]
    fn test_find_config_missing() {
        let temp = TempDir::new().unwrap();
        assert!(find_config_from(temp.path(), Path::new("definitely-not-here.toml")).is_none());
    }

    #[test]
    fn test_find_config_absolute() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.toml");
        assert!(find_config_from(temp.path(), &path).is_none());

        std::fs::write(&path, "").unwrap();
        assert_eq!(find_config_from(Path::new("/"), &path), Some(path));
    }

    #[test]
    fn test_expand_path_plain() {
        assert_eq!(expand_path(Path::new("out")), PathBuf::from("out"));
    }

    #[test]
    fn test_expand_path_tilde() {
        let Some(home) = std::env::var_os("HOME") else {
            return;
        };
        let expanded = expand_path(Path::new("~/cp"));
        assert_eq!(expanded, PathBuf::from(home).join("cp"));
    }
}
