// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::path::{Path, PathBuf};

use path_clean::clean;

pub type FindInParent = fn(&Path, &str) -> Option<PathBuf>;

/// Walk from `path` towards the filesystem root looking for `filename`
pub fn find_in_parent(path: &Path, filename: &str) -> Option<PathBuf> {
    path.ancestors()
        .map(|dir| dir.join(filename))
        .find(|candidate| candidate.exists())
}

/// Where the config file should be read from.
///
/// Precedence: an explicit file from the command line (relative paths are taken from `cwd`),
/// then the closest `default_filename` above `cwd`, then the OS config dir.
pub fn resolve_config_path(
    find_in_parent: FindInParent,
    cwd: &Path,
    default_config_dir: &Path,
    default_filename: &str,
    cli_file: Option<&Path>,
) -> PathBuf {
    match cli_file {
        Some(file) if file.is_absolute() => file.to_path_buf(),
        Some(file) => clean(cwd.join(file)),
        None => find_in_parent(cwd, default_filename)
            .unwrap_or_else(|| clean(default_config_dir.join(default_filename))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn not_found(_: &Path, _: &str) -> Option<PathBuf> {
        None
    }

    fn found(_: &Path, _: &str) -> Option<PathBuf> {
        Some(PathBuf::from("/foo/quiz.config.yaml"))
    }

    #[test]
    fn test_resolve_default_dir() {
        let path = resolve_config_path(
            not_found,
            Path::new("/foo/bar"),
            Path::new("/my/config"),
            "quiz.config.yaml",
            None,
        );
        assert_eq!(path, PathBuf::from("/my/config/quiz.config.yaml"));
    }

    #[test]
    fn test_resolve_cli_wins() {
        let path = resolve_config_path(
            found,
            Path::new("/foo/bar"),
            Path::new("/my/config"),
            "quiz.config.yaml",
            Some(Path::new("/my/absolute/conf.yaml")),
        );
        assert_eq!(path, PathBuf::from("/my/absolute/conf.yaml"));

        let path = resolve_config_path(
            found,
            Path::new("/foo/bar"),
            Path::new("/my/config"),
            "quiz.config.yaml",
            Some(Path::new("../conf.yaml")),
        );
        assert_eq!(path, PathBuf::from("/foo/conf.yaml"));
    }

    #[test]
    fn test_resolve_parent_search() {
        let path = resolve_config_path(
            found,
            Path::new("/foo/bar"),
            Path::new("/my/config"),
            "quiz.config.yaml",
            None,
        );
        assert_eq!(path, PathBuf::from("/foo/quiz.config.yaml"));
    }

    #[test]
    fn test_find_in_parent_on_disk() -> Result<()> {
        let root = tempfile::tempdir()?;
        let nested = root.path().join("a/b/c");
        std::fs::create_dir_all(&nested)?;
        std::fs::write(root.path().join("a/quiz.config.yaml"), "default_chain: 1\n")?;

        assert_eq!(
            find_in_parent(&nested, "quiz.config.yaml"),
            Some(root.path().join("a/quiz.config.yaml"))
        );
        assert_eq!(find_in_parent(&nested, "missing.yaml"), None);
        Ok(())
    }
}
