// SPDX-FileCopyrightText: 2026 Gauntlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Path pattern resolution for manifest entries.
//!
//! Patterns are `/`-separated. Each component is one of:
//!
//! - `.` or empty: stay in the current directories
//! - `..`: move to the parent directory
//! - `**`: the current directories plus every directory nested below them
//! - anything else: immediate subdirectories matching a shell wildcard
//!
//! Unlike most glob dialects, `**` includes the starting directory itself so
//! that `**/addins/` also matches `./addins/`.

use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use gauntlet_core::GauntletError;
use glob::Pattern;
use tracing::debug;
use walkdir::WalkDir;

/// Expand a directory pattern relative to `start`.
///
/// Results are order-stable: siblings are visited in file-name order and
/// duplicates keep their first position.
pub fn resolve_directories(start: &Path, pattern: &str) -> Result<Vec<PathBuf>, GauntletError> {
    check_arguments(start, pattern)?;
    let pattern = pattern.replace('\\', "/");
    let (root, rest) = split_root(&pattern);
    let base = root.unwrap_or_else(|| normalize(start));

    let mut frontier = vec![base];
    for component in rest.split('/') {
        frontier = expand_step(frontier, component)?;
    }
    Ok(frontier)
}

/// Expand a file pattern relative to `start`.
///
/// Everything up to the last `/` is resolved with [`resolve_directories`];
/// the final component is matched against file names in each result.
pub fn resolve_files(start: &Path, pattern: &str) -> Result<Vec<PathBuf>, GauntletError> {
    check_arguments(start, pattern)?;
    let pattern = pattern.replace('\\', "/");

    let (directories, file_pattern) = match pattern.rfind('/') {
        Some(index) => (
            resolve_directories(start, &pattern[..=index])?,
            &pattern[index + 1..],
        ),
        None => (vec![normalize(start)], pattern.as_str()),
    };

    let matcher = compile(file_pattern)?;
    let mut files = Unique::default();
    for dir in directories {
        for (name, path) in children(&dir) {
            if path.is_file() && matcher.matches(&name) {
                files.push(path);
            }
        }
    }
    Ok(files.into_vec())
}

fn check_arguments(start: &Path, pattern: &str) -> Result<(), GauntletError> {
    if pattern.is_empty() {
        return Err(GauntletError::InvalidArgument(
            "pattern must not be empty".to_string(),
        ));
    }
    if start.as_os_str().is_empty() {
        return Err(GauntletError::InvalidArgument(
            "start directory must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Absolute patterns resolve from their own root instead of the start directory.
fn split_root(pattern: &str) -> (Option<PathBuf>, &str) {
    if let Some(rest) = pattern.strip_prefix('/') {
        return (Some(PathBuf::from("/")), rest);
    }
    let bytes = pattern.as_bytes();
    if bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/' {
        return (Some(PathBuf::from(&pattern[..3])), &pattern[3..]);
    }
    (None, pattern)
}

fn expand_step(frontier: Vec<PathBuf>, component: &str) -> Result<Vec<PathBuf>, GauntletError> {
    let mut next = Unique::default();
    match component {
        "" | "." => return Ok(frontier),
        ".." => {
            for dir in frontier {
                if let Some(parent) = dir.parent() {
                    next.push(parent.to_path_buf());
                }
            }
        }
        "**" => {
            for dir in frontier {
                next.push(dir.clone());
                let walker = WalkDir::new(&dir).min_depth(1).sort_by_file_name();
                for entry in walker {
                    match entry {
                        Ok(entry) if entry.file_type().is_dir() => next.push(entry.into_path()),
                        Ok(_) => {}
                        Err(e) => debug!(dir = %dir.display(), error = %e, "skipping unreadable entry"),
                    }
                }
            }
        }
        wildcard => {
            let matcher = compile(wildcard)?;
            for dir in frontier {
                for (name, path) in children(&dir) {
                    if path.is_dir() && matcher.matches(&name) {
                        next.push(path);
                    }
                }
            }
        }
    }
    Ok(next.into_vec())
}

fn compile(component: &str) -> Result<Pattern, GauntletError> {
    Pattern::new(component).map_err(|e| {
        GauntletError::InvalidArgument(format!("invalid wildcard `{component}`: {e}"))
    })
}

/// Entries of `dir` sorted by name. Unreadable directories have no children.
fn children(dir: &Path) -> Vec<(String, PathBuf)> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "cannot list directory");
            return Vec::new();
        }
    };
    let mut children: Vec<(String, PathBuf)> = entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            Some((name, entry.path()))
        })
        .collect();
    children.sort();
    children
}

/// Make `path` absolute and fold `.` and `..` lexically so parents are real parents.
fn normalize(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Insertion-ordered set of paths.
#[derive(Default)]
struct Unique {
    seen: HashSet<PathBuf>,
    items: Vec<PathBuf>,
}

impl Unique {
    fn push(&mut self, path: PathBuf) {
        if self.seen.insert(path.clone()) {
            self.items.push(path);
        }
    }

    fn into_vec(self) -> Vec<PathBuf> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    /// root/
    ///   a/x/deep/
    ///   a/y/
    ///   b/
    ///   plugins/special.dll, plugins/other.wasm
    ///   top.wasm
    fn tree() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for sub in ["a/x/deep", "a/y", "b", "plugins"] {
            fs::create_dir_all(root.join(sub)).unwrap();
        }
        fs::write(root.join("plugins/special.dll"), b"").unwrap();
        fs::write(root.join("plugins/other.wasm"), b"").unwrap();
        fs::write(root.join("top.wasm"), b"").unwrap();
        dir
    }

    fn rel(root: &Path, paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| {
                p.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn literal_directory() {
        let dir = tree();
        let found = resolve_directories(dir.path(), "plugins/").unwrap();
        assert_eq!(found, vec![dir.path().join("plugins")]);
    }

    #[test]
    fn dot_and_empty_components_are_noops() {
        let dir = tree();
        let found = resolve_directories(dir.path(), "./a//./x/").unwrap();
        assert_eq!(found, vec![dir.path().join("a").join("x")]);
    }

    #[test]
    fn wildcard_matches_immediate_subdirectories_only() {
        let dir = tree();
        let found = resolve_directories(dir.path(), "a/*/").unwrap();
        assert_eq!(rel(dir.path(), &found), vec!["a/x", "a/y"]);
    }

    #[test]
    fn parent_component_moves_up() {
        let dir = tree();
        let start = dir.path().join("a").join("x");
        let found = resolve_directories(&start, "../y/").unwrap();
        assert_eq!(found, vec![dir.path().join("a").join("y")]);
    }

    #[test]
    fn double_star_includes_start_and_all_descendants() {
        let dir = tree();
        let found = resolve_directories(dir.path(), "**").unwrap();
        assert_eq!(found[0], dir.path());
        assert_eq!(
            rel(dir.path(), &found[1..]),
            vec!["a", "a/x", "a/x/deep", "a/y", "b", "plugins"]
        );
    }

    #[test]
    fn double_star_then_literal_matches_at_any_depth() {
        let dir = tree();
        let found = resolve_directories(dir.path(), "**/x/").unwrap();
        assert_eq!(rel(dir.path(), &found), vec!["a/x"]);
    }

    #[test]
    fn files_with_directory_prefix() {
        let dir = tree();
        let found = resolve_files(dir.path(), "plugins/special.dll").unwrap();
        assert_eq!(found, vec![dir.path().join("plugins").join("special.dll")]);
    }

    #[test]
    fn files_without_slash_match_in_start() {
        let dir = tree();
        let found = resolve_files(dir.path(), "*.wasm").unwrap();
        assert_eq!(found, vec![dir.path().join("top.wasm")]);
    }

    #[test]
    fn files_below_double_star() {
        let dir = tree();
        let found = resolve_files(dir.path(), "**/*.wasm").unwrap();
        assert_eq!(rel(dir.path(), &found), vec!["top.wasm", "plugins/other.wasm"]);
    }

    #[test]
    fn absolute_pattern_ignores_start() {
        let dir = tree();
        let elsewhere = tempfile::tempdir().unwrap();
        let pattern = format!(
            "{}/plugins/",
            dir.path().to_string_lossy().replace('\\', "/")
        );
        let found = resolve_directories(elsewhere.path(), &pattern).unwrap();
        assert_eq!(found, vec![dir.path().join("plugins")]);
    }

    #[test]
    fn missing_directory_resolves_to_nothing() {
        let dir = tree();
        assert!(resolve_directories(dir.path(), "nope/").unwrap().is_empty());
        assert!(resolve_files(dir.path(), "nope/*.wasm").unwrap().is_empty());
    }

    #[test]
    fn empty_pattern_is_invalid() {
        let dir = tree();
        assert!(matches!(
            resolve_directories(dir.path(), ""),
            Err(GauntletError::InvalidArgument(_))
        ));
        assert!(matches!(
            resolve_files(Path::new(""), "*.wasm"),
            Err(GauntletError::InvalidArgument(_))
        ));
    }

    #[test]
    fn malformed_wildcard_is_invalid() {
        let dir = tree();
        assert!(matches!(
            resolve_directories(dir.path(), "[a/"),
            Err(GauntletError::InvalidArgument(_))
        ));
    }

    proptest! {
        #[test]
        fn resolution_is_idempotent(pattern in prop::sample::select(vec![
            "**", "**/", "a/*/", "*/", "**/x/", "a/../b/", "./**/deep/", "*/*/*/",
        ])) {
            let dir = tree();
            let first = resolve_directories(dir.path(), pattern).unwrap();
            let second = resolve_directories(dir.path(), pattern).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
