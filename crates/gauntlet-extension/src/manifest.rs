// SPDX-FileCopyrightText: 2026 Gauntlet Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin manifest parsing.
//!
//! A manifest is a line-oriented text file listing directory patterns
//! (ending in `/`) and file patterns that locate plugin modules relative to
//! the manifest's own directory. Other tools reuse the same file extension
//! for XML documents; those files are recognised and ignored.

use std::fs;
use std::path::Path;

use gauntlet_core::GauntletError;
use tracing::warn;

/// One non-empty line of a manifest after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// 1-based line number in the source file.
    pub line_number: usize,
    /// The line exactly as it appeared in the file.
    pub raw_text: String,
    /// Comment-stripped, trimmed text with `/` separators.
    pub normalized_text: String,
}

impl ManifestEntry {
    /// Directory patterns end in `/` and are scanned recursively for manifests or modules.
    pub fn is_directory_pattern(&self) -> bool {
        self.normalized_text.ends_with('/')
    }

    /// True if the entry contains shell wildcard characters.
    pub fn has_wildcard(&self) -> bool {
        self.normalized_text.contains(['*', '?', '['])
    }
}

/// Read and parse the manifest at `path`.
///
/// Fails with [`GauntletError::ManifestRead`] if the file cannot be opened or
/// is not UTF-8 text. A file that looks like markup yields no entries.
pub fn read_manifest(path: &Path) -> Result<Vec<ManifestEntry>, GauntletError> {
    let content = fs::read_to_string(path).map_err(|source| GauntletError::ManifestRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_manifest(path, &content))
}

/// Parse manifest text. `source` is only used for log messages.
pub fn parse_manifest(source: &Path, content: &str) -> Vec<ManifestEntry> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    if content.lines().any(|line| line.trim_start().starts_with('<')) {
        warn!(
            path = %source.display(),
            "file looks like markup, not a plugin manifest; ignoring it"
        );
        return Vec::new();
    }

    content
        .lines()
        .enumerate()
        .filter_map(|(index, raw)| {
            let normalized = normalize_line(raw);
            if normalized.is_empty() {
                return None;
            }
            Some(ManifestEntry {
                line_number: index + 1,
                raw_text: raw.to_string(),
                normalized_text: normalized,
            })
        })
        .collect()
}

/// Strip the comment, convert separators and trim. `\#` is a literal `#`.
fn normalize_line(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'#') => {
                chars.next();
                out.push('#');
            }
            '#' => break,
            '\\' => out.push('/'),
            other => out.push(other),
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(entries: &[ManifestEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.normalized_text.as_str()).collect()
    }

    #[test]
    fn comments_and_blank_lines_are_dropped() {
        let entries = parse_manifest(
            Path::new(".addins"),
            "plugins/\n# comment\n\n   \nplugins/special.dll   # trailing\n",
        );
        assert_eq!(texts(&entries), vec!["plugins/", "plugins/special.dll"]);
        assert_eq!(entries[0].line_number, 1);
        assert_eq!(entries[1].line_number, 5);
        assert_eq!(entries[1].raw_text, "plugins/special.dll   # trailing");
    }

    #[test]
    fn backslashes_become_forward_slashes() {
        let entries = parse_manifest(Path::new("m.addins"), "addins\\writers\\*.wasm\r\n");
        assert_eq!(texts(&entries), vec!["addins/writers/*.wasm"]);
    }

    #[test]
    fn escaped_hash_is_kept() {
        let entries = parse_manifest(Path::new("m.addins"), "odd\\#name.wasm # real comment");
        assert_eq!(texts(&entries), vec!["odd#name.wasm"]);
    }

    #[test]
    fn markup_file_yields_no_entries() {
        let entries = parse_manifest(
            Path::new("legacy.addins"),
            "<Plugins>\n  <Plugin>foo.wasm</Plugin>\n</Plugins>\n",
        );
        assert!(entries.is_empty());
    }

    #[test]
    #[tracing_test::traced_test]
    fn markup_file_logs_a_warning() {
        let entries = parse_manifest(Path::new("legacy.addins"), "<Plugins/>\n");
        assert!(entries.is_empty());
        assert!(logs_contain("not a plugin manifest"));
    }

    #[test]
    fn markup_anywhere_rejects_the_whole_file() {
        let entries = parse_manifest(Path::new("mixed.addins"), "plugins/\n  <xml/>\n");
        assert!(entries.is_empty());
    }

    #[test]
    fn byte_order_mark_is_ignored() {
        let entries = parse_manifest(Path::new("bom.addins"), "\u{feff}plugins/\n");
        assert_eq!(texts(&entries), vec!["plugins/"]);
    }

    #[test]
    fn entry_classification() {
        let entries = parse_manifest(
            Path::new("m.addins"),
            "plugins/\n**/addins/\nwriters/xml.wasm\nwriters/*.wasm\nwriter?.wasm\n",
        );
        let dirs: Vec<bool> = entries.iter().map(ManifestEntry::is_directory_pattern).collect();
        let wild: Vec<bool> = entries.iter().map(ManifestEntry::has_wildcard).collect();
        assert_eq!(dirs, vec![true, true, false, false, false]);
        assert_eq!(wild, vec![false, true, false, true, true]);
    }

    #[test]
    fn read_manifest_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_manifest(&dir.path().join("missing.addins")).unwrap_err();
        assert!(matches!(err, GauntletError::ManifestRead { .. }));
    }

    #[test]
    fn read_manifest_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".addins");
        fs::write(&path, "plugins/\n# comment\nplugins/special.dll\n").unwrap();
        let entries = read_manifest(&path).unwrap();
        assert_eq!(texts(&entries), vec!["plugins/", "plugins/special.dll"]);
    }
}
