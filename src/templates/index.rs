//! Template index
//!
//! Enumerates every template file under the corpus root once, at startup.
//! The result is an immutable value shared by all request handlers.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::error::TemplateError;
use super::TEMPLATE_SUFFIX;

/// Number of names per row in the listing output
const NAMES_PER_ROW: usize = 5;

/// A single template file known to the index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEntry {
    /// Lowercase file name with the suffix stripped
    pub name: String,
    /// Location of the file on disk
    pub path: PathBuf,
}

impl TemplateEntry {
    /// Build an entry from a path, returning `None` if the file name
    /// does not carry the template suffix
    pub fn from_path(path: PathBuf) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?.to_lowercase();
        let name = file_name.strip_suffix(TEMPLATE_SUFFIX)?.to_string();
        Some(Self { name, path })
    }
}

/// Immutable collection of template locations
#[derive(Debug, Clone)]
pub struct TemplateIndex {
    root: PathBuf,
    entries: Vec<TemplateEntry>,
}

impl TemplateIndex {
    /// Scan `root` recursively for template files.
    ///
    /// Entries are ordered by path, so when two subdirectories hold a
    /// template with the same name the lexicographically first path wins.
    pub fn build(root: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let root = root.as_ref().to_path_buf();

        let metadata = std::fs::metadata(&root).map_err(|source| TemplateError::Index {
            root: root.clone(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(TemplateError::Index {
                root,
                source: io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
            });
        }

        let mut paths = Vec::new();
        for entry in WalkDir::new(&root).follow_links(false).sort_by_file_name() {
            let entry = entry.map_err(|e| TemplateError::Index {
                root: root.clone(),
                source: e.into(),
            })?;
            if entry.path().is_file() {
                paths.push(entry.into_path());
            }
        }

        Ok(Self::from_paths(root, paths))
    }

    /// Build an index from already known paths. Paths without the
    /// template suffix are ignored.
    pub fn from_paths(root: impl Into<PathBuf>, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut entries: Vec<TemplateEntry> =
            paths.into_iter().filter_map(TemplateEntry::from_path).collect();
        entries.sort_by(|a, b| a.path.cmp(&b.path));

        Self {
            root: root.into(),
            entries,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entries(&self) -> &[TemplateEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names that appear more than once, with every path that carries them
    pub fn duplicates(&self) -> Vec<(String, Vec<PathBuf>)> {
        let mut by_name: BTreeMap<&str, Vec<PathBuf>> = BTreeMap::new();
        for entry in &self.entries {
            by_name
                .entry(entry.name.as_str())
                .or_default()
                .push(entry.path.clone());
        }

        by_name
            .into_iter()
            .filter(|(_, paths)| paths.len() > 1)
            .map(|(name, paths)| (name.to_string(), paths))
            .collect()
    }

    /// All template names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.iter().map(|e| e.name.clone()).collect();
        names.sort();
        names
    }

    /// Listing text served by `/api/list`
    pub fn list_names(&self) -> String {
        format_listing(&self.names())
    }
}

/// Format names as rows of five, comma separated. Rows are joined with
/// `",\n"` so every row but the last ends with a comma.
pub fn format_listing(names: &[String]) -> String {
    names
        .chunks(NAMES_PER_ROW)
        .map(|row| row.join(","))
        .collect::<Vec<_>>()
        .join(",\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, relative: &str, content: &str) -> PathBuf {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_build_scans_recursively() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Python.gitignore", "*.pyc\n");
        write(dir.path(), "Global/Vim.gitignore", "*.swp\n");
        write(dir.path(), "community/deep/nested/Zig.gitignore", "zig-cache/\n");
        write(dir.path(), "README.md", "not a template");

        let index = TemplateIndex::build(dir.path()).unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index.names(), vec!["python", "vim", "zig"]);
        assert_eq!(index.root(), dir.path());
    }

    #[test]
    fn test_build_missing_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        let err = TemplateIndex::build(&missing).unwrap_err();
        assert!(matches!(err, TemplateError::Index { ref root, .. } if *root == missing));
    }

    #[test]
    fn test_build_file_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(dir.path(), "Python.gitignore", "*.pyc\n");

        let err = TemplateIndex::build(&file).unwrap_err();
        assert!(matches!(err, TemplateError::Index { .. }));
    }

    #[test]
    fn test_empty_root_yields_empty_listing() {
        let dir = tempfile::tempdir().unwrap();
        let index = TemplateIndex::build(dir.path()).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.list_names(), "");
    }

    #[test]
    fn test_entry_name_is_lowercase_without_suffix() {
        let entry = TemplateEntry::from_path(PathBuf::from("/corpus/VisualStudio.gitignore")).unwrap();
        assert_eq!(entry.name, "visualstudio");
        assert!(TemplateEntry::from_path(PathBuf::from("/corpus/notes.txt")).is_none());
    }

    #[test]
    fn test_listing_rows_of_five() {
        let names: Vec<String> = ["a", "b", "c", "d", "e", "f", "g"]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(format_listing(&names), "a,b,c,d,e,\nf,g");
    }

    #[test]
    fn test_listing_exact_row_has_no_trailing_comma() {
        let names: Vec<String> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(format_listing(&names), "a,b,c,d,e");
    }

    #[test]
    fn test_listing_is_sorted_and_idempotent() {
        let index = TemplateIndex::from_paths(
            "/corpus",
            vec![
                PathBuf::from("/corpus/Zig.gitignore"),
                PathBuf::from("/corpus/ada.gitignore"),
                PathBuf::from("/corpus/lang/Go.gitignore"),
                PathBuf::from("/corpus/lang/c.gitignore"),
            ],
        );
        let first = index.list_names();
        assert_eq!(first, "ada,c,go,zig");
        assert_eq!(first, index.list_names());
    }

    #[test]
    fn test_suffix_match_ignores_case() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Foo.GITIGNORE", "foo/\n");
        write(dir.path(), "Bar.GitIgnore", "bar/\n");
        write(dir.path(), "Baz.gitignore.bak", "baz/\n");

        let index = TemplateIndex::build(dir.path()).unwrap();
        assert_eq!(index.names(), vec!["bar", "foo"]);
        assert!(index.find("FOO").is_ok());
    }

    #[test]
    fn test_duplicates_are_reported() {
        let index = TemplateIndex::from_paths(
            "/corpus",
            vec![
                PathBuf::from("/corpus/Python.gitignore"),
                PathBuf::from("/corpus/community/python.gitignore"),
                PathBuf::from("/corpus/Lua.gitignore"),
            ],
        );
        let duplicates = index.duplicates();
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].0, "python");
        assert_eq!(duplicates[0].1.len(), 2);
        // Listing keeps every file, duplicates included
        assert_eq!(index.names(), vec!["lua", "python", "python"]);
    }
}
