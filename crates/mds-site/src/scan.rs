//! Markdown source discovery by filesystem walking.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SiteError;

/// A markdown file found under the content root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SourceFile {
    /// Full path, for reading.
    pub path: PathBuf,
    /// Path relative to the content root, for slugs and HTML output.
    pub relative: PathBuf,
}

/// Collect every `.md` file under `root`, sorted by relative path.
///
/// Hidden files and directories (leading `.`) are skipped.
pub(crate) fn scan(root: &Path) -> Result<Vec<SourceFile>, SiteError> {
    let mut files = Vec::new();
    scan_directory(root, Path::new(""), &mut files)?;
    files.sort_by(|a, b| a.relative.cmp(&b.relative));
    Ok(files)
}

fn scan_directory(dir: &Path, prefix: &Path, files: &mut Vec<SourceFile>) -> Result<(), SiteError> {
    let entries = fs::read_dir(dir).map_err(|e| SiteError::io(dir, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| SiteError::io(dir, e))?;
        let name = entry.file_name();
        if name.to_string_lossy().starts_with('.') {
            continue;
        }

        let path = entry.path();
        let relative = prefix.join(&name);
        let is_dir = entry
            .file_type()
            .map_err(|e| SiteError::io(&path, e))?
            .is_dir();

        if is_dir {
            scan_directory(&path, &relative, files)?;
        } else if path.extension().is_some_and(|e| e == "md") {
            files.push(SourceFile { path, relative });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn relative_paths(files: &[SourceFile]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.relative.to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_scan_nested_sorted() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("blog/2024")).unwrap();
        fs::write(root.join("index.md"), "# Home").unwrap();
        fs::write(root.join("blog/post.md"), "# Post").unwrap();
        fs::write(root.join("blog/2024/new.md"), "# New").unwrap();
        fs::write(root.join("about.md"), "# About").unwrap();

        let files = scan(root).unwrap();

        assert_eq!(
            relative_paths(&files),
            vec!["about.md", "blog/2024/new.md", "blog/post.md", "index.md"]
        );
        assert_eq!(files[0].path, root.join("about.md"));
    }

    #[test]
    fn test_scan_skips_hidden_and_other_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join(".drafts")).unwrap();
        fs::write(root.join(".drafts/secret.md"), "x").unwrap();
        fs::write(root.join(".hidden.md"), "x").unwrap();
        fs::write(root.join("notes.txt"), "x").unwrap();
        fs::write(root.join("page.md"), "x").unwrap();

        let files = scan(root).unwrap();

        assert_eq!(relative_paths(&files), vec!["page.md"]);
    }

    #[test]
    fn test_scan_empty_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(scan(temp_dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_scan_missing_dir_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("nope");
        let err = scan(&missing).unwrap_err();
        assert!(matches!(err, SiteError::Io { path, .. } if path == missing));
    }
}
