//! Document path to slug conversion.

use std::path::{Component, Path};

/// Slug of a document path relative to the content root.
///
/// Strips `.md`, replaces spaces with `_`, drops a final `index` segment and
/// joins components with `/` on every platform.
///
/// ```
/// use std::path::Path;
/// use mds_site::path_to_slug;
///
/// assert_eq!(path_to_slug(Path::new("blog/post.md")), "blog/post");
/// assert_eq!(path_to_slug(Path::new("blog/index.md")), "blog");
/// assert_eq!(path_to_slug(Path::new("index.md")), "");
/// ```
#[must_use]
pub fn path_to_slug(relative: &Path) -> String {
    let without_ext = match relative.extension() {
        Some(ext) if ext == "md" => relative.with_extension(""),
        _ => relative.to_path_buf(),
    };

    let mut segments: Vec<String> = without_ext
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().replace(' ', "_")),
            _ => None,
        })
        .collect();

    if segments.last().is_some_and(|s| s == "index") {
        segments.pop();
    }
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_nested_path() {
        assert_eq!(path_to_slug(Path::new("blog/post.md")), "blog/post");
    }

    #[test]
    fn test_index_is_dropped() {
        assert_eq!(path_to_slug(Path::new("index.md")), "");
        assert_eq!(path_to_slug(Path::new("blog/index.md")), "blog");
        assert_eq!(path_to_slug(Path::new("a/b/index.md")), "a/b");
    }

    #[test]
    fn test_index_only_dropped_as_last_segment() {
        assert_eq!(path_to_slug(Path::new("index/post.md")), "index/post");
        assert_eq!(path_to_slug(Path::new("reindex.md")), "reindex");
    }

    #[test]
    fn test_spaces_become_underscores() {
        assert_eq!(path_to_slug(Path::new("my page.md")), "my_page");
        assert_eq!(path_to_slug(Path::new("my dir/a b.md")), "my_dir/a_b");
    }

    #[test]
    fn test_dots_in_name_are_kept() {
        assert_eq!(path_to_slug(Path::new("release-1.2.md")), "release-1.2");
    }
}
