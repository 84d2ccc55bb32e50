//! Site index: entries, sorting, persistence and queries.

use std::cmp::Ordering;
use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use mds_compiler::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{QueryError, SiteError};
use crate::metadata::Metadata;

/// One document in the site index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteMapEntry {
    /// Slug, unique within one index.
    pub path: String,
    pub metadata: Option<Metadata>,
    /// Text of the first `h1`, or empty.
    pub first_header: String,
    /// Text of the first non-empty paragraph, or empty.
    pub first_paragraph: String,
    /// Metadata modification date, else file mtime.
    pub last_modified_date: Option<DateTime<Utc>>,
    /// Metadata creation date, else file mtime.
    pub creation_date: Option<DateTime<Utc>>,
}

/// Order of entries by creation date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    /// Newest first.
    #[default]
    Desc,
}

impl SortDirection {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(ValidationError::SortDirection(other.to_owned())),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered collection of [`SiteMapEntry`] values.
///
/// Serialized as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteIndex {
    entries: Vec<SiteMapEntry>,
}

impl SiteIndex {
    #[must_use]
    pub fn new(entries: Vec<SiteMapEntry>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[SiteMapEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stable sort by creation date. Undated entries go last in either
    /// direction.
    pub fn sort(&mut self, direction: SortDirection) {
        self.entries
            .sort_by(|a, b| compare_dates(a.creation_date, b.creation_date, direction));
    }

    /// Look up an entry by slug.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::NotFound`] if no entry has that slug.
    pub fn lookup(&self, slug: &str) -> Result<&SiteMapEntry, QueryError> {
        self.entries
            .iter()
            .find(|entry| entry.path == slug)
            .ok_or_else(|| QueryError::NotFound(slug.to_owned()))
    }

    /// Entries whose slug matches `pattern`, in index order.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::FilterPattern`] if `pattern` is not a valid
    /// regular expression.
    pub fn filter(&self, pattern: &str) -> Result<Vec<&SiteMapEntry>, ValidationError> {
        let regex = Regex::new(pattern).map_err(|e| ValidationError::FilterPattern {
            pattern: pattern.to_owned(),
            message: e.to_string(),
        })?;
        Ok(self
            .entries
            .iter()
            .filter(|entry| regex.is_match(&entry.path))
            .collect())
    }

    /// Write the index as pretty-printed JSON.
    ///
    /// The JSON goes to a temporary file in the destination directory which
    /// is then renamed over `path`, so readers see the old or the new index,
    /// never a partial one.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Io`] or [`SiteError::Json`] on failure; `path` is
    /// left untouched.
    pub fn save(&self, path: &Path) -> Result<(), SiteError> {
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(|e| SiteError::io(dir, e))?;

        let json = serde_json::to_vec_pretty(self)?;
        let mut file = tempfile::NamedTempFile::new_in(dir).map_err(|e| SiteError::io(dir, e))?;
        file.write_all(&json)
            .and_then(|()| file.as_file().sync_all())
            .map_err(|e| SiteError::io(file.path(), e))?;
        file.persist(path).map_err(|e| SiteError::io(path, e.error))?;

        tracing::info!(path = %path.display(), entries = self.len(), "saved site index");
        Ok(())
    }

    /// Read an index written by [`save`](Self::save).
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Io`] if the file cannot be read and
    /// [`SiteError::Json`] if it is not a valid index.
    pub fn load(path: &Path) -> Result<Self, SiteError> {
        let bytes = std::fs::read(path).map_err(|e| SiteError::io(path, e))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn compare_dates(
    a: Option<DateTime<Utc>>,
    b: Option<DateTime<Utc>>,
    direction: SortDirection,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match direction {
            SortDirection::Asc => a.cmp(&b),
            SortDirection::Desc => b.cmp(&a),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    fn entry(path: &str, day: Option<u32>) -> SiteMapEntry {
        let date = day.map(|d| Utc.with_ymd_and_hms(2024, 1, d, 12, 0, 0).unwrap());
        SiteMapEntry {
            path: path.to_owned(),
            metadata: None,
            first_header: String::new(),
            first_paragraph: String::new(),
            last_modified_date: date,
            creation_date: date,
        }
    }

    fn paths(index: &SiteIndex) -> Vec<&str> {
        index.entries().iter().map(|e| e.path.as_str()).collect()
    }

    fn sample() -> SiteIndex {
        SiteIndex::new(vec![
            entry("", Some(5)),
            entry("blog/first", Some(1)),
            entry("blog/second", Some(9)),
            entry("about", None),
            entry("blog/third", Some(3)),
        ])
    }

    #[test]
    fn test_sort_desc() {
        let mut index = sample();
        index.sort(SortDirection::Desc);
        assert_eq!(
            paths(&index),
            vec!["blog/second", "", "blog/third", "blog/first", "about"]
        );
    }

    #[test]
    fn test_sort_asc_keeps_undated_last() {
        let mut index = sample();
        index.sort(SortDirection::Asc);
        assert_eq!(
            paths(&index),
            vec!["blog/first", "blog/third", "", "blog/second", "about"]
        );
    }

    #[test]
    fn test_sort_asc_reversed_equals_desc() {
        let dated: Vec<_> = sample()
            .entries()
            .iter()
            .filter(|e| e.creation_date.is_some())
            .cloned()
            .collect();

        let mut asc = SiteIndex::new(dated.clone());
        asc.sort(SortDirection::Asc);
        let mut reversed = asc.entries().to_vec();
        reversed.reverse();

        let mut desc = SiteIndex::new(dated);
        desc.sort(SortDirection::Desc);

        assert_eq!(reversed, desc.entries());
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let mut index = SiteIndex::new(vec![
            entry("a", Some(2)),
            entry("b", Some(2)),
            entry("x", None),
            entry("c", Some(2)),
            entry("y", None),
        ]);
        index.sort(SortDirection::Desc);
        assert_eq!(paths(&index), vec!["a", "b", "c", "x", "y"]);
    }

    #[test]
    fn test_sort_direction_from_str() {
        assert_eq!("asc".parse::<SortDirection>().unwrap(), SortDirection::Asc);
        assert_eq!("desc".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert_eq!(
            "DESC".parse::<SortDirection>().unwrap_err(),
            ValidationError::SortDirection("DESC".to_owned())
        );
        assert_eq!(SortDirection::Asc.to_string(), "asc");
    }

    #[test]
    fn test_lookup() {
        let index = sample();
        assert_eq!(index.lookup("blog/third").unwrap().path, "blog/third");
        assert_eq!(index.lookup("").unwrap().creation_date, entry("", Some(5)).creation_date);
        assert_eq!(
            index.lookup("missing").unwrap_err(),
            QueryError::NotFound("missing".to_owned())
        );
    }

    #[test]
    fn test_filter() {
        let index = sample();
        let matched: Vec<_> = index
            .filter("^blog/")
            .unwrap()
            .into_iter()
            .map(|e| e.path.as_str())
            .collect();
        assert_eq!(matched, vec!["blog/first", "blog/second", "blog/third"]);
        assert!(index.filter("^nothing$").unwrap().is_empty());
    }

    #[test]
    fn test_filter_rejects_invalid_pattern() {
        let err = sample().filter("blog/(").unwrap_err();
        assert!(matches!(
            err,
            ValidationError::FilterPattern { ref pattern, .. } if pattern == "blog/("
        ));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("out").join("sitemap.json");
        let index = sample();

        index.save(&path).unwrap();
        let loaded = SiteIndex::load(&path).unwrap();

        assert_eq!(loaded, index);
        let leftovers: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("sitemap.json")]);
    }

    #[test]
    fn test_saved_json_shape() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("sitemap.json");
        SiteIndex::new(vec![entry("about", None)]).save(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{
                "path": "about",
                "metadata": null,
                "first_header": "",
                "first_paragraph": "",
                "last_modified_date": null,
                "creation_date": null,
            }])
        );
    }

    #[test]
    fn test_save_replaces_existing_index() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("sitemap.json");
        sample().save(&path).unwrap();

        let smaller = SiteIndex::new(vec![entry("only", Some(1))]);
        smaller.save(&path).unwrap();

        assert_eq!(SiteIndex::load(&path).unwrap(), smaller);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = SiteIndex::load(&temp_dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, SiteError::Io { .. }));
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("sitemap.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(SiteIndex::load(&path).unwrap_err(), SiteError::Json(_)));
    }
}
