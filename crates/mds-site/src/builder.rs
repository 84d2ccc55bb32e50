//! Parallel site index generation.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use mds_compiler::Compiler;
use rayon::prelude::*;

use crate::error::SiteError;
use crate::extract::summarize;
use crate::index::{SiteIndex, SiteMapEntry, SortDirection};
use crate::metadata::extract_metadata;
use crate::scan::{SourceFile, scan};
use crate::slug::path_to_slug;

const MIN_WORKERS: usize = 4;
const MAX_WORKERS: usize = 50;

/// Worker pool size for `documents` documents on a machine with
/// `parallelism` hardware threads.
///
/// Twice the hardware threads, clamped to `4..=50`, and never more than there
/// are documents.
#[must_use]
pub fn worker_count(parallelism: usize, documents: usize) -> usize {
    parallelism
        .saturating_mul(2)
        .clamp(MIN_WORKERS, MAX_WORKERS)
        .min(documents.max(1))
}

/// Outcome of a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    /// Sorted index.
    pub index: SiteIndex,
    /// Non-fatal diagnostics, each prefixed with the document path.
    pub warnings: Vec<String>,
}

/// Builds a [`SiteIndex`] from a directory of markdown files.
///
/// # Example
///
/// ```no_run
/// use mds_compiler::Compiler;
/// use mds_site::{SiteIndexBuilder, SortDirection};
///
/// let report = SiteIndexBuilder::new(Compiler::default(), "content")
///     .with_sort(SortDirection::Asc)
///     .build()?;
/// report.index.save("generated/sitemap.json".as_ref())?;
/// # Ok::<(), mds_site::SiteError>(())
/// ```
pub struct SiteIndexBuilder {
    compiler: Compiler,
    content_dir: PathBuf,
    sort: SortDirection,
    html_dir: Option<PathBuf>,
    workers: Option<usize>,
}

/// Per-document result collected from the workers.
struct Built {
    source: PathBuf,
    relative: PathBuf,
    entry: SiteMapEntry,
    html: String,
    warnings: Vec<String>,
}

impl SiteIndexBuilder {
    #[must_use]
    pub fn new(compiler: Compiler, content_dir: impl Into<PathBuf>) -> Self {
        Self {
            compiler,
            content_dir: content_dir.into(),
            sort: SortDirection::default(),
            html_dir: None,
            workers: None,
        }
    }

    #[must_use]
    pub fn with_sort(mut self, sort: SortDirection) -> Self {
        self.sort = sort;
        self
    }

    /// Also write each document to `<dir>/<relative path>.html`.
    #[must_use]
    pub fn with_html_output(mut self, dir: impl Into<PathBuf>) -> Self {
        self.html_dir = Some(dir.into());
        self
    }

    /// Override the computed worker count.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers.max(1));
        self
    }

    /// Compile every document and build the sorted index.
    ///
    /// Fails fast: the first compile or read error aborts the batch, and no
    /// HTML is written unless every document succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError`] on read or compile failures, duplicate slugs,
    /// HTML write failures or if the worker pool cannot be created.
    pub fn build(&self) -> Result<BuildReport, SiteError> {
        let files = scan(&self.content_dir)?;
        if files.is_empty() {
            tracing::warn!(dir = %self.content_dir.display(), "no markdown files found");
            return Ok(BuildReport {
                index: SiteIndex::default(),
                warnings: Vec::new(),
            });
        }

        let workers = self.workers.unwrap_or_else(|| {
            let parallelism = std::thread::available_parallelism().map_or(1, usize::from);
            worker_count(parallelism, files.len())
        });
        tracing::info!(documents = files.len(), workers, "building site index");

        let pool = rayon::ThreadPoolBuilder::new().num_threads(workers).build()?;

        let built: Vec<Built> = pool.install(|| {
            files
                .par_iter()
                .map(|file| self.build_entry(file))
                .collect::<Result<_, _>>()
        })?;

        check_unique_slugs(&built)?;

        if let Some(html_dir) = &self.html_dir {
            pool.install(|| {
                built
                    .par_iter()
                    .try_for_each(|doc| write_html(html_dir, &doc.relative, &doc.html))
            })?;
        }

        let mut warnings = Vec::new();
        let mut entries = Vec::with_capacity(built.len());
        for doc in built {
            warnings.extend(doc.warnings);
            entries.push(doc.entry);
        }

        let mut index = SiteIndex::new(entries);
        index.sort(self.sort);
        tracing::info!(entries = index.len(), warnings = warnings.len(), "site index built");

        Ok(BuildReport { index, warnings })
    }

    fn build_entry(&self, file: &SourceFile) -> Result<Built, SiteError> {
        let bytes = fs::read(&file.path).map_err(|e| SiteError::io(&file.path, e))?;
        let compiled = self
            .compiler
            .compile(&bytes)
            .map_err(|source| SiteError::Compile {
                path: file.path.clone(),
                source,
            })?;

        let label = file.relative.display().to_string();
        let mut warnings: Vec<String> = compiled
            .warnings
            .iter()
            .map(|w| format!("{label}: {w}"))
            .collect();

        let metadata = match extract_metadata(&bytes) {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!(path = %label, error = %e, "ignoring document metadata");
                warnings.push(format!("{label}: {e}"));
                None
            }
        };

        let mtime = match modified_time(&file.path) {
            Ok(mtime) => Some(mtime),
            Err(e) => {
                tracing::warn!(path = %label, error = %e, "file modification time unavailable");
                warnings.push(format!("{label}: modification time unavailable: {e}"));
                None
            }
        };

        let summary = summarize(&compiled.html);
        let meta = metadata.as_ref();
        let entry = SiteMapEntry {
            path: path_to_slug(&file.relative),
            first_header: summary.first_header,
            first_paragraph: summary.first_paragraph,
            last_modified_date: meta.and_then(|m| m.last_modification_date).or(mtime),
            creation_date: meta.and_then(|m| m.creation_date).or(mtime),
            metadata,
        };
        tracing::debug!(path = %label, slug = %entry.path, "compiled document");

        Ok(Built {
            source: file.path.clone(),
            relative: file.relative.clone(),
            entry,
            html: compiled.html,
            warnings,
        })
    }
}

fn modified_time(path: &Path) -> std::io::Result<DateTime<Utc>> {
    Ok(fs::metadata(path)?.modified()?.into())
}

fn check_unique_slugs(built: &[Built]) -> Result<(), SiteError> {
    let mut seen: HashMap<&str, &Path> = HashMap::with_capacity(built.len());
    for doc in built {
        if let Some(first) = seen.insert(&doc.entry.path, &doc.source) {
            return Err(SiteError::DuplicateSlug {
                slug: doc.entry.path.clone(),
                first: first.to_path_buf(),
                second: doc.source.clone(),
            });
        }
    }
    Ok(())
}

fn write_html(html_dir: &Path, relative: &Path, html: &str) -> Result<(), SiteError> {
    let target = html_dir.join(relative.with_extension("html"));
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| SiteError::io(parent, e))?;
    }
    fs::write(&target, html).map_err(|e| SiteError::io(&target, e))
}
