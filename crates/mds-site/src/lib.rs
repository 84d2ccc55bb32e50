//! Site index generation and queries.
//!
//! [`SiteIndexBuilder`] walks a content directory, compiles every markdown
//! file in parallel with [`mds_compiler::Compiler`] and produces a sorted
//! [`SiteIndex`]: one [`SiteMapEntry`] per document with its slug, metadata,
//! summary text and resolved dates. The index persists as a JSON array and
//! can be queried by slug or regex, or rendered as sitemap XML.

mod builder;
mod error;
mod extract;
mod index;
mod metadata;
mod scan;
mod sitemap;
mod slug;

pub use builder::{BuildReport, SiteIndexBuilder, worker_count};
pub use error::{MetadataError, QueryError, SiteError};
pub use index::{SiteIndex, SiteMapEntry, SortDirection};
pub use metadata::{Metadata, extract_metadata};
pub use slug::path_to_slug;
