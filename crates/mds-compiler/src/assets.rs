//! Asset path rewriting.
//!
//! Raster images under an `/assets/` path are served as WebP; references in
//! `src` and `href` attributes are rewritten to match.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static ASSET_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(src|href)="([^"]*)""#).unwrap());

const ASSET_SEGMENT: &str = "/assets/";

const RASTER_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// Rewrite `.jpg`, `.jpeg`, `.png` and `.gif` asset references to `.webp`.
///
/// Only attribute values containing `/assets/` are touched. Extensions match
/// case-insensitively.
#[must_use]
pub fn rewrite_asset_paths(html: &str) -> String {
    ASSET_ATTR
        .replace_all(html, |caps: &Captures<'_>| {
            let value = &caps[2];
            match webp_path(value) {
                Some(rewritten) => format!(r#"{}="{rewritten}""#, &caps[1]),
                None => caps[0].to_owned(),
            }
        })
        .into_owned()
}

fn webp_path(value: &str) -> Option<String> {
    if !value.contains(ASSET_SEGMENT) {
        return None;
    }
    let name_start = value.rfind('/').map_or(0, |i| i + 1);
    let dot = value[name_start..].rfind('.')? + name_start;
    let extension = &value[dot + 1..];
    RASTER_EXTENSIONS
        .iter()
        .any(|ext| ext.eq_ignore_ascii_case(extension))
        .then(|| format!("{}.webp", &value[..dot]))
}
