//! Sitemap XML rendering.

use std::io::Cursor;

use chrono::SecondsFormat;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::index::{SiteIndex, SiteMapEntry};

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const CHANGE_FREQUENCY: &str = "weekly";
const PRIORITY: &str = "0.5";

impl SiteIndex {
    /// Render the index as a sitemaps.org `urlset`.
    ///
    /// Each `loc` is `base_url` joined to the slug with a single `/`.
    #[must_use]
    pub fn sitemap_xml(&self, base_url: &str) -> String {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        // Writing into memory cannot fail.
        let _ = write_urlset(&mut writer, self.entries(), base_url.trim_end_matches('/'));
        String::from_utf8_lossy(&writer.into_inner().into_inner()).into_owned()
    }
}

fn write_urlset(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    entries: &[SiteMapEntry],
    base_url: &str,
) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("urlset").with_attributes([("xmlns", SITEMAP_NS)]),
    ))?;

    for entry in entries {
        writer.write_event(Event::Start(BytesStart::new("url")))?;
        text_element(writer, "loc", &format!("{base_url}/{}", entry.path))?;
        if let Some(date) = entry.last_modified_date.or(entry.creation_date) {
            text_element(
                writer,
                "lastmod",
                &date.to_rfc3339_opts(SecondsFormat::Secs, true),
            )?;
        }
        text_element(writer, "changefreq", CHANGE_FREQUENCY)?;
        text_element(writer, "priority", PRIORITY)?;
        writer.write_event(Event::End(BytesEnd::new("url")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("urlset")))?;
    Ok(())
}

fn text_element(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    name: &str,
    text: &str,
) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;

    fn entry(path: &str) -> SiteMapEntry {
        SiteMapEntry {
            path: path.to_owned(),
            metadata: None,
            first_header: String::new(),
            first_paragraph: String::new(),
            last_modified_date: None,
            creation_date: None,
        }
    }

    #[test]
    fn test_sitemap_xml() {
        let mut post = entry("blog/post");
        post.creation_date = Some(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
        let mut home = entry("");
        home.last_modified_date = Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        home.creation_date = Some(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap());
        let index = SiteIndex::new(vec![home, post, entry("a&b")]);

        let xml = index.sitemap_xml("https://example.com/");
        let lines: Vec<_> = xml.lines().map(str::trim).collect();

        assert_eq!(
            lines,
            vec![
                r#"<?xml version="1.0" encoding="UTF-8"?>"#,
                r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#,
                "<url>",
                "<loc>https://example.com/</loc>",
                "<lastmod>2024-06-01T00:00:00Z</lastmod>",
                "<changefreq>weekly</changefreq>",
                "<priority>0.5</priority>",
                "</url>",
                "<url>",
                "<loc>https://example.com/blog/post</loc>",
                "<lastmod>2024-01-02T03:04:05Z</lastmod>",
                "<changefreq>weekly</changefreq>",
                "<priority>0.5</priority>",
                "</url>",
                "<url>",
                "<loc>https://example.com/a&amp;b</loc>",
                "<changefreq>weekly</changefreq>",
                "<priority>0.5</priority>",
                "</url>",
                "</urlset>",
            ]
        );
    }

    #[test]
    fn test_empty_index() {
        let xml = SiteIndex::default().sitemap_xml("https://example.com");
        assert!(xml.contains("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">"));
        assert!(xml.ends_with("</urlset>"));
        assert!(!xml.contains("<url>"));
    }
}
