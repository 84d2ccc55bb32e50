//! Summary text pulled from compiled HTML.

/// First `h1` text and first non-empty `p` text of a compiled document.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Summary {
    pub first_header: String,
    pub first_paragraph: String,
}

/// Extract the summary with an HTML parser. Missing elements read as empty.
pub(crate) fn summarize(html: &str) -> Summary {
    let dom = match tl::parse(html, tl::ParserOptions::default()) {
        Ok(dom) => dom,
        Err(e) => {
            tracing::debug!(error = %e, "compiled HTML did not parse");
            return Summary::default();
        }
    };
    let parser = dom.parser();

    let text_of = |selector: &str| -> Vec<String> {
        dom.query_selector(selector)
            .into_iter()
            .flatten()
            .filter_map(|handle| handle.get(parser))
            .map(|node| {
                html_escape::decode_html_entities(node.inner_text(parser).trim()).into_owned()
            })
            .collect()
    };

    Summary {
        first_header: text_of("h1").into_iter().next().unwrap_or_default(),
        first_paragraph: text_of("p")
            .into_iter()
            .find(|text| !text.is_empty())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_first_header_and_paragraph() {
        let html = concat!(
            "<h2 id=\"pre\">Preface</h2>\n",
            "<h1 id=\"t\">Main <code>title</code></h1>\n",
            "<p>  </p>\n",
            "<p>First <em>real</em> paragraph</p>\n",
            "<h1>Second</h1><p>Later</p>\n",
        );
        let summary = summarize(html);
        assert_eq!(summary.first_header, "Main title");
        assert_eq!(summary.first_paragraph, "First real paragraph");
    }

    #[test]
    fn test_missing_elements_are_empty() {
        let summary = summarize("<div>nothing here</div>");
        assert_eq!(summary, Summary::default());
    }

    #[test]
    fn test_entities_are_decoded() {
        let summary = summarize("<h1>Fish &amp; Chips</h1><p>a &lt; b</p>");
        assert_eq!(summary.first_header, "Fish & Chips");
        assert_eq!(summary.first_paragraph, "a < b");
    }

    #[test]
    fn test_alert_paragraph_counts() {
        let html = concat!(
            r#"<div class="github-alert"><div>Note</div>"#,
            r#"<div class="github-alert-content"><p style="margin-bottom: 8px;">Inside</p></div></div>"#,
        );
        assert_eq!(summarize(html).first_paragraph, "Inside");
    }
}
