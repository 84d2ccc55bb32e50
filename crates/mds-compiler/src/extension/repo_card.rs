//! Repository cards.
//!
//! ```markdown
//! :::repo
//! owner/repo
//! :::
//! ```
//!
//! renders a linked card image for `github.com/owner/repo`. URLs are built by
//! string concatenation; nothing is fetched at compile time.

use std::fmt::Write;

use super::BlockExtension;
use crate::ast::{NodeKind, RepoRef};
use crate::error::ValidationError;
use crate::util::escape_html;

const REPO_HOST: &str = "https://github.com/";
const CARD_HOST: &str = "https://gh-card.dev/repos/";

/// Block extension for `:::repo` fences.
#[derive(Debug, Default, Clone, Copy)]
pub struct RepoCardExtension;

impl BlockExtension for RepoCardExtension {
    fn name(&self) -> &'static str {
        "repo-card"
    }

    fn open_token(&self) -> &'static str {
        ":::repo"
    }

    fn close_token(&self) -> &'static str {
        ":::"
    }

    fn parse(&self, body: &[&str]) -> NodeKind {
        let line = body
            .iter()
            .map(|line| line.trim())
            .find(|line| !line.is_empty())
            .unwrap_or_default();
        NodeKind::RepoCard(parse_repo_line(line))
    }
}

/// Parse `owner/repo`. Only the first non-empty line of a card is used.
fn parse_repo_line(line: &str) -> Result<RepoRef, ValidationError> {
    let mut parts = line.split('/');
    let (Some(owner), Some(repo), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ValidationError::RepoFormat(line.to_owned()));
    };
    let (owner, repo) = (owner.trim(), repo.trim());
    if owner.is_empty() || repo.is_empty() {
        return Err(ValidationError::RepoFormat(line.to_owned()));
    }
    for part in [owner, repo] {
        if !is_identifier(part) {
            return Err(ValidationError::RepoIdentifier(part.to_owned()));
        }
    }
    Ok(RepoRef {
        owner: owner.to_owned(),
        repo: repo.to_owned(),
    })
}

fn is_identifier(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

/// Render a card, or the inline error element for an invalid one.
pub(crate) fn render_repo_card(card: &Result<RepoRef, ValidationError>, out: &mut String) {
    match card {
        Ok(RepoRef { owner, repo }) => {
            let _ = write!(
                out,
                concat!(
                    r#"<div class="repo-card" style="margin: 20px 0; max-width: 500px;">"#,
                    r#"<a href="{repo_host}{owner}/{repo}" target="_blank" rel="noopener noreferrer" style="text-decoration: none;">"#,
                    r#"<img src="{card_host}{owner}/{repo}.svg" alt="{owner}/{repo}" style="max-width: 100%; height: auto; border-radius: 6px; box-shadow: 0 4px 6px rgba(0, 0, 0, 0.1);">"#,
                    "</a></div>\n"
                ),
                repo_host = REPO_HOST,
                card_host = CARD_HOST,
                owner = owner,
                repo = repo,
            );
        }
        Err(err) => {
            let _ = writeln!(
                out,
                r#"<div class="repo-card-error" style="margin: 20px 0; padding: 12px 16px; border: 1px solid #ff6369; border-radius: 6px; background-color: #ffebe9; color: #d1242f;">{}</div>"#,
                escape_html(&err.to_string())
            );
        }
    }
}
