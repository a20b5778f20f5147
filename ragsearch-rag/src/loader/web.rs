use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use scraper::{ElementRef, Html, Selector};
use tokio::sync::OnceCell;
use tracing::debug;

use super::{DocumentLoader, Source};
use crate::document::Document;
use crate::error::{RagError, Result};

const USER_AGENT: &str = concat!("ragsearch/", env!("CARGO_PKG_VERSION"));

/// Elements whose text is never part of the visible page.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Elements that start a new line; everything else flows inline.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav",
    "ol", "p", "pre", "section", "table", "tr", "ul",
];

/// Fetches a URL over HTTP(S). HTML pages are reduced to their visible
/// text; any other content type is taken as-is.
///
/// The HTTP client is built on first use, so a client that cannot be
/// constructed surfaces as a [`RagError::Load`] for the source being fetched.
#[derive(Debug, Clone)]
pub struct WebLoader {
    timeout: Duration,
    client: OnceCell<reqwest::Client>,
}

impl Default for WebLoader {
    fn default() -> Self {
        Self::with_timeout(Duration::from_secs(30))
    }
}

impl WebLoader {
    /// Create a loader whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout, client: OnceCell::new() }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn client(&self, url: &str) -> Result<&reqwest::Client> {
        self.client
            .get_or_try_init(|| async {
                reqwest::Client::builder().user_agent(USER_AGENT).timeout(self.timeout).build()
            })
            .await
            .map_err(|e| RagError::load(url, format!("cannot build HTTP client: {e}")))
    }

    pub(crate) async fn load_url(&self, url: &str) -> Result<Vec<Document>> {
        debug!(url, "fetching url");

        let response = self
            .client(url)
            .await?
            .get(url)
            .send()
            .await
            .map_err(|e| RagError::load(url, format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RagError::load(url, format!("server returned {status}")));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_ascii_lowercase())
            .unwrap_or_else(|| "text/plain".to_string());

        let body = response
            .text()
            .await
            .map_err(|e| RagError::load(url, format!("cannot read body: {e}")))?;

        let text = if content_type == "text/html" || content_type == "application/xhtml+xml" {
            html_to_text(&body)
        } else {
            body
        };

        Ok(vec![Document::from_source(url, text, url, &content_type)])
    }
}

/// Collect the visible text of an HTML document.
///
/// Inline markup is joined without separators; block elements start a new
/// line. Whitespace runs collapse to one space and blank lines are dropped.
pub(crate) fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let root = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next())
        .unwrap_or_else(|| document.root_element());

    let mut raw = String::new();
    collect_text(root, &mut raw);

    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            // Source line breaks inside text are layout, not content.
            out.extend(text.chars().map(|c| if c.is_whitespace() { ' ' } else { c }));
        } else if let Some(child) = ElementRef::wrap(child) {
            let name = child.value().name();
            if HIDDEN_ELEMENTS.contains(&name) {
                continue;
            }
            let block = BLOCK_ELEMENTS.contains(&name);
            if block {
                out.push('\n');
            }
            collect_text(child, out);
            if block {
                out.push('\n');
            }
        }
    }
}

#[async_trait]
impl DocumentLoader for WebLoader {
    async fn load(&self, source: &Source) -> Result<Vec<Document>> {
        match source {
            Source::Url(url) => self.load_url(url).await,
            Source::Path(_) => Err(RagError::load(source.to_string(), "web loader expects a URL")),
        }
    }
}
