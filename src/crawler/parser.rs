//! HTML document model backed by `scraper`
//!
//! This module turns a fetched HTML body into a queryable [`Document`]:
//! - Page title (from the `<title>` tag)
//! - CSS selector queries, document-wide or scoped to an element
//! - Rendered inner text with script and style content excluded
//! - Attribute reads

use crate::crawler::session::{Document, DocumentError};
use scraper::{ElementRef, Html, Selector};

/// Elements whose text never renders
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Elements rendered on their own line
const BLOCK_ELEMENTS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "br",
    "dd",
    "div",
    "dl",
    "dt",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "td",
    "th",
    "tr",
    "ul",
];

/// A parsed HTML page
#[derive(Debug)]
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    /// Parses an HTML body into a document
    ///
    /// # Example
    ///
    /// ```
    /// use sumi_sweep::crawler::{Document, HtmlDocument};
    ///
    /// let doc = HtmlDocument::parse("<html><head><title>Test</title></head><body></body></html>");
    /// assert_eq!(doc.title().unwrap(), "Test");
    /// ```
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }
}

fn compile(selector: &str) -> Result<Selector, DocumentError> {
    Selector::parse(selector).map_err(|e| DocumentError::Selector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}

impl Document for HtmlDocument {
    type Element<'a> = ElementRef<'a>;

    fn title(&self) -> Result<String, DocumentError> {
        let selector = compile("title")?;

        Ok(self
            .html
            .select(&selector)
            .next()
            .map(|element| collapse_whitespace(&element.text().collect::<String>()))
            .unwrap_or_default())
    }

    fn query_selector(&self, selector: &str) -> Result<Option<ElementRef<'_>>, DocumentError> {
        let selector = compile(selector)?;
        Ok(self.html.select(&selector).next())
    }

    fn query_all(&self, selector: &str) -> Result<Vec<ElementRef<'_>>, DocumentError> {
        let selector = compile(selector)?;
        Ok(self.html.select(&selector).collect())
    }

    fn query_all_within<'a>(
        &'a self,
        scope: &ElementRef<'a>,
        selector: &str,
    ) -> Result<Vec<ElementRef<'a>>, DocumentError> {
        let selector = compile(selector)?;
        Ok(scope.select(&selector).collect())
    }

    fn inner_text(&self, element: &ElementRef<'_>) -> Result<String, DocumentError> {
        let mut raw = String::new();
        collect_text(*element, &mut raw);
        Ok(collapse_lines(&raw))
    }

    fn attribute(
        &self,
        element: &ElementRef<'_>,
        name: &str,
    ) -> Result<Option<String>, DocumentError> {
        Ok(element.value().attr(name).map(str::to_string))
    }
}

/// Appends the visible text below `element`, breaking lines around blocks
///
/// Whitespace inside text nodes, newlines included, renders as a space. Only
/// block boundaries start a new line.
fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.extend(text.chars().map(|c| if c.is_whitespace() { ' ' } else { c }));
            continue;
        }

        let Some(child) = ElementRef::wrap(child) else {
            continue;
        };

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

/// Collapses whitespace within each line and drops blank lines
fn collapse_lines(raw: &str) -> String {
    raw.lines()
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
