//! Playable playlist URL extraction from a stream's embed page.
//!
//! The embed page format belongs to the upstream site and changes without
//! notice, so callers only see [`PlaylistExtractor::extract`].

use regex::Regex;
use scraper::{Html, Selector};

use crate::error::Result;

/// First `https://` URL ending in `.m3u8`, shortest match.
pub const DEFAULT_PLAYLIST_PATTERN: &str = r"https://.*?\.m3u8";

const URL_ATTRIBUTES: [&str; 3] = ["src", "data-src", "href"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ExtractorKind {
    /// Scan the raw page body.
    #[default]
    Pattern,
    /// Parse the page and scan URL attributes first, then the raw body.
    Html,
}

#[derive(Debug, Clone)]
pub struct PlaylistExtractor {
    kind: ExtractorKind,
    pattern: Regex,
}

impl PlaylistExtractor {
    pub fn new(kind: ExtractorKind) -> Result<Self> {
        Self::with_pattern(kind, DEFAULT_PLAYLIST_PATTERN)
    }

    pub fn with_pattern(kind: ExtractorKind, pattern: &str) -> Result<Self> {
        Ok(Self {
            kind,
            pattern: Regex::new(pattern)?,
        })
    }

    /// Find the playlist URL in `body`. `None` when nothing matches.
    pub fn extract(&self, body: &str) -> Option<String> {
        match self.kind {
            ExtractorKind::Pattern => self.find_in(body),
            ExtractorKind::Html => self
                .find_in_attributes(body)
                .or_else(|| self.find_in(body)),
        }
    }

    fn find_in(&self, text: &str) -> Option<String> {
        self.pattern.find(text).map(|m| m.as_str().to_string())
    }

    fn find_in_attributes(&self, body: &str) -> Option<String> {
        let document = Html::parse_document(body);
        let selector = Selector::parse("[src], [data-src], [href]").ok()?;

        document.select(&selector).find_map(|element| {
            URL_ATTRIBUTES
                .iter()
                .filter_map(|attr| element.value().attr(attr))
                .find_map(|value| self.find_in(value))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern() -> PlaylistExtractor {
        PlaylistExtractor::new(ExtractorKind::Pattern).unwrap()
    }

    #[test]
    fn test_extract_from_attribute_text() {
        let body = r#"<html><video src="https://cdn.example/live/stream123.m3u8"></video></html>"#;
        assert_eq!(
            pattern().extract(body).as_deref(),
            Some("https://cdn.example/live/stream123.m3u8")
        );
    }

    #[test]
    fn test_extract_is_non_greedy() {
        let body = "a https://one.example/a.m3u8 b https://two.example/b.m3u8";
        assert_eq!(
            pattern().extract(body).as_deref(),
            Some("https://one.example/a.m3u8")
        );
    }

    #[test]
    fn test_extract_does_not_cross_lines() {
        let body = "https://nowhere.example/\nindex.m3u8";
        assert_eq!(pattern().extract(body), None);
    }

    #[test]
    fn test_extract_requires_https() {
        assert_eq!(pattern().extract("src=\"http://cdn/x.m3u8\""), None);
        assert_eq!(pattern().extract(""), None);
    }

    #[test]
    fn test_html_prefers_url_attributes() {
        let body = r#"
            <script>var preroll = "https://ads.example/pre.m3u8";</script>
            <video><source data-src="https://cdn.example/live/main.m3u8"></video>
        "#;

        assert_eq!(
            pattern().extract(body).as_deref(),
            Some("https://ads.example/pre.m3u8")
        );

        let html = PlaylistExtractor::new(ExtractorKind::Html).unwrap();
        assert_eq!(
            html.extract(body).as_deref(),
            Some("https://cdn.example/live/main.m3u8")
        );
    }

    #[test]
    fn test_html_falls_back_to_body() {
        let html = PlaylistExtractor::new(ExtractorKind::Html).unwrap();
        let body = r#"<script>player.load("https://cdn.example/x/index.m3u8")</script>"#;
        assert_eq!(
            html.extract(body).as_deref(),
            Some("https://cdn.example/x/index.m3u8")
        );
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(PlaylistExtractor::with_pattern(ExtractorKind::Pattern, "(").is_err());
    }
}
