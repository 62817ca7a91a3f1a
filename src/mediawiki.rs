//! MediaWiki API shapes for de.wiktionary.org.
//!
//! Fetching is left to the caller; this module only builds request URLs and
//! decodes the `prefixsearch` and `parse` responses into plain values.

use indexmap::IndexMap;
use serde::Deserialize;
use unicode_normalization::UnicodeNormalization;
use url::Url;

use crate::error::Result;

pub const API_ENDPOINT: &str = "https://de.wiktionary.org/w/api.php";
pub const FLEXION_PREFIX: &str = "Flexion:";

/// Section of an entry page holding the German-language entry.
pub const DEFAULT_SECTION: u32 = 1;

const SEARCH_LIMIT: &str = "6";

/// Prefix search for pages starting with `word`.
pub fn search_url(word: &str) -> Result<Url> {
    Ok(Url::parse_with_params(
        API_ENDPOINT,
        &[
            ("action", "query"),
            ("format", "json"),
            ("generator", "prefixsearch"),
            ("gpslimit", SEARCH_LIMIT),
            ("gpssearch", word),
        ],
    )?)
}

/// Rendered HTML of one section of a page.
pub fn parse_url(page_id: &str, section: u32) -> Result<Url> {
    let section = section.to_string();
    Ok(Url::parse_with_params(
        API_ENDPOINT,
        &[
            ("action", "parse"),
            ("pageid", page_id),
            ("section", section.as_str()),
            ("format", "json"),
        ],
    )?)
}

// ─────────────────────────────────────────────────────────────────────────────
// Search
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PageRef {
    pub pageid: u64,
    pub title: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    query: Option<SearchQuery>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    pages: IndexMap<String, PageRef>,
}

impl SearchResponse {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Candidate pages; empty when the search found nothing.
    pub fn pages(self) -> Vec<PageRef> {
        self.query
            .map(|q| q.pages.into_values().collect())
            .unwrap_or_default()
    }
}

/// Title of the conjugation companion page for a headword.
pub fn flexion_title(word: &str) -> String {
    format!("{}{}", FLEXION_PREFIX, word)
}

pub fn is_flexion_title(title: &str) -> bool {
    title.trim().starts_with(FLEXION_PREFIX)
}

/// Titles compare equal after trimming and NFC normalization.
pub fn normalize_title(title: &str) -> String {
    title.trim().nfc().collect()
}

/// The search candidate whose title is exactly `Flexion:<word>`.
pub fn find_flexion_page<'a>(word: &str, pages: &'a [PageRef]) -> Option<&'a PageRef> {
    let wanted = normalize_title(&flexion_title(word));
    pages.iter().find(|page| normalize_title(&page.title) == wanted)
}

// ─────────────────────────────────────────────────────────────────────────────
// Parse
// ─────────────────────────────────────────────────────────────────────────────

/// Rendered page content as handed to the extractors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContent {
    pub title: String,
    pub page_id: String,
    pub html: String,
}

#[derive(Debug, Deserialize)]
pub struct ParseResponse {
    #[serde(default)]
    parse: Option<ParsedPage>,
}

#[derive(Debug, Deserialize)]
struct ParsedPage {
    #[serde(default)]
    title: String,
    #[serde(default)]
    pageid: Option<u64>,
    #[serde(default)]
    text: Option<ParsedText>,
}

/// `formatversion=1` wraps the HTML as `{"*": ...}`, version 2 inlines it.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ParsedText {
    Wrapped {
        #[serde(rename = "*")]
        html: String,
    },
    Plain(String),
}

impl ParsedText {
    fn into_html(self) -> String {
        match self {
            ParsedText::Wrapped { html } | ParsedText::Plain(html) => html,
        }
    }
}

impl ParseResponse {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Page content; an empty page under `requested_id` when the API
    /// returned no `parse` object (missing page, error response).
    pub fn into_page(self, requested_id: &str) -> PageContent {
        match self.parse {
            Some(parsed) => PageContent {
                title: parsed.title,
                page_id: parsed
                    .pageid
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| requested_id.to_string()),
                html: parsed.text.map(ParsedText::into_html).unwrap_or_default(),
            },
            None => PageContent {
                page_id: requested_id.to_string(),
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_url_encodes_word() {
        let url = search_url("Flexion:Bär").unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("generator".into(), "prefixsearch".into())));
        assert!(pairs.contains(&("gpslimit".into(), "6".into())));
        assert!(pairs.contains(&("gpssearch".into(), "Flexion:Bär".into())));
        assert!(url.as_str().starts_with(API_ENDPOINT));
        assert!(!url.as_str().contains('ä'));
    }

    #[test]
    fn parse_url_carries_page_and_section() {
        let url = parse_url("12345", DEFAULT_SECTION).unwrap();
        assert_eq!(
            url.as_str(),
            "https://de.wiktionary.org/w/api.php?action=parse&pageid=12345&section=1&format=json"
        );
    }

    #[test]
    fn search_response_lists_pages() {
        let json = r#"{"batchcomplete":"","query":{"pages":{
            "123":{"pageid":123,"ns":0,"title":"machen","index":1},
            "456":{"pageid":456,"ns":108,"title":"Flexion:machen","index":2}}}}"#;
        let pages = SearchResponse::from_json(json).unwrap().pages();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1], PageRef { pageid: 456, title: "Flexion:machen".into() });
    }

    #[test]
    fn search_response_without_query_is_empty() {
        let pages = SearchResponse::from_json(r#"{"batchcomplete":""}"#).unwrap().pages();
        assert!(pages.is_empty());
    }

    #[test]
    fn finds_exact_flexion_page() {
        let pages = vec![
            PageRef { pageid: 1, title: "Flexion:machen lassen".into() },
            PageRef { pageid: 2, title: " Flexion:machen ".into() },
        ];
        assert_eq!(find_flexion_page("machen", &pages).map(|p| p.pageid), Some(2));
        assert!(find_flexion_page("tun", &pages).is_none());
    }

    #[test]
    fn flexion_lookup_ignores_normalization_form() {
        let decomposed = "Flexion:la\u{0308}cheln";
        let pages = vec![PageRef { pageid: 7, title: decomposed.into() }];
        assert_eq!(find_flexion_page("lächeln", &pages).map(|p| p.pageid), Some(7));
    }

    #[test]
    fn parse_response_with_wrapped_text() {
        let json = r#"{"parse":{"title":"Haus","pageid":42,"text":{"*":"<p>Haus</p>"}}}"#;
        let page = ParseResponse::from_json(json).unwrap().into_page("42");
        assert_eq!(page, PageContent { title: "Haus".into(), page_id: "42".into(), html: "<p>Haus</p>".into() });
    }

    #[test]
    fn parse_response_with_plain_text() {
        let json = r#"{"parse":{"title":"Haus","pageid":42,"text":"<p>Haus</p>"}}"#;
        let page = ParseResponse::from_json(json).unwrap().into_page("42");
        assert_eq!(page.html, "<p>Haus</p>");
    }

    #[test]
    fn error_response_is_empty_page() {
        let json = r#"{"error":{"code":"nosuchpageid","info":"There is no page with ID 9."}}"#;
        let page = ParseResponse::from_json(json).unwrap().into_page("9");
        assert_eq!(page, PageContent { page_id: "9".into(), ..Default::default() });
    }
}
