//! Scraper for German Wiktionary entry pages.
//!
//! Turns the rendered HTML of an entry page, plus the optional `Flexion:`
//! conjugation page, into a [`WordEntry`]. Fetching pages is the caller's
//! job; [`mediawiki`] has the URL builders and response decoders for that.

pub mod conjugation;
pub mod entry;
pub mod error;
pub mod languages;
pub mod mediawiki;
pub mod parallel;
pub mod sections;
pub mod text;
pub mod widget;

use scraper::Html;

pub use entry::{InflectionPayload, InflectionSection, TableSection, Translation, WidgetForm, WordEntry};
pub use error::{Result, ScrapeError};
pub use mediawiki::PageContent;

/// Build the record for one headword from already-parsed documents.
///
/// `Flexion` always carries the nine widget categories (`null` when the page
/// has no widget); conjugation-table sections are assigned over them.
pub fn extract_entry(title: &str, page_id: &str, document: &Html, flexion: Option<&Html>) -> WordEntry {
    let mut inflection =
        InflectionPayload(widget::extract_inflection(document).unwrap_or_else(widget::empty_inflection));

    if let Some(flexion) = flexion {
        inflection.assign_tables(conjugation::extract_verb_inflection(flexion));
    }

    WordEntry {
        title: title.to_string(),
        page_id: page_id.to_string(),
        hyphenation: sections::extract_hyphenation(document),
        pronunciation: sections::extract_ipa(document),
        origin: sections::extract_origin(document),
        meanings: sections::extract_meanings(document),
        synonyms: sections::extract_synonyms(document),
        antonyms: sections::extract_antonyms(document),
        examples: sections::extract_examples(document),
        idioms: sections::extract_idioms(document),
        word_combinations: sections::extract_word_combinations(document),
        translations: sections::extract_translations(document),
        inflection: Some(inflection),
    }
}

/// Parse and scrape a page and its optional `Flexion:` companion.
pub fn scrape_page(page: &PageContent, flexion: Option<&PageContent>) -> WordEntry {
    let document = Html::parse_document(&page.html);
    let flexion_document = flexion.map(|f| Html::parse_document(&f.html));
    extract_entry(&page.title, &page.page_id, &document, flexion_document.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HAUS: &str = r#"
        <p title="Phonetik">Aussprache:</p>
        <dl><dd>IPA: [haʊ̯s]</dd>
        <dd>Reim: -aʊ̯s</dd></dl>
        <p title="bedeutungsgleich gebrauchte Wörter">Synonyme:</p>
        <dl></dl>
    "#;

    fn page(html: &str) -> PageContent {
        PageContent { title: "Haus".into(), page_id: "42".into(), html: html.into() }
    }

    #[test]
    fn extraction_is_idempotent() {
        let page = page(HAUS);
        assert_eq!(scrape_page(&page, None), scrape_page(&page, None));
    }

    #[test]
    fn ipa_only_and_missing_origin() {
        let entry = scrape_page(&page(HAUS), None);
        assert_eq!(entry.pronunciation.as_deref(), Some("[haʊ̯s]"));
        assert_eq!(entry.origin, None);

        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("Herkunft").is_none());
        assert_eq!(json["Aussprache"], "[haʊ̯s]");
    }

    #[test]
    fn empty_synonyms_distinct_from_missing_antonyms() {
        let entry = scrape_page(&page(HAUS), None);
        assert_eq!(entry.synonyms, Some(vec![]));
        assert_eq!(entry.antonyms, None);
    }

    #[test]
    fn null_categories_without_widget_or_tables() {
        let entry = scrape_page(&page(HAUS), None);
        let json = serde_json::to_value(&entry).unwrap();
        let flexion = json["Flexion"].as_object().unwrap();
        assert_eq!(flexion.len(), 9);
        assert!(flexion.values().all(|v| v.is_null()));
        assert!(flexion.contains_key("Akkusativ"));
    }

    #[test]
    fn flexion_tables_without_widget_still_populate() {
        let flexion = PageContent {
            title: "Flexion:machen".into(),
            page_id: "7".into(),
            html: r#"<table>
                <tr><th style="background:#CCCCFF">Präsens</th></tr>
                <tr><th style="background:#F4F4F4">1. Person Singular</th><td>ich mache</td></tr>
            </table>"#
                .into(),
        };
        let entry = scrape_page(&page(HAUS), Some(&flexion));
        let inflection = entry.inflection.unwrap();
        assert!(inflection.table("Präsens").is_some());
        assert_eq!(inflection.0.len(), 9);
        assert_eq!(inflection.widget("Nominativ"), Some(None));
        assert_eq!(inflection.widget("Präteritum"), Some(None));
    }
}
