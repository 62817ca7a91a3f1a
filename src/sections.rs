//! Flat entry fields located through `title` attributes.
//!
//! Each section of a German Wiktionary entry is introduced by an element whose
//! `title` attribute names it ("Phonetik", "Antonyme", ...) and followed by a
//! `<dl>` holding the content. CSS classes on these pages change often; the
//! titles do not.

use std::collections::HashMap;

use lazy_static::lazy_static;
use log::debug;
use scraper::{ElementRef, Html, Selector};

use crate::entry::Translation;
use crate::languages::language_code;
use crate::text::{new_line_split, remove_reference, to_list};

const IPA_LABEL: &str = "IPA";
const IPA_PREFIX: &str = "IPA:";

/// A flat field of [`crate::WordEntry`] and the marker that introduces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Hyphenation,
    Pronunciation,
    Origin,
    Meanings,
    Synonyms,
    Antonyms,
    Examples,
    Idioms,
    WordCombinations,
    Translations,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::Hyphenation,
        Field::Pronunciation,
        Field::Origin,
        Field::Meanings,
        Field::Synonyms,
        Field::Antonyms,
        Field::Examples,
        Field::Idioms,
        Field::WordCombinations,
        Field::Translations,
    ];

    /// Wire key of the field in the output record.
    pub fn key(self) -> &'static str {
        match self {
            Field::Hyphenation => "Worttrennung",
            Field::Pronunciation => "Aussprache",
            Field::Origin => "Herkunft",
            Field::Meanings => "Bedeutungen",
            Field::Synonyms => "Synonyme",
            Field::Antonyms => "Gegenwörter",
            Field::Examples => "Beispiele",
            Field::Idioms => "Redewendungen",
            Field::WordCombinations => "Charakteristische Wortkombinationen",
            Field::Translations => "Übersetzungen",
        }
    }

    /// `title` attribute of the element that marks the section.
    pub fn marker(self) -> &'static str {
        match self {
            Field::Hyphenation => "Trennungsmöglichkeiten am Zeilenumbruch",
            Field::Pronunciation => "Phonetik",
            Field::Origin => "Etymologie und Morphologie",
            Field::Meanings => "Sinn und Bezeichnetes (Semantik)",
            Field::Synonyms => "bedeutungsgleich gebrauchte Wörter",
            Field::Antonyms => "Antonyme",
            Field::Examples => "Verwendungsbeispielsätze",
            Field::Idioms => "Phraseologismen",
            Field::WordCombinations => "Signifikante Kollokationen",
            Field::Translations => "Übersetzungen in andere Sprachen",
        }
    }
}

struct SectionSelectors {
    marker: Selector,
    content: Selector,
}

impl SectionSelectors {
    fn new(field: Field) -> Self {
        let (marker, content) = match field {
            Field::Translations => {
                let table = format!(r#"table[title="{}"]"#, field.marker());
                let list = format!("{} ul", table);
                (table, list)
            }
            _ => {
                let marker = format!(r#"[title="{}"]"#, field.marker());
                let list = format!("{} + dl", marker);
                (marker, list)
            }
        };
        Self {
            marker: Selector::parse(&marker).unwrap(),
            content: Selector::parse(&content).unwrap(),
        }
    }
}

lazy_static! {
    static ref SECTION_SELECTORS: HashMap<Field, SectionSelectors> = Field::ALL
        .into_iter()
        .map(|field| (field, SectionSelectors::new(field)))
        .collect();
}

/// Rendered text of a section, or `None` when its marker is not on the page.
pub fn section_text(document: &Html, field: Field) -> Option<String> {
    let selectors = &SECTION_SELECTORS[&field];
    if document.select(&selectors.marker).next().is_none() {
        debug!("no {:?} marker for {}", field.marker(), field.key());
        return None;
    }

    let text = document
        .select(&selectors.content)
        .filter(|el| field != Field::Translations || is_outer_list(el))
        .flat_map(|el| el.text())
        .collect();
    Some(text)
}

/// A `<ul>` not nested inside another list of the same table.
fn is_outer_list(list: &ElementRef) -> bool {
    !list
        .ancestors()
        .filter_map(ElementRef::wrap)
        .take_while(|el| el.value().name() != "table")
        .any(|el| el.value().name() == "ul")
}

/// Cleaned, non-empty lines of a section.
fn cleaned_lines(text: &str) -> Vec<String> {
    new_line_split(text)
        .into_iter()
        .map(remove_reference)
        .filter(|line| !line.is_empty())
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Field extractors
// ─────────────────────────────────────────────────────────────────────────────

pub fn extract_hyphenation(document: &Html) -> Option<String> {
    section_text(document, Field::Hyphenation).map(|text| text.trim().to_string())
}

/// The IPA line of the pronunciation section, without its label.
pub fn extract_ipa(document: &Html) -> Option<String> {
    let text = section_text(document, Field::Pronunciation)?;
    let ipa = new_line_split(&text)
        .into_iter()
        .find(|line| line.contains(IPA_LABEL))
        .map(|line| line.replacen(IPA_PREFIX, "", 1).trim().to_string())
        .unwrap_or_default();
    Some(ipa)
}

pub fn extract_origin(document: &Html) -> Option<String> {
    section_text(document, Field::Origin).map(|text| remove_reference(&text))
}

pub fn extract_meanings(document: &Html) -> Option<Vec<String>> {
    section_text(document, Field::Meanings).map(|text| cleaned_lines(&text))
}

pub fn extract_synonyms(document: &Html) -> Option<Vec<String>> {
    section_text(document, Field::Synonyms).map(|text| to_list(&text))
}

pub fn extract_antonyms(document: &Html) -> Option<Vec<String>> {
    section_text(document, Field::Antonyms).map(|text| to_list(&text))
}

pub fn extract_examples(document: &Html) -> Option<Vec<String>> {
    section_text(document, Field::Examples).map(|text| cleaned_lines(&text))
}

pub fn extract_idioms(document: &Html) -> Option<Vec<String>> {
    section_text(document, Field::Idioms).map(|text| cleaned_lines(&text))
}

pub fn extract_word_combinations(document: &Html) -> Option<Vec<String>> {
    section_text(document, Field::WordCombinations).map(|text| cleaned_lines(&text))
}

pub fn extract_translations(document: &Html) -> Option<Vec<Translation>> {
    let text = section_text(document, Field::Translations)?;
    Some(new_line_split(&text).into_iter().filter_map(parse_translation).collect())
}

/// Parse a `"<Sprache>: <Übersetzung>"` item, splitting on the first colon.
pub fn parse_translation(item: &str) -> Option<Translation> {
    let Some((language, words)) = item.split_once(':') else {
        if !item.trim().is_empty() {
            debug!("translation item without language: {:?}", item);
        }
        return None;
    };

    let language = language.trim().to_string();
    Some(Translation {
        language_code: language_code(&language).map(str::to_string),
        translation: remove_reference(words),
        language,
    })
}
