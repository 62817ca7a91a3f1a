//! The output record and its inflection payload.
//!
//! Field names on the wire are the literal German section labels. A field
//! whose section marker is missing from the page is `None` and not
//! serialized at all; a field whose marker exists but holds nothing is
//! serialized as an empty string or list.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One dictionary headword scraped from a Wiktionary page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordEntry {
    pub title: String,
    #[serde(rename = "pageId")]
    pub page_id: String,

    #[serde(rename = "Worttrennung", default, skip_serializing_if = "Option::is_none")]
    pub hyphenation: Option<String>,
    #[serde(rename = "Aussprache", default, skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
    #[serde(rename = "Herkunft", default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(rename = "Bedeutungen", default, skip_serializing_if = "Option::is_none")]
    pub meanings: Option<Vec<String>>,
    #[serde(rename = "Synonyme", default, skip_serializing_if = "Option::is_none")]
    pub synonyms: Option<Vec<String>>,
    #[serde(rename = "Gegenwörter", default, skip_serializing_if = "Option::is_none")]
    pub antonyms: Option<Vec<String>>,
    #[serde(rename = "Beispiele", default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<String>>,
    #[serde(rename = "Redewendungen", default, skip_serializing_if = "Option::is_none")]
    pub idioms: Option<Vec<String>>,
    #[serde(
        rename = "Charakteristische Wortkombinationen",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub word_combinations: Option<Vec<String>>,
    #[serde(rename = "Übersetzungen", default, skip_serializing_if = "Option::is_none")]
    pub translations: Option<Vec<Translation>>,
    #[serde(rename = "Flexion", default, skip_serializing_if = "Option::is_none")]
    pub inflection: Option<InflectionPayload>,
}

/// A `"<Sprache>: <Übersetzung>"` line from the translation box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub language: String,
    #[serde(rename = "languageCode", default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    pub translation: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Inflection payload
// ─────────────────────────────────────────────────────────────────────────────

/// Inflection data keyed by category name ("Präsens", "Nominativ", ...).
///
/// Values from the declension/conjugation widget and from the `Flexion:`
/// conjugation tables share this map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InflectionPayload(pub IndexMap<String, InflectionSection>);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InflectionSection {
    /// Widget rows; `None` when the widget had no rows for this category.
    Widget(Option<Vec<WidgetForm>>),
    Table(TableSection),
}

/// One row of the inflection widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WidgetForm {
    Person {
        #[serde(rename = "Person")]
        person: String,
        #[serde(rename = "Wortform")]
        form: String,
    },
    Case {
        #[serde(rename = "Singular")]
        singular: String,
        #[serde(rename = "Plural")]
        plural: String,
    },
    Participle {
        #[serde(rename = "Partizip II")]
        participle: String,
        #[serde(rename = "Hilfsverb")]
        auxiliary: String,
    },
}

/// Cells of one conjugation-table category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableSection {
    /// row header → column label → cell text
    Grid(IndexMap<String, IndexMap<String, String>>),
    /// column label → cell text, for schemas without row headers
    Columns(IndexMap<String, String>),
}

impl TableSection {
    pub fn is_empty(&self) -> bool {
        match self {
            TableSection::Grid(rows) => rows.is_empty(),
            TableSection::Columns(cells) => cells.is_empty(),
        }
    }

    /// Shallow merge: keys of `other` are assigned over keys of `self`.
    pub fn merge(&mut self, other: TableSection) {
        match (self, other) {
            (TableSection::Grid(rows), TableSection::Grid(more)) => rows.extend(more),
            (TableSection::Columns(cells), TableSection::Columns(more)) => cells.extend(more),
            (this, other) => *this = other,
        }
    }
}

impl InflectionPayload {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&InflectionSection> {
        self.0.get(key)
    }

    /// Conjugation-table section for `key`, if that key holds table data.
    pub fn table(&self, key: &str) -> Option<&TableSection> {
        match self.0.get(key)? {
            InflectionSection::Table(section) => Some(section),
            InflectionSection::Widget(_) => None,
        }
    }

    /// Widget rows for `key`; `Some(None)` when the category was empty.
    pub fn widget(&self, key: &str) -> Option<Option<&[WidgetForm]>> {
        match self.0.get(key)? {
            InflectionSection::Widget(forms) => Some(forms.as_deref()),
            InflectionSection::Table(_) => None,
        }
    }

    /// Assign every table section over the existing value for its key.
    pub fn assign_tables(&mut self, tables: IndexMap<String, TableSection>) {
        for (key, section) in tables {
            self.0.insert(key, InflectionSection::Table(section));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(row: &str, column: &str, cell: &str) -> TableSection {
        let mut cells = IndexMap::new();
        cells.insert(column.to_string(), cell.to_string());
        let mut rows = IndexMap::new();
        rows.insert(row.to_string(), cells);
        TableSection::Grid(rows)
    }

    #[test]
    fn missing_fields_are_not_serialized() {
        let entry = WordEntry {
            title: "Haus".to_string(),
            page_id: "42".to_string(),
            synonyms: Some(vec![]),
            ..Default::default()
        };

        let json = serde_json::to_value(&entry).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object["pageId"], "42");
        assert_eq!(object["Synonyme"], serde_json::json!([]));
        assert!(!object.contains_key("Herkunft"));
        assert!(!object.contains_key("Flexion"));
    }

    #[test]
    fn translation_without_code_omits_key() {
        let translation = Translation {
            language: "Klingonisch".to_string(),
            language_code: None,
            translation: "juH".to_string(),
        };
        let json = serde_json::to_string(&translation).unwrap();
        assert_eq!(json, r#"{"language":"Klingonisch","translation":"juH"}"#);
    }

    #[test]
    fn widget_forms_use_german_keys() {
        let forms = vec![
            WidgetForm::Person { person: "ich".into(), form: "mache".into() },
            WidgetForm::Case { singular: "der Mann".into(), plural: "die Männer".into() },
            WidgetForm::Participle { participle: "gemacht".into(), auxiliary: "haben".into() },
        ];
        let json = serde_json::to_value(&forms).unwrap();
        assert_eq!(json[0]["Wortform"], "mache");
        assert_eq!(json[1]["Plural"], "die Männer");
        assert_eq!(json[2]["Partizip II"], "gemacht");
    }

    #[test]
    fn empty_widget_category_serializes_as_null() {
        let mut payload = InflectionPayload::default();
        payload.0.insert("Genitiv".to_string(), InflectionSection::Widget(None));
        assert_eq!(serde_json::to_string(&payload).unwrap(), r#"{"Genitiv":null}"#);
    }

    #[test]
    fn payload_round_trips_through_json() {
        let mut payload = InflectionPayload::default();
        payload.0.insert(
            "Nominativ".to_string(),
            InflectionSection::Widget(Some(vec![WidgetForm::Case {
                singular: "das Haus".into(),
                plural: "die Häuser".into(),
            }])),
        );
        payload.0.insert("Präsens".to_string(), InflectionSection::Table(grid("1. Person Singular", "Aktiv Indikativ", "ich mache")));

        let json = serde_json::to_string(&payload).unwrap();
        let back: InflectionPayload = serde_json::from_str(&json).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn merge_assigns_over_existing_rows() {
        let mut section = grid("1. Person Singular", "Aktiv Indikativ", "ich mache");
        section.merge(grid("2. Person Singular", "Aktiv Indikativ", "du machst"));
        section.merge(grid("1. Person Singular", "Aktiv Konjunktiv I", "ich mache"));

        let TableSection::Grid(rows) = section else { panic!("expected grid") };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows["1. Person Singular"].len(), 1);
        assert_eq!(rows["1. Person Singular"]["Aktiv Konjunktiv I"], "ich mache");
    }

    #[test]
    fn assign_tables_replaces_widget_value() {
        let mut payload = InflectionPayload::default();
        payload.0.insert("Präsens".to_string(), InflectionSection::Widget(None));

        let mut tables = IndexMap::new();
        tables.insert("Präsens".to_string(), grid("1. Person Singular", "Aktiv Indikativ", "ich mache"));
        payload.assign_tables(tables);

        assert!(payload.widget("Präsens").is_none());
        assert!(payload.table("Präsens").is_some());
    }
}
