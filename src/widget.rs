//! The `inflection-table` widget on noun, adjective, pronoun and verb entries.
//!
//! The widget's cells collapse into text blocks separated by three line
//! breaks, so it is read from rendered text rather than walked as a table.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use log::debug;
use scraper::{Html, Selector};

use crate::entry::{InflectionSection, WidgetForm};
use crate::text::{add_separation, new_line_split};

lazy_static! {
    static ref INFLECTION_TABLE: Selector = Selector::parse("table.inflection-table").unwrap();
}

const CHUNK_SEPARATOR: &str = "\n\n\n";

const TENSE_LABELS: [&str; 5] = ["Präsens", "Präteritum", "Konjunktiv II", "Imperativ", "Perfekt"];
const CASE_LABELS: [&str; 4] = ["Nominativ", "Genitiv", "Dativ", "Akkusativ"];

/// Header-row noise that never carries forms.
const NOISE_MARKERS: [&str; 3] = ["Alle weiteren Formen", "Person", "Wortform"];

const KONJUNKTIV: &str = "Konjunktiv";
const KONJUNKTIV_II: &str = "Konjunktiv II";
const PERFEKT: &str = "Perfekt";

fn all_labels() -> impl Iterator<Item = &'static str> {
    TENSE_LABELS.into_iter().chain(CASE_LABELS)
}

fn mentions_any(chunk: &str, labels: &[&str]) -> bool {
    labels.iter().any(|label| chunk.contains(label))
}

fn is_case(label: &str) -> bool {
    CASE_LABELS.contains(&label)
}

/// Rows collected per widget category, in the fixed category order.
#[derive(Debug)]
struct WidgetTable {
    forms: IndexMap<&'static str, Vec<WidgetForm>>,
    current: Option<&'static str>,
}

impl WidgetTable {
    fn new() -> Self {
        Self {
            forms: all_labels().map(|label| (label, Vec::new())).collect(),
            current: None,
        }
    }

    fn push(&mut self, label: &'static str, form: Option<WidgetForm>) {
        match (form, self.forms.get_mut(label)) {
            (Some(form), Some(forms)) => forms.push(form),
            _ => debug!("incomplete {} row in inflection widget", label),
        }
    }

    /// Switch to the category named by a header line; unknown names clear it.
    fn switch_to(&mut self, header: &str) -> Option<&'static str> {
        self.current = all_labels().find(|label| *label == header);
        self.current
    }

    fn read_chunk(&mut self, chunk: &str) {
        let lines: Vec<&str> = new_line_split(chunk)
            .into_iter()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let Some(&first) = lines.first() else {
            return;
        };

        if first.contains(KONJUNKTIV) {
            self.current = Some(KONJUNKTIV_II);
            self.push(KONJUNKTIV_II, person(&lines, 1));
            return;
        }

        let labels: Vec<&str> = all_labels().collect();
        if !mentions_any(chunk, &labels) {
            self.read_continuation(&lines);
        } else if mentions_any(chunk, &TENSE_LABELS) {
            if chunk.contains(PERFEKT) {
                self.current = Some(PERFEKT);
            } else if let Some(label) = self.switch_to(first) {
                self.push(label, person(&lines, 1));
            }
        } else if mentions_any(chunk, &CASE_LABELS) {
            if let Some(label) = self.switch_to(first) {
                self.push(label, case(&lines, 1));
            }
        }
    }

    /// A chunk without a category label continues the current category.
    fn read_continuation(&mut self, lines: &[&str]) {
        let Some(label) = self.current else {
            debug!("inflection widget row outside any category: {:?}", lines);
            return;
        };

        let form = match label {
            PERFEKT => participle(lines),
            label if is_case(label) => case(lines, 0),
            _ => person(lines, 0),
        };
        self.push(label, form);
    }

    fn into_sections(self) -> IndexMap<String, InflectionSection> {
        self.forms
            .into_iter()
            .map(|(label, forms)| {
                let forms = (!forms.is_empty()).then_some(forms);
                (label.to_string(), InflectionSection::Widget(forms))
            })
            .collect()
    }
}

fn pair(lines: &[&str], at: usize) -> Option<(String, String)> {
    Some((lines.get(at)?.to_string(), lines.get(at + 1)?.to_string()))
}

fn person(lines: &[&str], at: usize) -> Option<WidgetForm> {
    pair(lines, at).map(|(person, form)| WidgetForm::Person { person, form })
}

fn case(lines: &[&str], at: usize) -> Option<WidgetForm> {
    pair(lines, at).map(|(singular, plural)| WidgetForm::Case {
        singular: add_separation(&singular),
        plural,
    })
}

fn participle(lines: &[&str]) -> Option<WidgetForm> {
    pair(lines, 0).map(|(participle, auxiliary)| WidgetForm::Participle { participle, auxiliary })
}

/// Parse the rendered text of an inflection widget.
///
/// Every one of the nine categories is present in the result; categories
/// without rows are `null`.
pub fn parse_inflection_text(text: &str) -> IndexMap<String, InflectionSection> {
    let mut table = WidgetTable::new();

    for chunk in text.split(CHUNK_SEPARATOR) {
        if chunk.is_empty() || mentions_any(chunk, &NOISE_MARKERS) {
            continue;
        }
        table.read_chunk(chunk);
    }

    table.into_sections()
}

/// All nine widget categories, each `null`.
pub fn empty_inflection() -> IndexMap<String, InflectionSection> {
    WidgetTable::new().into_sections()
}

/// Read the widget of a parsed entry page, if the page has one.
pub fn extract_inflection(document: &Html) -> Option<IndexMap<String, InflectionSection>> {
    let mut widgets = document.select(&INFLECTION_TABLE).peekable();
    widgets.peek()?;

    let text: String = widgets.flat_map(|table| table.text()).collect();
    Some(parse_inflection_text(&text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forms<'a>(sections: &'a IndexMap<String, InflectionSection>, key: &str) -> &'a [WidgetForm] {
        match &sections[key] {
            InflectionSection::Widget(Some(forms)) => forms,
            other => panic!("expected rows under {key}, got {:?}", other),
        }
    }

    fn is_null(sections: &IndexMap<String, InflectionSection>, key: &str) -> bool {
        matches!(sections[key], InflectionSection::Widget(None))
    }

    fn person_form(person: &str, form: &str) -> WidgetForm {
        WidgetForm::Person { person: person.into(), form: form.into() }
    }

    const VERB_WIDGET: &str = "\nPerson\n\nWortform\n\n\n\
        Präsens\nich\nmache\n\n\n\
        du\nmachst\n\n\n\
        er, sie, es\nmacht\n\n\n\
        Präteritum\nich\nmachte\n\n\n\
        Konjunktiv II\nich\nmachte\n\n\n\
        Imperativ\nSingular\nmach!\n\n\n\
        Plural\nmacht!\n\n\n\
        Perfekt\nPartizip II\nHilfsverb\n\n\n\
        gemacht\nhaben\n\n\n\
        Alle weiteren Formen: Flexion:machen\n";

    const NOUN_WIDGET: &str = "\nKasus\nSingular\nPlural\n\n\n\
        Nominativ\nder Mann\ndie Männer\n\n\n\
        Genitiv\ndes Mannes des Manns\nder Männer\n\n\n\
        Dativ\ndem Mann\nden Männern\n\n\n\
        Akkusativ\nden Mann\ndie Männer\n";

    #[test]
    fn verb_widget_tenses() {
        let sections = parse_inflection_text(VERB_WIDGET);

        assert_eq!(
            forms(&sections, "Präsens"),
            &[
                person_form("ich", "mache"),
                person_form("du", "machst"),
                person_form("er, sie, es", "macht"),
            ]
        );
        assert_eq!(forms(&sections, "Präteritum"), &[person_form("ich", "machte")]);
        assert_eq!(forms(&sections, "Konjunktiv II"), &[person_form("ich", "machte")]);
        assert_eq!(
            forms(&sections, "Imperativ"),
            &[person_form("Singular", "mach!"), person_form("Plural", "macht!")]
        );
    }

    #[test]
    fn perfect_rows_carry_participle_and_auxiliary() {
        let sections = parse_inflection_text(VERB_WIDGET);
        assert_eq!(
            forms(&sections, "Perfekt"),
            &[WidgetForm::Participle { participle: "gemacht".into(), auxiliary: "haben".into() }]
        );
    }

    #[test]
    fn verb_widget_leaves_cases_null() {
        let sections = parse_inflection_text(VERB_WIDGET);
        assert_eq!(sections.len(), 9);
        for case in CASE_LABELS {
            assert!(is_null(&sections, case), "{case} should be null");
        }
    }

    #[test]
    fn noun_widget_cases() {
        let sections = parse_inflection_text(NOUN_WIDGET);

        assert_eq!(
            forms(&sections, "Nominativ"),
            &[WidgetForm::Case { singular: "der Mann".into(), plural: "die Männer".into() }]
        );
        assert_eq!(
            forms(&sections, "Genitiv"),
            &[WidgetForm::Case { singular: "des Mannes, des Manns".into(), plural: "der Männer".into() }]
        );
        for tense in TENSE_LABELS {
            assert!(is_null(&sections, tense), "{tense} should be null");
        }
    }

    #[test]
    fn konjunktiv_chunk_switches_mid_stream() {
        let text = "Präsens\nich\ngehe\n\n\nKonjunktiv II (Präteritum)\nich\nginge\n\n\ndu\ngingest";
        let sections = parse_inflection_text(text);

        assert_eq!(forms(&sections, "Präsens"), &[person_form("ich", "gehe")]);
        assert_eq!(
            forms(&sections, "Konjunktiv II"),
            &[person_form("ich", "ginge"), person_form("du", "gingest")]
        );
    }

    #[test]
    fn rows_before_any_category_are_dropped() {
        let sections = parse_inflection_text("ich\nmache\n\n\nPräsens\ndu\nmachst");
        assert_eq!(forms(&sections, "Präsens"), &[person_form("du", "machst")]);
    }

    #[test]
    fn incomplete_header_chunk_is_skipped() {
        let sections = parse_inflection_text("Nominativ\nder Mann");
        assert!(is_null(&sections, "Nominativ"));
    }

    #[test]
    fn empty_text_yields_all_null() {
        let sections = parse_inflection_text("");
        assert_eq!(sections.len(), 9);
        assert!(sections.values().all(|s| matches!(s, InflectionSection::Widget(None))));
    }

    #[test]
    fn empty_inflection_has_every_category() {
        let sections = empty_inflection();
        let keys: Vec<&str> = sections.keys().map(String::as_str).collect();
        assert_eq!(keys, all_labels().collect::<Vec<_>>());
        assert!(sections.values().all(|s| matches!(s, InflectionSection::Widget(None))));
    }

    #[test]
    fn page_without_widget_has_no_inflection() {
        let document = Html::parse_document("<p>Haus</p>");
        assert!(extract_inflection(&document).is_none());
    }

    #[test]
    fn widget_text_is_read_from_table() {
        let html = "<table class=\"inflection-table\"><tbody>\
            <tr><th>Kasus</th><th>Singular</th><th>Plural</th></tr>\n\n\n\
            <tr><th>Nominativ</th>\n<td>das Haus</td>\n<td>die Häuser</td></tr>\
            </tbody></table>";
        let sections = extract_inflection(&Html::parse_document(html)).unwrap();
        assert_eq!(
            forms(&sections, "Nominativ"),
            &[WidgetForm::Case { singular: "das Haus".into(), plural: "die Häuser".into() }]
        );
    }
}
