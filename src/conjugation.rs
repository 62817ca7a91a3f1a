//! Conjugation tables of the `Flexion:` companion page.
//!
//! The tables carry no machine-readable structure. Cell background colour is
//! the only signal: a lone `#CCCCFF` cell names the category that follows
//! ("Präsens", "Futur I"), `#F4F4F4`/`#E8E8E8` rows are column headers, and
//! data rows start with a shaded row-header cell followed by plain cells.
//! Column meaning comes from position, not from header text.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use log::{debug, trace};
use scraper::{ElementRef, Html, Selector};

use crate::entry::TableSection;

lazy_static! {
    static ref TABLE: Selector = Selector::parse("table").unwrap();
    static ref ROW: Selector = Selector::parse("tr").unwrap();
}

const TITLE_COLOR: &str = "#CCCCFF";
const HEADER_COLOR: &str = "#F4F4F4";
const COLUMN_HEADER_COLOR: &str = "#E8E8E8";
const FORCED_HEADER_STYLE: &str = "background:#f4f4f4";
const STYLE_PREFIX_LEN: usize = "background:".len();

/// Colours a row-header cell may carry inside a data row.
const ROW_HEADER_COLORS: [&str; 3] = ["#F4F4F4", "#DEDEDE", "#C1C1C1"];

// ─────────────────────────────────────────────────────────────────────────────
// Row roles
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRole {
    /// Single `#CCCCFF` cell announcing an inflection category.
    Title,
    Header,
    Subtitle,
    /// Shaded row header plus unshaded data cells.
    Mixed,
    /// Uniformly coloured row that is neither title nor header.
    Data,
}

/// Classify a row from the background colours of its cells.
pub fn classify_row(colors: &[Option<String>]) -> RowRole {
    let first = colors.first();
    let uniform = first.is_some_and(|f| colors.iter().all(|c| c == f));

    if uniform {
        return match first.and_then(|c| c.as_deref()) {
            Some(TITLE_COLOR) if colors.len() > 1 => RowRole::Subtitle,
            Some(TITLE_COLOR) => RowRole::Title,
            Some(HEADER_COLOR) => RowRole::Header,
            _ => RowRole::Data,
        };
    }

    if colors.iter().any(|c| c.as_deref() == Some(COLUMN_HEADER_COLOR)) {
        RowRole::Header
    } else {
        RowRole::Mixed
    }
}

/// Background colour of a cell, upper-cased.
///
/// Inline `style` wins over the legacy `bgcolor` attribute. The colour is
/// whatever follows the `background:` prefix up to the first `;`.
pub fn cell_color(cell: &ElementRef) -> Option<String> {
    let element = cell.value();
    let raw = match element.attr("style").filter(|s| !s.is_empty()) {
        Some(style) => {
            let value: String = style.chars().skip(STYLE_PREFIX_LEN).collect();
            value.split(';').next().unwrap_or_default().to_string()
        }
        None => element.attr("bgcolor")?.to_string(),
    };

    let color = raw.trim().to_uppercase();
    (!color.is_empty()).then_some(color)
}

fn row_role(row: &ElementRef, cells: &[ElementRef]) -> RowRole {
    if row.value().attr("style") == Some(FORCED_HEADER_STYLE) {
        return RowRole::Header;
    }
    let colors: Vec<Option<String>> = cells.iter().map(cell_color).collect();
    classify_row(&colors)
}

/// `td`/`th` children of a row, in column order.
fn row_cells<'a>(row: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| matches!(el.value().name(), "td" | "th"))
        .collect()
}

fn cell_text(cell: &ElementRef) -> String {
    cell.text().collect::<String>().trim().to_string()
}

// ─────────────────────────────────────────────────────────────────────────────
// Inflection categories and their column schemas
// ─────────────────────────────────────────────────────────────────────────────

/// Category announced by a title row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InflectionName {
    NonExtendedInfinitives,
    ExtendedInfinitives,
    Participles,
    VerbalAdjectives,
    Imperatives,
    Present,
    Perfect,
    Preterite,
    Pluperfect,
    FutureI,
    FutureII,
    Unknown,
}

impl InflectionName {
    pub fn from_title(title: &str) -> Self {
        match title {
            "(nichterweiterte) Infinitive" => Self::NonExtendedInfinitives,
            "erweiterte Infinitive" => Self::ExtendedInfinitives,
            "Partizipien" => Self::Participles,
            "Flexion der Verbaladjektive" => Self::VerbalAdjectives,
            "Imperative" => Self::Imperatives,
            "Präsens" => Self::Present,
            "Perfekt" => Self::Perfect,
            "Präteritum" => Self::Preterite,
            "Plusquamperfekt" => Self::Pluperfect,
            "Futur I" => Self::FutureI,
            "Futur II" => Self::FutureII,
            _ => Self::Unknown,
        }
    }

    pub fn schema(self) -> Option<Schema> {
        match self {
            Self::NonExtendedInfinitives | Self::ExtendedInfinitives => Some(Schema::Infinitive),
            Self::Participles => Some(Schema::Participle),
            Self::VerbalAdjectives => Some(Schema::VerbalAdjective),
            Self::Imperatives => Some(Schema::Imperative),
            Self::Present | Self::Perfect => Some(Schema::Present),
            Self::Preterite | Self::Pluperfect => Some(Schema::Past),
            Self::FutureI | Self::FutureII => Some(Schema::Future),
            Self::Unknown => None,
        }
    }
}

/// Fixed column layout of one family of conjugation tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schema {
    Infinitive,
    Participle,
    VerbalAdjective,
    Imperative,
    Present,
    Past,
    Future,
}

const VOICES: &[&str] = &["Aktiv", "Vorgangspassiv", "Zustandspassiv"];

const ADDRESSEES: &[&str] = &["2. Person Singular", "2. Person Plural", "Höflichkeitsform"];

const PERSONS: &[&str] = &[
    "1. Person Singular",
    "2. Person Singular",
    "3. Person Singular",
    "1. Person Plural",
    "2. Person Plural",
    "3. Person Plural",
];

impl Schema {
    /// Column labels by cell position; position 0 is the row header.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Schema::Infinitive => &["", "Infinitiv Präsens", "Infinitiv Perfekt"],
            Schema::Participle | Schema::VerbalAdjective => {
                &["Präsens Aktiv", "Perfekt Passiv", "Gerundivum"]
            }
            Schema::Imperative => &[
                "",
                "Präsens Aktiv",
                "Präsens Vorgangspassiv",
                "Präsens Zustandspassiv",
                "Perfekt Aktiv",
                "Perfekt Vorgangspassiv",
                "Perfekt Zustandspassiv",
            ],
            Schema::Present => &[
                "",
                "Aktiv Indikativ",
                "Aktiv Konjunktiv I",
                "Vorgangspassiv Indikativ",
                "Vorgangspassiv Konjunktiv I",
                "Zustandspassiv Indikativ",
                "Zustandspassiv Konjunktiv I",
            ],
            Schema::Past => &[
                "",
                "Aktiv Indikativ",
                "Aktiv Konjunktiv II",
                "Vorgangspassiv Indikativ",
                "Vorgangspassiv Konjunktiv II",
                "Zustandspassiv Indikativ",
                "Zustandspassiv Konjunktiv II",
            ],
            Schema::Future => &[
                "",
                "Aktiv Indikativ",
                "Aktiv Konjunktiv I",
                "Aktiv Konjunktiv II",
                "Vorgangspassiv Indikativ",
                "Vorgangspassiv Konjunktiv I",
                "Vorgangspassiv Konjunktiv II",
                "Zustandspassiv Indikativ",
                "Zustandspassiv Konjunktiv I",
                "Zustandspassiv Konjunktiv II",
            ],
        }
    }

    /// Accepted row-header labels; `None` for schemas without row headers.
    pub fn row_headers(self) -> Option<&'static [&'static str]> {
        match self {
            Schema::Infinitive => Some(VOICES),
            Schema::Imperative => Some(ADDRESSEES),
            Schema::Present | Schema::Past | Schema::Future => Some(PERSONS),
            Schema::Participle | Schema::VerbalAdjective => None,
        }
    }

    /// Extract the cells of one data row.
    pub fn extract(self, cells: &[ElementRef]) -> TableSection {
        match self.row_headers() {
            Some(whitelist) => TableSection::Grid(extract_grid(cells, self.columns(), whitelist)),
            None => TableSection::Columns(extract_columns(cells, self.columns(), self)),
        }
    }
}

/// Rows that start with a shaded row-header cell.
fn extract_grid(
    cells: &[ElementRef],
    columns: &[&str],
    whitelist: &[&str],
) -> IndexMap<String, IndexMap<String, String>> {
    let mut rows: IndexMap<String, IndexMap<String, String>> = IndexMap::new();
    let mut row_header: Option<String> = None;

    for (index, cell) in cells.iter().enumerate() {
        let text = cell_text(cell);
        match cell_color(cell) {
            Some(color) if ROW_HEADER_COLORS.contains(&color.as_str()) => {
                if whitelist.contains(&text.as_str()) {
                    rows.insert(text.clone(), IndexMap::new());
                    row_header = Some(text);
                } else {
                    debug!("skipping row header {:?}", text);
                    row_header = None;
                }
            }
            Some(_) => {}
            None => {
                let (Some(header), Some(column)) = (&row_header, columns.get(index)) else {
                    continue;
                };
                rows.entry(header.clone())
                    .or_default()
                    .insert(column.to_string(), text);
            }
        }
    }

    rows
}

/// Rows whose every cell is data, mapped by position.
fn extract_columns(cells: &[ElementRef], columns: &[&str], schema: Schema) -> IndexMap<String, String> {
    cells
        .iter()
        .zip(columns)
        .map(|(cell, column)| {
            let text = match schema {
                Schema::VerbalAdjective => cell_text(cell).replace("Flexion:", "").trim().to_string(),
                _ => cell_text(cell),
            };
            (column.to_string(), text)
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Table walk
// ─────────────────────────────────────────────────────────────────────────────

/// State threaded through the rows of one table.
#[derive(Debug, Default)]
struct TableFold {
    inflection: String,
    sections: IndexMap<String, TableSection>,
}

impl TableFold {
    fn step(mut self, row: ElementRef) -> Self {
        let cells = row_cells(&row);
        let role = row_role(&row, &cells);
        trace!("row role {:?} under {:?}", role, self.inflection);

        match role {
            RowRole::Title => {
                self.inflection = cells.iter().map(cell_text).collect::<String>().trim().to_string();
            }
            RowRole::Header | RowRole::Subtitle => {}
            RowRole::Mixed | RowRole::Data => {
                let Some(schema) = InflectionName::from_title(&self.inflection).schema() else {
                    debug!("no handler for inflection {:?}", self.inflection);
                    return self;
                };
                let extracted = schema.extract(&cells);
                if extracted.is_empty() {
                    return self;
                }
                merge_section(&mut self.sections, &self.inflection, extracted);
            }
        }
        self
    }
}

fn merge_section(sections: &mut IndexMap<String, TableSection>, key: &str, section: TableSection) {
    match sections.get_mut(key) {
        Some(existing) => existing.merge(section),
        None => {
            sections.insert(key.to_string(), section);
        }
    }
}

/// Walk every table of a parsed `Flexion:` page.
///
/// Each table starts with no current category. Sections found in several
/// tables are shallow-merged in document order.
pub fn extract_verb_inflection(document: &Html) -> IndexMap<String, TableSection> {
    let mut inflections = IndexMap::new();

    for table in document.select(&TABLE) {
        let fold = table
            .select(&ROW)
            .fold(TableFold::default(), TableFold::step);

        for (key, section) in fold.sections {
            merge_section(&mut inflections, &key, section);
        }
    }

    inflections
}
