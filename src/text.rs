//! Shared text cleanup for scraped Wiktionary markup.
//!
//! Everything here works on the rendered text of a node, never on the DOM:
//! footnote brackets, redirect arrows and embedded line breaks are the only
//! structure left once the HTML is flattened.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Footnote and sense references: [1], [1, 2], [a]
    static ref REFERENCE: Regex = Regex::new(r"\[(.*?)\]").unwrap();
    static ref BRACKETED: Regex = Regex::new(r"\[(.+?)\]").unwrap();

    // Redirect fragments such as "→ en" or "→ Gebäude"
    static ref REDIRECT: Regex = Regex::new(r"→\s*[\p{L}\-]+").unwrap();

    // A run of definite articles, e.g. the "des " in "des Mannes"
    static ref ARTICLE_RUN: Regex = Regex::new(r"(des |die |der |dem |den |das )+").unwrap();
}

const STAR_GLYPH: char = '☆';

/// Strip `[...]` spans, the ☆ glyph and `→ word` redirect fragments, then trim.
pub fn remove_reference(s: &str) -> String {
    let without_refs = REFERENCE.replace_all(s, "");
    let without_star = without_refs.replace(STAR_GLYPH, "");
    REDIRECT.replace_all(&without_star, "").trim().to_string()
}

/// Split on `\n`, dropping empty segments.
pub fn new_line_split(s: &str) -> Vec<&str> {
    s.split('\n').filter(|line| !line.is_empty()).collect()
}

/// Contents of every `[...]` span, in order of appearance.
pub fn inside_bracket(s: &str) -> Vec<String> {
    BRACKETED
        .captures_iter(s)
        .map(|cap| cap[1].to_string())
        .collect()
}

/// Turn a multi-line block into a flat item list.
///
/// Lines are cleaned with [`remove_reference`], joined with commas and split
/// again, so a single source line holding `"groß, klein"` yields two items.
pub fn to_list(s: &str) -> Vec<String> {
    new_line_split(s)
        .into_iter()
        .map(remove_reference)
        .collect::<Vec<_>>()
        .join(",")
        .split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Insert a comma between two concatenated article-prefixed forms.
///
/// The declension widget sometimes renders alternatives as
/// `"des Mannes des Mannes"`. When exactly two article runs are present and
/// the leading article reappears later, the second occurrence is split off
/// with `", "`. Anything else passes through unchanged.
pub fn add_separation(s: &str) -> String {
    if ARTICLE_RUN.find_iter(s).count() != 2 {
        return s.to_string();
    }

    let (Some(prefix), Some(rest)) = (s.get(..4), s.get(5..)) else {
        return s.to_string();
    };

    match rest.find(prefix) {
        Some(offset) => {
            let split_at = 5 + offset;
            format!("{}, {}", s[..split_at].trim_end(), &s[split_at..])
        }
        None => s.to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
