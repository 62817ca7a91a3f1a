//! German language names → ISO 639 codes, as used in translation tables.
//!
//! A built-in table covers the languages the translation box lists most
//! often. It can be replaced once per process by a YAML schema
//! (`schema/languages.yaml`) with the same shape as the table below.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use log::debug;
use once_cell::sync::OnceCell;
use serde::Deserialize;

use crate::error::{Result, ScrapeError};

#[derive(Debug, Deserialize)]
struct LanguageSchema {
    languages: Vec<LanguageClass>,
}

#[derive(Debug, Deserialize)]
struct LanguageClass {
    code: String,
    names: Vec<String>,
}

static LANGUAGE_CODES: OnceCell<HashMap<String, String>> = OnceCell::new();

lazy_static! {
    static ref BUILTIN_LANGUAGE_CODES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("Afrikaans", "af");
        m.insert("Albanisch", "sq");
        m.insert("Arabisch", "ar");
        m.insert("Armenisch", "hy");
        m.insert("Aserbaidschanisch", "az");
        m.insert("Baskisch", "eu");
        m.insert("Bosnisch", "bs");
        m.insert("Bretonisch", "br");
        m.insert("Bulgarisch", "bg");
        m.insert("Chinesisch", "zh");
        m.insert("Dänisch", "da");
        m.insert("Englisch", "en");
        m.insert("Esperanto", "eo");
        m.insert("Estnisch", "et");
        m.insert("Färöisch", "fo");
        m.insert("Finnisch", "fi");
        m.insert("Französisch", "fr");
        m.insert("Friesisch", "fy");
        m.insert("Galicisch", "gl");
        m.insert("Georgisch", "ka");
        m.insert("Griechisch (Neu-)", "el");
        m.insert("Neugriechisch", "el");
        m.insert("Altgriechisch", "grc");
        m.insert("Hebräisch", "he");
        m.insert("Hindi", "hi");
        m.insert("Indonesisch", "id");
        m.insert("Interlingua", "ia");
        m.insert("Irisch", "ga");
        m.insert("Isländisch", "is");
        m.insert("Italienisch", "it");
        m.insert("Japanisch", "ja");
        m.insert("Jiddisch", "yi");
        m.insert("Katalanisch", "ca");
        m.insert("Kasachisch", "kk");
        m.insert("Koreanisch", "ko");
        m.insert("Kroatisch", "hr");
        m.insert("Kurdisch", "ku");
        m.insert("Latein", "la");
        m.insert("Lettisch", "lv");
        m.insert("Litauisch", "lt");
        m.insert("Luxemburgisch", "lb");
        m.insert("Mazedonisch", "mk");
        m.insert("Malaiisch", "ms");
        m.insert("Maltesisch", "mt");
        m.insert("Mongolisch", "mn");
        m.insert("Niederländisch", "nl");
        m.insert("Niederdeutsch", "nds");
        m.insert("Norwegisch", "no");
        m.insert("Okzitanisch", "oc");
        m.insert("Persisch", "fa");
        m.insert("Polnisch", "pl");
        m.insert("Portugiesisch", "pt");
        m.insert("Rätoromanisch", "rm");
        m.insert("Rumänisch", "ro");
        m.insert("Russisch", "ru");
        m.insert("Schwedisch", "sv");
        m.insert("Serbisch", "sr");
        m.insert("Serbokroatisch", "sh");
        m.insert("Slowakisch", "sk");
        m.insert("Slowenisch", "sl");
        m.insert("Sorbisch", "wen");
        m.insert("Spanisch", "es");
        m.insert("Suaheli", "sw");
        m.insert("Swahili", "sw");
        m.insert("Thai", "th");
        m.insert("Tschechisch", "cs");
        m.insert("Türkisch", "tr");
        m.insert("Ukrainisch", "uk");
        m.insert("Ungarisch", "hu");
        m.insert("Usbekisch", "uz");
        m.insert("Vietnamesisch", "vi");
        m.insert("Walisisch", "cy");
        m.insert("Weißrussisch", "be");
        m.insert("Belarussisch", "be");
        m
    };
}

/// Look up the code for a language name as it appears in the translation box.
pub fn language_code(name: &str) -> Option<&'static str> {
    match LANGUAGE_CODES.get() {
        Some(codes) => codes.get(name).map(String::as_str),
        None => BUILTIN_LANGUAGE_CODES.get(name).copied(),
    }
}

/// Read a language schema file into a name → code map.
pub fn load_language_schema(schema_path: &Path) -> Result<HashMap<String, String>> {
    let mut contents = String::new();
    File::open(schema_path)?.read_to_string(&mut contents)?;

    let schema: LanguageSchema = serde_yaml::from_str(&contents)?;

    let mut map = HashMap::new();
    for class in schema.languages {
        for name in class.names {
            map.insert(name, class.code.clone());
        }
    }

    Ok(map)
}

/// Replace the built-in table with a schema file.
///
/// With no explicit path, `schema/languages.yaml` is used when it exists and
/// the built-in table stays in effect otherwise.
pub fn init_language_codes(schema_path: Option<&Path>) -> Result<()> {
    let path = match schema_path {
        Some(p) if p.exists() => p.to_path_buf(),
        Some(p) => return Err(ScrapeError::SchemaNotFound(p.to_path_buf())),
        None => {
            let default = PathBuf::from("schema/languages.yaml");
            if !default.exists() {
                debug!("no language schema found, using built-in table");
                return Ok(());
            }
            default
        }
    };

    let map = load_language_schema(&path)?;
    debug!("loaded {} language names from {}", map.len(), path.display());
    LANGUAGE_CODES
        .set(map)
        .map_err(|_| ScrapeError::AlreadyInitialized)
}
