use std::path::PathBuf;

use thiserror::Error;

/// Failures at the edges of the scraper: reading saved pages, decoding
/// MediaWiki responses, loading the language schema, building API URLs.
///
/// Extraction itself never fails; malformed markup degrades to missing fields.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("error reading input: {0}")]
    Io(#[from] std::io::Error),
    #[error("error decoding MediaWiki response: {0}")]
    Json(#[from] serde_json::Error),
    #[error("error parsing language schema: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid API url: {0}")]
    Url(#[from] url::ParseError),
    #[error("could not find {0}; use --languages to specify a path")]
    SchemaNotFound(PathBuf),
    #[error("language table already initialized")]
    AlreadyInitialized,
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
