//! Batch scraping of saved MediaWiki `parse` responses.
//!
//! Input is JSONL, one `parse` response per line. Processing is two-phase:
//! - read every page, setting `Flexion:` pages aside by title
//! - scrape the entry pages across `std::thread` workers, joining each with
//!   its conjugation page, and write one record per line in input order

use std::collections::HashMap;
use std::io::{BufRead, BufWriter, Write};
use std::thread;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, warn};

use crate::entry::{InflectionSection, WordEntry};
use crate::error::Result;
use crate::mediawiki::{flexion_title, is_flexion_title, normalize_title, PageContent, ParseResponse};
use crate::scrape_page;

/// Configuration for parallel processing
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// Number of threads to use
    pub num_threads: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        let cpus = thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(4);
        Self { num_threads: cpus }
    }
}

#[derive(Debug, Default)]
pub struct Stats {
    pub lines_read: usize,
    pub malformed: usize,
    pub missing_pages: usize,
    pub flexion_pages: usize,
    pub entries_written: usize,
    pub with_conjugation: usize,
    pub elapsed: Duration,
}

/// Pages of one batch input, entry pages in input order.
#[derive(Debug, Default)]
pub struct LoadedPages {
    pub entries: Vec<PageContent>,
    pub flexion: HashMap<String, PageContent>,
}

impl LoadedPages {
    pub fn flexion_for(&self, entry: &PageContent) -> Option<&PageContent> {
        self.flexion.get(&normalize_title(&flexion_title(&entry.title)))
    }
}

/// Phase 1: read all responses, separating `Flexion:` pages.
pub fn load_pages(reader: impl BufRead, stats: &mut Stats) -> Result<LoadedPages> {
    let mut pages = LoadedPages::default();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        stats.lines_read += 1;

        let response = match ParseResponse::from_json(&line) {
            Ok(response) => response,
            Err(e) => {
                warn!("line {}: {}", line_no + 1, e);
                stats.malformed += 1;
                continue;
            }
        };

        let page = response.into_page("");
        if page.html.is_empty() {
            debug!("line {}: no page content", line_no + 1);
            stats.missing_pages += 1;
            continue;
        }

        if is_flexion_title(&page.title) {
            stats.flexion_pages += 1;
            pages.flexion.insert(normalize_title(&page.title), page);
        } else {
            pages.entries.push(page);
        }
    }

    Ok(pages)
}

/// Phase 2: scrape entry pages across worker threads, preserving order.
pub fn scrape_pages(pages: &LoadedPages, num_threads: usize) -> Vec<WordEntry> {
    if pages.entries.is_empty() {
        return vec![];
    }

    let num_threads = num_threads.min(pages.entries.len()).max(1);
    let chunk_size = pages.entries.len().div_ceil(num_threads);

    thread::scope(|scope| {
        let handles: Vec<_> = pages
            .entries
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|entry| scrape_page(entry, pages.flexion_for(entry)))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut results = Vec::with_capacity(pages.entries.len());
        for handle in handles {
            match handle.join() {
                Ok(chunk_results) => results.extend(chunk_results),
                Err(_) => warn!("worker thread panicked, dropping its chunk"),
            }
        }
        results
    })
}

pub fn process_two_phase<W: Write>(
    reader: impl BufRead,
    writer: &mut BufWriter<W>,
    config: &ParallelConfig,
    limit: Option<usize>,
    quiet: bool,
) -> Result<Stats> {
    let start_time = Instant::now();
    let mut stats = Stats::default();

    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} {msg}")
                .unwrap()
        );
        pb
    };

    pb.set_message("Phase 1: loading pages...");
    let mut pages = load_pages(reader, &mut stats)?;
    if let Some(limit) = limit {
        pages.entries.truncate(limit);
    }

    pb.set_message(format!(
        "Phase 2: scraping {} pages ({} conjugation pages) on {} threads...",
        pages.entries.len(),
        stats.flexion_pages,
        config.num_threads
    ));
    let entries = scrape_pages(&pages, config.num_threads);

    for entry in entries {
        if entry.inflection.as_ref().is_some_and(|i| i.0.values().any(is_table)) {
            stats.with_conjugation += 1;
        }
        let json = serde_json::to_string(&entry)?;
        writeln!(writer, "{}", json)?;
        stats.entries_written += 1;
    }

    writer.flush()?;
    pb.finish_and_clear();
    stats.elapsed = start_time.elapsed();
    Ok(stats)
}

fn is_table(section: &InflectionSection) -> bool {
    matches!(section, InflectionSection::Table(_))
}
