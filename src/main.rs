use bzip2::read::BzDecoder;
use clap::Parser;
use dewiktionary_scraper::languages::init_language_codes;
use dewiktionary_scraper::mediawiki::{flexion_title, ParseResponse};
use dewiktionary_scraper::parallel::{process_two_phase, ParallelConfig, Stats};
use dewiktionary_scraper::{scrape_page, PageContent, Result, WordEntry};
use log::info;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "dewiktionary-scraper")]
#[command(about = "Scrape German Wiktionary entry pages into structured JSON records")]
struct Args {
    /// Input page: raw HTML, a MediaWiki parse response (.json),
    /// or a batch of parse responses (.jsonl or .jsonl.bz2)
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Conjugation page (`Flexion:<word>`) for a single input, HTML or .json
    #[arg(long)]
    flexion: Option<PathBuf>,

    /// Headword for raw HTML input (default: file stem)
    #[arg(long)]
    title: Option<String>,

    /// Page id for raw HTML input
    #[arg(long, default_value = "")]
    page_id: String,

    /// Pretty-print a single record
    #[arg(long)]
    pretty: bool,

    /// Number of threads for batch input (0 = auto-detect)
    #[arg(short, long, default_value_t = 0)]
    threads: usize,

    /// Limit number of entry pages to scrape from a batch (for testing)
    #[arg(long)]
    limit: Option<usize>,

    /// Path to language schema YAML file (default: schema/languages.yaml if present)
    #[arg(long)]
    languages: Option<PathBuf>,

    /// Quiet mode - minimal output
    #[arg(short, long)]
    quiet: bool,
}

fn is_batch(path: &Path) -> bool {
    let name = path.to_string_lossy();
    name.ends_with(".jsonl") || name.ends_with(".bz2")
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Read one page from disk, either a parse response or raw HTML.
fn read_page(path: &Path, title: Option<&str>, page_id: &str) -> Result<PageContent> {
    let contents = fs::read_to_string(path)?;
    if is_json(path) {
        return Ok(ParseResponse::from_json(&contents)?.into_page(page_id));
    }

    let title = title.map(str::to_string).unwrap_or_else(|| {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    Ok(PageContent { title, page_id: page_id.to_string(), html: contents })
}

fn open_output(path: Option<&PathBuf>) -> Result<BufWriter<Box<dyn Write>>> {
    let sink: Box<dyn Write> = match path {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    };
    Ok(BufWriter::with_capacity(256 * 1024, sink))
}

fn write_record(writer: &mut impl Write, entry: &WordEntry, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(entry)?
    } else {
        serde_json::to_string(entry)?
    };
    writeln!(writer, "{}", json)?;
    writer.flush()?;
    Ok(())
}

fn print_stats(stats: &Stats) {
    eprintln!();
    eprintln!("============================================================");
    eprintln!("Lines read: {}", stats.lines_read);
    eprintln!("Malformed lines: {}", stats.malformed);
    eprintln!("Pages without content: {}", stats.missing_pages);
    eprintln!("Conjugation pages: {}", stats.flexion_pages);
    eprintln!("Entries written: {}", stats.entries_written);
    eprintln!("With conjugation tables: {}", stats.with_conjugation);
    eprintln!("Time: {}m {}s", stats.elapsed.as_secs() / 60, stats.elapsed.as_secs() % 60);
    eprintln!(
        "Rate: {:.0} pages/sec",
        stats.entries_written as f64 / stats.elapsed.as_secs_f64().max(f64::EPSILON)
    );
    eprintln!("============================================================");
}

fn run_batch(args: &Args) -> Result<()> {
    let mut config = ParallelConfig::default();
    if args.threads > 0 {
        config.num_threads = args.threads;
    }

    if !args.quiet {
        eprintln!("Scraping: {}", args.input.display());
        if let Some(output) = &args.output {
            eprintln!("Output: {}", output.display());
        }
        eprintln!("Threads: {}", config.num_threads);
        if let Some(limit) = args.limit {
            eprintln!("Limit: {} entries", limit);
        }
        eprintln!();
    }

    let file = File::open(&args.input)?;
    let reader: Box<dyn BufRead> = if args.input.to_string_lossy().ends_with(".bz2") {
        Box::new(BufReader::with_capacity(256 * 1024, BzDecoder::new(file)))
    } else {
        Box::new(BufReader::with_capacity(256 * 1024, file))
    };
    let mut writer = open_output(args.output.as_ref())?;

    let stats = process_two_phase(reader, &mut writer, &config, args.limit, args.quiet)?;

    if !args.quiet {
        print_stats(&stats);
    }
    Ok(())
}

fn run_single(args: &Args) -> Result<()> {
    let page = read_page(&args.input, args.title.as_deref(), &args.page_id)?;

    let flexion = match &args.flexion {
        Some(path) => {
            let title = flexion_title(&page.title);
            Some(read_page(path, Some(title.as_str()), "")?)
        }
        None => None,
    };
    info!("scraping {:?} (conjugation page: {})", page.title, flexion.is_some());

    let entry = scrape_page(&page, flexion.as_ref());
    let mut writer = open_output(args.output.as_ref())?;
    write_record(&mut writer, &entry, args.pretty)
}

fn run(args: &Args) -> Result<()> {
    init_language_codes(args.languages.as_deref())?;

    if is_batch(&args.input) {
        run_batch(args)
    } else {
        run_single(args)
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
