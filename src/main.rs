use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

use prensa_corpus::corpus::CorpusStore;
use prensa_corpus::orchestrator::ScraperRegistry;
use prensa_corpus::terms;

/// Harvests newspaper articles matching the given search terms and merges
/// them into the corpus file.
#[derive(Parser, Debug)]
#[command(name = "prensa-corpus", version, about)]
struct Args {
    /// CSV term list with a TERMINOS column, one search term per row
    #[arg(long, value_name = "FILE")]
    terms: Option<PathBuf>,

    /// Inline search term, repeatable; used when no term file is given
    #[arg(long = "term", value_name = "TERM")]
    inline_terms: Vec<String>,

    /// Comma-separated site keys to scrape (default: every registered site)
    #[arg(long, value_delimiter = ',', value_name = "SITE")]
    sites: Vec<String>,

    /// Corpus output file
    #[arg(long, default_value = "articles.json", value_name = "FILE")]
    output: PathBuf,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("prensa_corpus=debug,info")
        .with_target(false)
        .init();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        error!(error = %e, "run aborted");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut search_terms = match &args.terms {
        Some(path) => terms::load_terms(path)?,
        None => args
            .inline_terms
            .iter()
            .map(|t| t.trim().to_lowercase())
            .collect(),
    };
    search_terms.retain(|t| !t.is_empty());
    if search_terms.is_empty() {
        return Err("no search terms given; use --terms <csv> or --term <query>".into());
    }

    let existing = CorpusStore::new(&args.output).load().len();
    let registry = ScraperRegistry::with_default_sites(CorpusStore::new(&args.output))?;

    let sites: Vec<String> = if args.sites.is_empty() {
        registry.site_keys().iter().map(|s| s.to_string()).collect()
    } else {
        args.sites.clone()
    };

    info!(
        sites = sites.len(),
        terms = search_terms.len(),
        existing,
        corpus = %args.output.display(),
        "harvest starting"
    );

    let mut corpus_total = existing;
    let mut tally: Vec<(String, String, usize)> = Vec::new();

    for site in &sites {
        for term in &search_terms {
            match registry.scrape(site, term).await {
                Ok(corpus) => {
                    let new_records = corpus.len() - corpus_total;
                    corpus_total = corpus.len();
                    tally.push((site.clone(), term.clone(), new_records));
                }
                Err(e) => {
                    // A failed term shrinks the yield, never the run
                    error!(site = %site, term = %term, error = %e, "term failed");
                    tally.push((site.clone(), term.clone(), 0));
                }
            }
        }
    }

    for site in &sites {
        let site_total: usize = tally
            .iter()
            .filter(|(s, _, _)| s == site)
            .map(|(_, _, n)| n)
            .sum();
        info!(site = %site, new_records = site_total, "site summary");
        for (_, term, count) in tally.iter().filter(|(s, _, _)| s == site) {
            info!(site = %site, term = %term, new_records = *count, "term summary");
        }
    }

    let grand_total: usize = tally.iter().map(|(_, _, n)| n).sum();
    info!(
        new_records = grand_total,
        corpus_total,
        corpus = %args.output.display(),
        "harvest complete"
    );
    Ok(())
}
