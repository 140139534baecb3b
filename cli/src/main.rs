use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use docsearch_core::corpus::load_directory;
use docsearch_core::{DocId, RankingMethod, SearchEngine};
use std::collections::BTreeSet;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "docsearch")]
#[command(about = "Search a directory of text documents", long_about = None)]
struct Cli {
    /// Directory of .txt documents
    #[arg(long, global = true, default_value = "./documents")]
    dir: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Documents whose title contains any query term
    Title { query: String },
    /// Documents whose content contains any query term
    Content { query: String },
    /// Documents ranked by relevance to the query
    Rank {
        #[arg(long, value_enum, default_value_t = Method::TfIdf)]
        method: Method,
        query: String,
    },
    /// Menu-driven search over the loaded corpus
    Interactive,
}

#[derive(Clone, Copy, ValueEnum)]
enum Method {
    Keyword,
    TfIdf,
    Cosine,
}

impl From<Method> for RankingMethod {
    fn from(m: Method) -> Self {
        match m {
            Method::Keyword => RankingMethod::KeywordMatching,
            Method::TfIdf => RankingMethod::TfIdf,
            Method::Cosine => RankingMethod::CosineSimilarity,
        }
    }
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();

    let mut engine = SearchEngine::new();
    load_directory(&mut engine, &cli.dir)?;

    match cli.command {
        Commands::Title { query } => print_matches(&engine, &query, &engine.search_by_title(&query)),
        Commands::Content { query } => print_matches(&engine, &query, &engine.search_by_content(&query)),
        Commands::Rank { method, query } => print_ranked(&engine, &engine.rank(&query, method.into())),
        Commands::Interactive => return interactive(&engine),
    }
    Ok(())
}

fn title_of(engine: &SearchEngine, doc_id: DocId) -> &str {
    engine.get_document(doc_id).map(|d| d.title.as_str()).unwrap_or("<unknown>")
}

fn print_matches(engine: &SearchEngine, query: &str, ids: &BTreeSet<DocId>) {
    if ids.is_empty() {
        println!("No documents found containing '{query}'.");
        return;
    }
    println!("Documents containing '{query}':");
    for &doc_id in ids {
        println!("Document ID {doc_id}: {}", title_of(engine, doc_id));
    }
}

fn print_ranked(engine: &SearchEngine, ranked: &[(DocId, f64)]) {
    if ranked.is_empty() {
        println!("No documents found for the query.");
        return;
    }
    for (doc_id, score) in ranked {
        println!("Document ID {doc_id}: {} - Relevance Score: {score:.4}", title_of(engine, *doc_id));
    }
}

fn interactive(engine: &SearchEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        println!("\n--- Document Search ({} documents) ---", engine.len());
        println!("1. Search by Title");
        println!("2. Search by Content");
        println!("3. Ranked Search (TF-IDF)");
        println!("4. Exit");

        let Some(choice) = prompt(&mut lines, "Choose an option: ")? else { break };
        match choice.trim() {
            "1" | "2" | "3" => {
                let Some(query) = prompt(&mut lines, "Enter your query: ")? else { break };
                match choice.trim() {
                    "1" => print_matches(engine, &query, &engine.search_by_title(&query)),
                    "2" => print_matches(engine, &query, &engine.search_by_content(&query)),
                    _ => print_ranked(engine, &engine.ranked_search(&query)),
                }
            }
            "4" => {
                println!("Exiting...");
                break;
            }
            _ => println!("Invalid choice. Please try again."),
        }
    }
    Ok(())
}

/// `None` once stdin is closed.
fn prompt<I>(lines: &mut I, message: &str) -> Result<Option<String>>
where
    I: Iterator<Item = io::Result<String>>,
{
    print!("{message}");
    io::stdout().flush()?;
    Ok(lines.next().transpose()?)
}
