// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::*;
use paragraph_search::utils::logging::{format_error, format_highlight, format_info, format_warning};
use paragraph_search::{
    Config, Facets, FilterField, MatchMode, PagedResult, Paragraph, ParagraphField,
    SearchCriteria, SearchService, Validator,
};
use std::path::PathBuf;
use tracing::{info, warn};

const PREVIEW_CHARS: usize = 300;

#[derive(Parser)]
#[command(name = "paragraph_search")]
#[command(version = "0.1.0")]
#[command(about = "Search literary paragraphs indexed in Manticore", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the JSON search API
    Serve {
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },

    /// Search paragraphs
    Search {
        /// Search text; may be empty when filtering only
        #[arg(default_value = "")]
        query: String,

        #[arg(short, long)]
        genre: Option<String>,

        #[arg(short, long)]
        author: Option<String>,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(long)]
        fuzzy: bool,

        /// query_string, match, match_phrase, id or source
        #[arg(short, long, default_value = "query_string")]
        matching: MatchMode,

        #[arg(short, long, default_value_t = 1)]
        page: usize,

        #[arg(long)]
        single_line: bool,
    },

    /// List genre, author and title facets of the whole table
    Facets {
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Show the paragraphs of one source around a page
    Context {
        source_uuid: String,

        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },

    /// Show paragraphs by comma-separated ids
    Ids { ids: String },

    /// Show one paragraph
    Paragraph { id: u64 },

    /// Show the paragraphs of a book
    Book {
        book_id: u64,

        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },

    /// Check the connection to Manticore
    Verify,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    paragraph_search::utils::logging::init_logger(cli.color, cli.verbose);
    colored::control::set_override(cli.color);

    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    let service = SearchService::new(&config).context("Failed to create Manticore client")?;

    match cli.command {
        Commands::Serve { bind } => {
            let bind_addr = bind.unwrap_or_else(|| config.server.bind_addr.clone());
            info!("Starting search API on {}", bind_addr);
            paragraph_search::web::serve(service, &bind_addr)
                .await
                .context("Search API server failed")?;
        }
        Commands::Search {
            query,
            genre,
            author,
            title,
            fuzzy,
            matching,
            page,
            single_line,
        } => {
            let mut criteria = SearchCriteria::new(query)
                .with_matching(matching)
                .with_fuzzy(fuzzy);
            for (field, value) in [
                (FilterField::Genre, genre),
                (FilterField::Author, author),
                (FilterField::Title, title),
            ] {
                if let Some(value) = value {
                    criteria = criteria.with_filter(field, value);
                }
            }
            criteria.single_line_mode = single_line;
            cmd_search(&service, &criteria, page).await?;
        }
        Commands::Facets { limit } => {
            let facets = service
                .all_facets()
                .await
                .context("Failed to load facets")?;
            print_facets(&facets, limit);
        }
        Commands::Context { source_uuid, page } => {
            Validator::validate_source_uuid(&source_uuid)?;
            let results = service
                .context(&source_uuid, page)
                .await
                .context("Context lookup failed")?;
            print_page(&results, service.page_size());
        }
        Commands::Ids { ids } => {
            let results = service.by_ids(&ids).await.context("Id lookup failed")?;
            print_page(&results, service.page_size());
        }
        Commands::Paragraph { id } => {
            let paragraph = service
                .paragraph(id)
                .await
                .with_context(|| format!("Failed to load paragraph {}", id))?;
            print_paragraph(&paragraph, 1, usize::MAX, service.page_size());
        }
        Commands::Book { book_id, page } => {
            let first = service
                .book(book_id)
                .await
                .with_context(|| format!("Failed to load book {}", book_id))?;
            println!(
                "\n{} by {}\n",
                first.document.title.bold(),
                first.document.author
            );
            let results = service
                .book_paragraphs(book_id, page)
                .await
                .context("Book listing failed")?;
            print_page(&results, service.page_size());
        }
        Commands::Verify => {
            let report = service.health().await;
            println!("{}", report.format());
            if !report.is_healthy() {
                return Err(anyhow::anyhow!("Manticore is not reachable"));
            }
        }
    }

    Ok(())
}

async fn cmd_search(service: &SearchService, criteria: &SearchCriteria, page: usize) -> Result<()> {
    info!("Searching for: {}", criteria.query);

    let outcome = match service.search(criteria, page).await {
        Ok(outcome) => outcome,
        Err(e) if e.is_user_error() => {
            eprintln!("{}", format_error(&e.to_string()));
            return Ok(());
        }
        Err(e) => return Err(e).context("Search failed"),
    };

    if let Some(notice) = &outcome.notice {
        println!("{}", format_warning(notice));
    }

    if outcome.results.is_empty() {
        println!("\nNo paragraphs found for: \"{}\"\n", criteria.query);
        println!("Try:");
        println!("  - Using different search terms");
        println!("  - Removing genre, author or title filters");
        println!("  - Enabling --fuzzy");
        return Ok(());
    }

    let preview = if criteria.single_line_mode {
        PREVIEW_CHARS
    } else {
        usize::MAX
    };
    print_results(&outcome.results, preview, service.page_size());
    print_facets(&outcome.facets, 5);

    Ok(())
}

fn print_page(results: &PagedResult<Paragraph>, page_size: usize) {
    if results.is_empty() {
        println!("{}", format_info("Nothing found"));
        return;
    }
    print_results(results, usize::MAX, page_size);
}

fn print_results(results: &PagedResult<Paragraph>, preview: usize, page_size: usize) {
    println!("\n{}", results.format_summary());
    println!("{}", "=".repeat(80));

    let first = results.first_position();
    for (idx, paragraph) in results.items.iter().enumerate() {
        print_paragraph(paragraph, first.saturating_add(idx), preview, page_size);
    }

    println!("\n{}", "=".repeat(80));
}

fn print_paragraph(paragraph: &Paragraph, number: usize, preview: usize, page_size: usize) {
    println!(
        "\n{}. {} - {} [{}] (id {}, score {:.0})",
        number,
        format_highlight(paragraph.highlighted(ParagraphField::Author)),
        format_highlight(paragraph.highlighted(ParagraphField::Title)).bold(),
        format_highlight(paragraph.highlighted(ParagraphField::Genre)),
        paragraph.id,
        paragraph.score
    );

    let content = Validator::truncate_text(paragraph.highlighted(ParagraphField::Content), preview);
    for line in content.lines() {
        println!("   {}", format_highlight(line));
    }

    if !paragraph.document.source.is_empty() {
        println!("   Source: {}", paragraph.document.source.dimmed());
    }
    if !paragraph.document.source_uuid.is_empty() {
        println!(
            "   Context: {} page {}",
            paragraph.document.source_uuid,
            paragraph.context_page(page_size)
        );
    }
}

fn print_facets(facets: &Facets, limit: usize) {
    println!("\n{} paragraphs in total", facets.total);
    for field in FilterField::ALL {
        let buckets = facets.buckets(field);
        if buckets.is_empty() {
            continue;
        }
        println!("\n{}:", field.as_str().bold());
        for bucket in buckets.iter().take(limit) {
            let marker = if bucket.active { "*" } else { " " };
            println!("  {} {} ({})", marker, bucket.value, bucket.count);
        }
    }
}
