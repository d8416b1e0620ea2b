use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use notesearch::cli::{Cli, Commands, ConsoleProgress, OutputFormat};
use notesearch::config::Config;
use notesearch::domain::{ArticleRecord, DateFormatter};
use notesearch::errors::{NoteSearchError, NoteSearchResult};
use notesearch::services::export_service::{to_csv, to_html, to_tsv};
use notesearch::services::{ArticleAggregator, ExportService, PaginationPolicy};
use notesearch::sources::{HttpTransport, SourceRegistry};

fn main() {
    init_tracing();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> NoteSearchResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize source registry
    let transport = Arc::new(HttpTransport::from_config(&config));
    let source_registry = SourceRegistry::new(transport);

    match cli.command {
        Commands::Sources => cmd_sources(&source_registry),
        Commands::Fetch {
            source,
            user_id,
            filter,
            format,
            output,
        } => cmd_fetch(
            source_registry,
            &config,
            &source,
            &user_id,
            filter.as_deref(),
            format,
            output,
        ),
    }
}

fn cmd_sources(source_registry: &SourceRegistry) -> NoteSearchResult<()> {
    println!("Supported sources:\n");
    for source in source_registry.sources() {
        let info = source.info();
        println!("  {} ({})", source.source_type(), info.display_name);
        println!("    Profile: https://{}<{}>", info.url_prefix, info.id_label);
        println!("    API: {}", info.api_base_url);
        println!("    Example ID: {}", info.placeholder);
        println!();
    }
    Ok(())
}

fn cmd_fetch(
    source_registry: SourceRegistry,
    config: &Config,
    source: &str,
    user_id: &str,
    filter: Option<&str>,
    format: OutputFormat,
    output: Option<String>,
) -> NoteSearchResult<()> {
    let source_type = source_registry.get_by_key(source)?.source_type();

    let formatter = DateFormatter::from_offset_hours(config.utc_offset_hours).ok_or_else(|| {
        NoteSearchError::Config(format!("Invalid UTC offset: {}", config.utc_offset_hours))
    })?;
    let aggregator = ArticleAggregator::new(
        source_registry,
        PaginationPolicy::from_config(config),
        formatter,
    );

    let records = aggregator.fetch_all_articles(source_type, user_id, &ConsoleProgress)?;

    if records.is_empty() {
        println!("No articles found. Check that the ID is correct.");
        return Ok(());
    }

    let records = match filter {
        Some(query) => aggregator.filter(query)?,
        None => records,
    };

    if records.is_empty() {
        println!("No articles match the filter.");
        return Ok(());
    }

    match format {
        OutputFormat::Table => print_table(&records),
        OutputFormat::Tsv => emit(output.as_deref(), &to_tsv(&records))?,
        OutputFormat::Html => emit(output.as_deref(), &to_html(&records))?,
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&records)
                .map_err(|e| NoteSearchError::Export(e.to_string()))?;
            emit(output.as_deref(), &json)?
        }
        OutputFormat::Csv => {
            let path = match output {
                Some(path) => {
                    let path = PathBuf::from(path);
                    ExportService::write(&path, &to_csv(&records))?;
                    path
                }
                None => ExportService::write_csv(Path::new("."), &records, Local::now().date_naive())?,
            };
            println!("Exported {} articles to {}", records.len(), path.display());
        }
    }

    Ok(())
}

/// Print to stdout, or write to a file when a path is given
fn emit(output: Option<&str>, content: &str) -> NoteSearchResult<()> {
    match output {
        Some(path) => {
            ExportService::write(Path::new(path), content)?;
            println!("Exported to {}", path);
        }
        None => println!("{}", content),
    }
    Ok(())
}

fn print_table(records: &[ArticleRecord]) {
    for record in records {
        println!("[{}] {}", record.service, strip_control(&record.title));
        println!("    {}  {}", record.formatted_date, strip_control(&record.url));
    }
    println!("\n{} articles", records.len());
}

/// Titles and URLs come from third parties; keep them from driving the terminal
fn strip_control(text: &str) -> String {
    text.chars().filter(|c| !c.is_control()).collect()
}
