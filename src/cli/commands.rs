use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "notesearch")]
#[command(about = "Fetch, filter and export article listings from note, Zenn and Qiita")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable list
    Table,
    /// Tab-separated, for pasting into a spreadsheet
    Tsv,
    /// Comma-separated file with a UTF-8 byte-order mark
    Csv,
    /// JSON array of article records
    Json,
    /// HTML list of links
    Html,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List supported sources
    Sources,

    /// Fetch every article a user has published on a source
    Fetch {
        /// Source key: note, zenn or qiita
        source: String,

        /// User ID on that source
        user_id: String,

        /// Only keep articles whose title contains this text (case-insensitive)
        #[arg(short, long)]
        filter: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Output file path (csv defaults to article_list_<date>.csv, others print to stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}
