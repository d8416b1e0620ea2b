use std::io::{self, Write};

use crate::domain::{ArticleRecord, SourceType};
use crate::services::ProgressObserver;

/// Reports fetch progress on stderr so stdout stays clean for exports
pub struct ConsoleProgress;

impl ProgressObserver for ConsoleProgress {
    fn on_progress(&self, source: SourceType, count: usize) {
        eprint!("\rFetching from {}... ({} articles)", source, count);
        io::stderr().flush().ok();
    }

    fn on_complete(&self, records: &[ArticleRecord]) {
        eprintln!("\r{} articles found.{}", records.len(), " ".repeat(24));
    }

    /// The error itself is printed by the caller; only end the progress line
    fn on_error(&self, _message: &str) {
        eprintln!();
    }
}
