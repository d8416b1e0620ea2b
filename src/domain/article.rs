use serde::{Deserialize, Serialize};

use super::date::DateFormatter;
use super::SourceType;

/// A listing entry as returned by a single source adapter, before formatting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawArticle {
    pub title: String,
    pub url: String,
    pub date: Option<String>,
    pub service: SourceType,
}

impl RawArticle {
    pub fn new(service: SourceType, title: String, url: String) -> Self {
        Self {
            title,
            url,
            date: None,
            service,
        }
    }

    pub fn with_date(mut self, date: Option<String>) -> Self {
        self.date = date;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    pub url: String,
    pub date: Option<String>,
    pub formatted_date: String,
    pub service: SourceType,
}

impl ArticleRecord {
    pub fn from_raw(raw: RawArticle, formatter: &DateFormatter) -> Self {
        let formatted_date = formatter.format(raw.date.as_deref());

        Self {
            title: raw.title,
            url: raw.url,
            date: raw.date,
            formatted_date,
            service: raw.service,
        }
    }

    /// Title safe to embed in HTML markup
    pub fn escaped_title(&self) -> String {
        escape_html(&self.title)
    }
}

/// Case-insensitive substring match on titles. An empty query keeps everything.
pub fn filter_by_title<'a>(records: &'a [ArticleRecord], query: &str) -> Vec<&'a ArticleRecord> {
    let query = query.to_lowercase();
    records
        .iter()
        .filter(|record| record.title.to_lowercase().contains(&query))
        .collect()
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
