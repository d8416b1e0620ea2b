use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{error, info};

use crate::domain::{escape_html, ArticleRecord};
use crate::errors::{NoteSearchError, NoteSearchResult};

const BOM: &str = "\u{FEFF}";
const HEADERS: [&str; 4] = ["サービス", "タイトル", "日付", "URL"];

/// Tab-separated listing meant for pasting into a spreadsheet.
/// Fields are written as-is; embedded tabs and newlines are not escaped.
pub fn to_tsv<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a ArticleRecord>,
{
    let mut out = HEADERS.join("\t");
    out.push('\n');

    let rows: Vec<String> = records
        .into_iter()
        .map(|r| {
            format!(
                "{}\t{}\t{}\t{}",
                r.service, r.title, r.formatted_date, r.url
            )
        })
        .collect();
    out.push_str(&rows.join("\n"));

    out
}

/// Wrap a field in double quotes, doubling any quotes inside it
pub fn quote_csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// UTF-8 CSV with a byte-order mark so spreadsheet apps detect the encoding
pub fn to_csv<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a ArticleRecord>,
{
    let mut out = String::from(BOM);
    out.push_str(&HEADERS.join(","));
    out.push('\n');

    let rows: Vec<String> = records
        .into_iter()
        .map(|r| {
            [
                r.service.as_str(),
                r.title.as_str(),
                r.formatted_date.as_str(),
                r.url.as_str(),
            ]
            .iter()
            .map(|field| quote_csv_field(field))
            .collect::<Vec<_>>()
            .join(",")
        })
        .collect();
    out.push_str(&rows.join("\n"));

    out
}

/// Standalone HTML list of links. Titles and URLs are escaped.
pub fn to_html<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a ArticleRecord>,
{
    let mut out = String::from("<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Articles</title></head>\n<body>\n<ul>\n");
    for record in records {
        out.push_str(&format!(
            "<li><span class=\"badge badge-{}\">{}</span> <a href=\"{}\" target=\"_blank\">{}</a> <span class=\"article-date\">{}</span></li>\n",
            record.service,
            record.service,
            escape_html(&record.url),
            record.escaped_title(),
            escape_html(&record.formatted_date),
        ));
    }
    out.push_str("</ul>\n</body>\n</html>\n");
    out
}

pub fn csv_filename(date: NaiveDate) -> String {
    format!("article_list_{}.csv", date.format("%Y-%m-%d"))
}

pub struct ExportService;

impl ExportService {
    /// Write `content` to `path`, logging the outcome
    pub fn write(path: &Path, content: &str) -> NoteSearchResult<()> {
        match fs::write(path, content) {
            Ok(()) => {
                info!(path = %path.display(), bytes = content.len(), "Export written");
                Ok(())
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Export failed");
                Err(NoteSearchError::Export(format!("{}: {}", path.display(), e)))
            }
        }
    }

    /// Write the CSV export into `dir` under the dated file name
    pub fn write_csv(
        dir: &Path,
        records: &[ArticleRecord],
        date: NaiveDate,
    ) -> NoteSearchResult<PathBuf> {
        if records.is_empty() {
            return Err(NoteSearchError::Export("No articles to export".to_string()));
        }

        let path = dir.join(csv_filename(date));
        Self::write(&path, &to_csv(records))?;
        Ok(path)
    }
}
