use tracing::{debug, warn};

use crate::domain::{RawArticle, SourceType};
use crate::errors::NoteSearchResult;
use crate::sources::transport::Transport;

/// Presentation metadata for a source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInfo {
    pub display_name: &'static str,
    pub api_base_url: &'static str,
    pub url_prefix: &'static str,
    pub id_label: &'static str,
    pub placeholder: &'static str,
}

/// Result of one page request that did not fail outright
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// The source answered; an empty batch means there is nothing more
    Page(Vec<RawArticle>),
    /// The source answered with a non-success status
    Unavailable { status: u16 },
}

#[cfg_attr(test, mockall::automock)]
pub trait ArticleSource: Send + Sync {
    /// Identifies this source type
    fn source_type(&self) -> SourceType;

    fn info(&self) -> SourceInfo;

    /// Build the API URL for one page of a user's articles (pages start at 1)
    fn page_url(&self, user_id: &str, page: u32) -> NoteSearchResult<String>;

    /// Map a successful response body into the common article shape
    fn parse_page(&self, user_id: &str, body: &str) -> NoteSearchResult<Vec<RawArticle>>;

    /// Issue exactly one request for the given page
    fn fetch_page(&self, user_id: &str, page: u32) -> NoteSearchResult<PageOutcome>;
}

/// Shared `fetch_page` body: build the URL, make one request, parse on success.
pub(crate) fn fetch_page_via(
    source: &dyn ArticleSource,
    transport: &dyn Transport,
    user_id: &str,
    page: u32,
) -> NoteSearchResult<PageOutcome> {
    let url = source.page_url(user_id, page)?;
    debug!(source = %source.source_type(), page, %url, "Requesting page");

    let response = transport.get(&url)?;
    if !response.is_success() {
        warn!(
            source = %source.source_type(),
            page,
            status = response.status,
            "Source returned a non-success status, treating as end of listing"
        );
        return Ok(PageOutcome::Unavailable {
            status: response.status,
        });
    }

    let articles = source.parse_page(user_id, &response.body)?;
    debug!(source = %source.source_type(), page, count = articles.len(), "Parsed page");

    Ok(PageOutcome::Page(articles))
}
