use std::sync::Arc;

use serde::Deserialize;
use url::Url;

use crate::domain::{RawArticle, SourceType};
use crate::errors::{NoteSearchError, NoteSearchResult};
use crate::sources::fallback::first_present;
use crate::sources::traits::{fetch_page_via, ArticleSource, PageOutcome, SourceInfo};
use crate::sources::transport::Transport;

const API_BASE: &str = "https://note.com/api/v2/creators/";
const SITE: &str = "https://note.com";

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    #[serde(default)]
    data: Option<ContentsData>,
}

#[derive(Debug, Deserialize)]
struct ContentsData {
    #[serde(default)]
    contents: Option<Vec<NoteItem>>,
}

#[derive(Debug, Deserialize)]
struct NoteItem {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "noteUrl")]
    note_url_camel: Option<String>,
    #[serde(default)]
    note_full_url: Option<String>,
    #[serde(default)]
    key: Option<String>,
    #[serde(default, rename = "publishAt")]
    publish_at_camel: Option<String>,
    #[serde(default)]
    publish_at: Option<String>,
    #[serde(default)]
    status_publish_at: Option<String>,
}

pub struct NoteSource {
    transport: Arc<dyn Transport>,
}

impl NoteSource {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    fn to_article(user_id: &str, item: NoteItem) -> RawArticle {
        let url = first_present(
            &item,
            &[
                &|i: &NoteItem| i.note_url_camel.clone(),
                &|i: &NoteItem| i.note_full_url.clone(),
                &|i: &NoteItem| {
                    i.key
                        .as_deref()
                        .filter(|k| !k.is_empty())
                        .map(|k| format!("{}/{}/n/{}", SITE, user_id, k))
                },
            ],
        )
        .unwrap_or_else(|| format!("{}/{}", SITE, user_id));

        let date = first_present(
            &item,
            &[
                &|i: &NoteItem| i.publish_at_camel.clone(),
                &|i: &NoteItem| i.publish_at.clone(),
                &|i: &NoteItem| i.status_publish_at.clone(),
            ],
        );

        RawArticle::new(SourceType::Note, item.name.unwrap_or_default(), url).with_date(date)
    }
}

impl ArticleSource for NoteSource {
    fn source_type(&self) -> SourceType {
        SourceType::Note
    }

    fn info(&self) -> SourceInfo {
        SourceInfo {
            display_name: "note",
            api_base_url: API_BASE,
            url_prefix: "note.com/",
            id_label: "note ID",
            placeholder: "iitomo3",
        }
    }

    fn page_url(&self, user_id: &str, page: u32) -> NoteSearchResult<String> {
        let mut url = Url::parse(API_BASE).map_err(|e| NoteSearchError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| NoteSearchError::InvalidUrl(API_BASE.to_string()))?
            .pop_if_empty()
            .push(user_id)
            .push("contents");
        url.query_pairs_mut()
            .append_pair("kind", "note")
            .append_pair("page", &page.to_string());

        Ok(url.into())
    }

    fn parse_page(&self, user_id: &str, body: &str) -> NoteSearchResult<Vec<RawArticle>> {
        let response: ContentsResponse = serde_json::from_str(body)?;
        let items = response
            .data
            .and_then(|d| d.contents)
            .unwrap_or_default();

        Ok(items
            .into_iter()
            .map(|item| Self::to_article(user_id, item))
            .collect())
    }

    fn fetch_page(&self, user_id: &str, page: u32) -> NoteSearchResult<PageOutcome> {
        fetch_page_via(self, self.transport.as_ref(), user_id, page)
    }
}
