use std::sync::Arc;

use serde::Deserialize;
use url::Url;

use crate::domain::{RawArticle, SourceType};
use crate::errors::{NoteSearchError, NoteSearchResult};
use crate::sources::fallback::first_present;
use crate::sources::traits::{fetch_page_via, ArticleSource, PageOutcome, SourceInfo};
use crate::sources::transport::Transport;

const API_BASE: &str = "https://qiita.com/api/v2/items";
const SITE: &str = "https://qiita.com";

/// Qiita's maximum page size
pub const PER_PAGE: u32 = 100;

#[derive(Debug, Deserialize)]
struct QiitaItem {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
}

pub struct QiitaSource {
    transport: Arc<dyn Transport>,
}

impl QiitaSource {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    fn to_article(user_id: &str, item: QiitaItem) -> RawArticle {
        let url = first_present(
            &item,
            &[
                &|i: &QiitaItem| i.url.clone(),
                &|i: &QiitaItem| {
                    i.id.as_deref()
                        .filter(|id| !id.is_empty())
                        .map(|id| format!("{}/{}/items/{}", SITE, user_id, id))
                },
            ],
        )
        .unwrap_or_else(|| format!("{}/{}", SITE, user_id));

        let date = first_present(
            &item,
            &[
                &|i: &QiitaItem| i.created_at.clone(),
                &|i: &QiitaItem| i.updated_at.clone(),
            ],
        );

        RawArticle::new(SourceType::Qiita, item.title.unwrap_or_default(), url).with_date(date)
    }
}

impl ArticleSource for QiitaSource {
    fn source_type(&self) -> SourceType {
        SourceType::Qiita
    }

    fn info(&self) -> SourceInfo {
        SourceInfo {
            display_name: "Qiita",
            api_base_url: API_BASE,
            url_prefix: "qiita.com/",
            id_label: "ユーザーID",
            placeholder: "qiita_official",
        }
    }

    fn page_url(&self, user_id: &str, page: u32) -> NoteSearchResult<String> {
        let url = Url::parse_with_params(
            API_BASE,
            &[
                ("query", format!("user:{}", user_id)),
                ("page", page.to_string()),
                ("per_page", PER_PAGE.to_string()),
            ],
        )
        .map_err(|e| NoteSearchError::InvalidUrl(e.to_string()))?;

        Ok(url.into())
    }

    fn parse_page(&self, user_id: &str, body: &str) -> NoteSearchResult<Vec<RawArticle>> {
        // The items endpoint answers with a bare array
        let items: Option<Vec<QiitaItem>> = serde_json::from_str(body)?;

        Ok(items
            .unwrap_or_default()
            .into_iter()
            .map(|item| Self::to_article(user_id, item))
            .collect())
    }

    fn fetch_page(&self, user_id: &str, page: u32) -> NoteSearchResult<PageOutcome> {
        fetch_page_via(self, self.transport.as_ref(), user_id, page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::transport::MockTransport;

    fn source() -> QiitaSource {
        QiitaSource::new(Arc::new(MockTransport::new()))
    }

    #[test]
    fn test_page_url_has_fixed_page_size() {
        assert_eq!(
            source().page_url("qiita_official", 3).unwrap(),
            "https://qiita.com/api/v2/items?query=user%3Aqiita_official&page=3&per_page=100"
        );
    }

    #[test]
    fn test_parse_bare_array() {
        let body = r#"[
            {"id":"c686397e4a0f4f11683d","title":"Example","url":"https://qiita.com/alice/items/c686397e4a0f4f11683d","created_at":"2000-01-01T00:00:00+00:00","likes_count":3},
            {"id":"abc","title":"No url","updated_at":"2001-01-01T00:00:00+00:00"}
        ]"#;

        let articles = source().parse_page("alice", body).unwrap();

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].url, "https://qiita.com/alice/items/c686397e4a0f4f11683d");
        assert_eq!(articles[0].date.as_deref(), Some("2000-01-01T00:00:00+00:00"));
        assert_eq!(articles[1].url, "https://qiita.com/alice/items/abc");
        assert_eq!(articles[1].date.as_deref(), Some("2001-01-01T00:00:00+00:00"));
        assert!(articles.iter().all(|a| a.service == SourceType::Qiita));
    }

    #[test]
    fn test_parse_null_body_is_empty() {
        assert!(source().parse_page("alice", "null").unwrap().is_empty());
        assert!(source().parse_page("alice", "[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_object_body_is_error() {
        let err = source()
            .parse_page("alice", r#"{"message":"Not found","type":"not_found"}"#)
            .unwrap_err();
        assert!(matches!(err, NoteSearchError::ResponseParse(_)));
    }

    #[test]
    fn test_fetch_page_transport_error_propagates() {
        let mut transport = MockTransport::new();
        transport.expect_get().times(1).returning(|_| {
            Err(NoteSearchError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset",
            )))
        });

        let err = QiitaSource::new(Arc::new(transport))
            .fetch_page("alice", 1)
            .unwrap_err();
        assert!(err.to_string().contains("connection reset"));
    }
}
