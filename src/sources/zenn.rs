use std::sync::Arc;

use serde::Deserialize;
use url::Url;

use crate::domain::{RawArticle, SourceType};
use crate::errors::{NoteSearchError, NoteSearchResult};
use crate::sources::fallback::first_present;
use crate::sources::traits::{fetch_page_via, ArticleSource, PageOutcome, SourceInfo};
use crate::sources::transport::Transport;

const API_BASE: &str = "https://zenn.dev/api/articles";
const SITE: &str = "https://zenn.dev";

#[derive(Debug, Deserialize)]
struct ArticlesResponse {
    #[serde(default)]
    articles: Option<Vec<ZennArticle>>,
}

#[derive(Debug, Deserialize)]
struct ZennArticle {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default)]
    body_updated_at: Option<String>,
}

pub struct ZennSource {
    transport: Arc<dyn Transport>,
}

impl ZennSource {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    fn to_article(user_id: &str, item: ZennArticle) -> RawArticle {
        let url = first_present(
            &item,
            &[
                &|a: &ZennArticle| {
                    a.path
                        .as_deref()
                        .filter(|p| !p.is_empty())
                        .map(|p| format!("{}{}", SITE, p))
                },
                &|a: &ZennArticle| {
                    a.slug
                        .as_deref()
                        .filter(|s| !s.is_empty())
                        .map(|s| format!("{}/{}/articles/{}", SITE, user_id, s))
                },
            ],
        )
        .unwrap_or_else(|| format!("{}/{}", SITE, user_id));

        let date = first_present(
            &item,
            &[
                &|a: &ZennArticle| a.published_at.clone(),
                &|a: &ZennArticle| a.body_updated_at.clone(),
            ],
        );

        RawArticle::new(SourceType::Zenn, item.title.unwrap_or_default(), url).with_date(date)
    }
}

impl ArticleSource for ZennSource {
    fn source_type(&self) -> SourceType {
        SourceType::Zenn
    }

    fn info(&self) -> SourceInfo {
        SourceInfo {
            display_name: "Zenn",
            api_base_url: API_BASE,
            url_prefix: "zenn.dev/",
            id_label: "ユーザー名",
            placeholder: "zenn_official",
        }
    }

    fn page_url(&self, user_id: &str, page: u32) -> NoteSearchResult<String> {
        let url = Url::parse_with_params(
            API_BASE,
            &[
                ("username", user_id),
                ("order", "latest"),
                ("page", &page.to_string()),
            ],
        )
        .map_err(|e| NoteSearchError::InvalidUrl(e.to_string()))?;

        Ok(url.into())
    }

    fn parse_page(&self, user_id: &str, body: &str) -> NoteSearchResult<Vec<RawArticle>> {
        let response: ArticlesResponse = serde_json::from_str(body)?;

        Ok(response
            .articles
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
    use crate::sources::transport::{HttpResponse, MockTransport};

    fn source() -> ZennSource {
        ZennSource::new(Arc::new(MockTransport::new()))
    }

    #[test]
    fn test_page_url() {
        assert_eq!(
            source().page_url("zenn_official", 1).unwrap(),
            "https://zenn.dev/api/articles?username=zenn_official&order=latest&page=1"
        );
    }

    #[test]
    fn test_parse_prefixes_path() {
        let body = r#"{"articles":[{
            "id": 1,
            "title": "Rustで書くCLI",
            "slug": "abc123",
            "path": "/alice/articles/abc123",
            "published_at": "2024-02-10T12:00:00.000+09:00"
        }],"next_page":null}"#;

        let articles = source().parse_page("alice", body).unwrap();

        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Rustで書くCLI");
        assert_eq!(articles[0].url, "https://zenn.dev/alice/articles/abc123");
        assert_eq!(articles[0].date.as_deref(), Some("2024-02-10T12:00:00.000+09:00"));
        assert_eq!(articles[0].service, SourceType::Zenn);
    }

    #[test]
    fn test_parse_synthesizes_url_from_slug() {
        let body = r#"{"articles":[{"title":"No path","slug":"xyz","body_updated_at":"2023-01-01T00:00:00Z"}]}"#;

        let articles = source().parse_page("alice", body).unwrap();

        assert_eq!(articles[0].url, "https://zenn.dev/alice/articles/xyz");
        assert_eq!(articles[0].date.as_deref(), Some("2023-01-01T00:00:00Z"));
    }

    #[test]
    fn test_parse_without_articles_is_empty() {
        assert!(source().parse_page("alice", r#"{"next_page":null}"#).unwrap().is_empty());
    }

    #[test]
    fn test_fetch_page_server_error_is_unavailable() {
        let mut transport = MockTransport::new();
        transport
            .expect_get()
            .times(1)
            .returning(|_| Ok(HttpResponse::new(503, "")));

        let outcome = ZennSource::new(Arc::new(transport)).fetch_page("alice", 4).unwrap();
        assert_eq!(outcome, PageOutcome::Unavailable { status: 503 });
    }
}
