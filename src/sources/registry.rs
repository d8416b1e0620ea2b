use std::sync::Arc;

use crate::domain::SourceType;
use crate::errors::{NoteSearchError, NoteSearchResult};
use crate::sources::traits::ArticleSource;
use crate::sources::transport::Transport;
use crate::sources::{note::NoteSource, qiita::QiitaSource, zenn::ZennSource};

pub struct SourceRegistry {
    sources: Vec<Box<dyn ArticleSource>>,
}

impl SourceRegistry {
    /// Registry with every built-in source sharing one transport
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let mut registry = Self::empty();

        // Registration order is the order sources are listed to the user
        registry.register(Box::new(NoteSource::new(transport.clone())));
        registry.register(Box::new(ZennSource::new(transport.clone())));
        registry.register(Box::new(QiitaSource::new(transport)));

        registry
    }

    pub fn empty() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Register a source, replacing any existing one of the same type
    pub fn register(&mut self, source: Box<dyn ArticleSource>) {
        let source_type = source.source_type();
        self.sources.retain(|s| s.source_type() != source_type);
        self.sources.push(source);
    }

    pub fn get(&self, source_type: SourceType) -> NoteSearchResult<&dyn ArticleSource> {
        self.sources
            .iter()
            .find(|s| s.source_type() == source_type)
            .map(|s| s.as_ref())
            .ok_or_else(|| NoteSearchError::UnsupportedSource(source_type.to_string()))
    }

    /// Look a source up by its string key (`note`, `zenn`, `qiita`)
    pub fn get_by_key(&self, key: &str) -> NoteSearchResult<&dyn ArticleSource> {
        let source_type: SourceType = key
            .parse()
            .map_err(|_| NoteSearchError::UnsupportedSource(key.to_string()))?;
        self.get(source_type)
    }

    pub fn sources(&self) -> impl Iterator<Item = &dyn ArticleSource> {
        self.sources.iter().map(|s| s.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::traits::MockArticleSource;
    use crate::sources::transport::MockTransport;

    fn registry() -> SourceRegistry {
        SourceRegistry::new(Arc::new(MockTransport::new()))
    }

    #[test]
    fn test_all_builtin_sources_registered() {
        let registry = registry();
        for source_type in SourceType::ALL {
            assert_eq!(registry.get(source_type).unwrap().source_type(), source_type);
        }
    }

    #[test]
    fn test_listing_order() {
        let keys: Vec<SourceType> = registry().sources().map(|s| s.source_type()).collect();
        assert_eq!(keys, vec![SourceType::Note, SourceType::Zenn, SourceType::Qiita]);
    }

    #[test]
    fn test_get_by_key() {
        let registry = registry();
        assert_eq!(
            registry.get_by_key("Zenn").unwrap().info().display_name,
            "Zenn"
        );
    }

    #[test]
    fn test_unknown_key_is_unsupported() {
        let err = registry().get_by_key("hatena").err().unwrap();
        assert!(matches!(err, NoteSearchError::UnsupportedSource(ref k) if k == "hatena"));
    }

    #[test]
    fn test_missing_source_in_empty_registry() {
        let err = SourceRegistry::empty().get(SourceType::Qiita).err().unwrap();
        assert!(matches!(err, NoteSearchError::UnsupportedSource(_)));
    }

    #[test]
    fn test_register_replaces_same_type() {
        let mut registry = registry();

        let mut replacement = MockArticleSource::new();
        replacement.expect_source_type().return_const(SourceType::Zenn);
        replacement.expect_page_url().returning(|_, _| Ok("mock://zenn".to_string()));
        registry.register(Box::new(replacement));

        assert_eq!(registry.sources().count(), 3);
        assert_eq!(
            registry.get(SourceType::Zenn).unwrap().page_url("a", 1).unwrap(),
            "mock://zenn"
        );
    }
}
