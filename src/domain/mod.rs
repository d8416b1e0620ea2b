pub mod source_type;
pub mod article;
pub mod date;

pub use source_type::SourceType;
pub use article::{escape_html, filter_by_title, ArticleRecord, RawArticle};
pub use date::{DateFormatter, UNKNOWN_DATE};
