pub mod traits;
pub mod transport;
pub mod fallback;
pub mod note;
pub mod zenn;
pub mod qiita;
pub mod registry;

pub use traits::{ArticleSource, PageOutcome, SourceInfo};
pub use transport::{HttpResponse, HttpTransport, Transport};
pub use registry::SourceRegistry;
