pub mod aggregation_service;
pub mod export_service;

pub use aggregation_service::{
    ArticleAggregator, PaginationPolicy, ProgressObserver, SessionState, SilentObserver,
};
pub use export_service::ExportService;
