use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::domain::{filter_by_title, ArticleRecord, DateFormatter, SourceType};
use crate::errors::{NoteSearchError, NoteSearchResult};
use crate::sources::{ArticleSource, PageOutcome, SourceRegistry};

/// When to stop asking a source for more pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationPolicy {
    /// A batch shorter than this is taken to be the last page
    pub min_batch_size: usize,
    /// Upper bound on page requests per session
    pub max_pages: u32,
}

impl PaginationPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            min_batch_size: config.min_batch_size,
            max_pages: config.max_pages,
        }
    }

    pub fn should_continue(&self, batch_len: usize) -> bool {
        batch_len > 0 && batch_len >= self.min_batch_size
    }
}

impl Default for PaginationPolicy {
    fn default() -> Self {
        Self {
            min_batch_size: 5,
            max_pages: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Fetching,
    Complete,
    Failed,
}

/// Receives session progress. Every method defaults to doing nothing.
#[cfg_attr(test, mockall::automock)]
pub trait ProgressObserver {
    /// Called after each page with the number of records accumulated so far
    fn on_progress(&self, _source: SourceType, _count: usize) {}

    fn on_complete(&self, _records: &[ArticleRecord]) {}

    fn on_error(&self, _message: &str) {}
}

pub struct SilentObserver;

impl ProgressObserver for SilentObserver {}

#[derive(Debug)]
struct Session {
    generation: u64,
    source: Option<SourceType>,
    state: SessionState,
    records: Vec<ArticleRecord>,
}

/// Drives one source through all of a user's pages and owns the result of
/// the most recent session.
pub struct ArticleAggregator {
    registry: SourceRegistry,
    policy: PaginationPolicy,
    formatter: DateFormatter,
    generation: AtomicU64,
    session: Mutex<Session>,
}

impl ArticleAggregator {
    pub fn new(registry: SourceRegistry, policy: PaginationPolicy, formatter: DateFormatter) -> Self {
        Self {
            registry,
            policy,
            formatter,
            generation: AtomicU64::new(0),
            session: Mutex::new(Session {
                generation: 0,
                source: None,
                state: SessionState::Idle,
                records: Vec::new(),
            }),
        }
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn policy(&self) -> PaginationPolicy {
        self.policy
    }

    /// Fetch every page of `user_id`'s articles from `source_type`.
    ///
    /// An unknown user or an empty listing yields `Ok(vec![])`. Transport and
    /// parse failures abort the session and are returned as errors; records
    /// gathered before the failure are dropped.
    pub fn fetch_all_articles(
        &self,
        source_type: SourceType,
        user_id: &str,
        observer: &dyn ProgressObserver,
    ) -> NoteSearchResult<Vec<ArticleRecord>> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(NoteSearchError::InvalidInput(
                "User ID must not be empty".to_string(),
            ));
        }

        let source = self.registry.get(source_type)?;
        let generation = self.begin_session(source_type)?;
        info!(source = %source_type, user_id, generation, "Starting fetch session");

        let result = self
            .collect_pages(source, user_id, generation, observer)
            .and_then(|records| self.complete_session(generation, records));

        match result {
            Ok(records) => {
                info!(source = %source_type, count = records.len(), "Fetch session complete");
                observer.on_complete(&records);
                Ok(records)
            }
            Err(NoteSearchError::SessionSuperseded(g)) => {
                debug!(generation = g, "Discarding results of superseded session");
                Err(NoteSearchError::SessionSuperseded(g))
            }
            Err(e) => {
                warn!(source = %source_type, error = %e, "Fetch session failed");
                self.fail_session(generation)?;
                observer.on_error(&e.to_string());
                Err(e)
            }
        }
    }

    fn collect_pages(
        &self,
        source: &dyn ArticleSource,
        user_id: &str,
        generation: u64,
        observer: &dyn ProgressObserver,
    ) -> NoteSearchResult<Vec<ArticleRecord>> {
        let source_type = source.source_type();
        let mut records = Vec::new();
        let mut page = 1;

        loop {
            if page > self.policy.max_pages {
                warn!(
                    source = %source_type,
                    max_pages = self.policy.max_pages,
                    "Page limit reached, stopping"
                );
                break;
            }

            // A stale session ends as superseded, whatever the page returned
            let outcome = source.fetch_page(user_id, page);
            self.ensure_current(generation)?;
            let outcome = outcome?;

            let batch = match outcome {
                PageOutcome::Page(batch) => batch,
                PageOutcome::Unavailable { status } => {
                    debug!(source = %source_type, page, status, "Page unavailable, ending listing");
                    break;
                }
            };

            let batch_len = batch.len();
            records.extend(batch.into_iter().map(|mut raw| {
                // Records always belong to the session's source
                raw.service = source_type;
                ArticleRecord::from_raw(raw, &self.formatter)
            }));

            observer.on_progress(source_type, records.len());

            if !self.policy.should_continue(batch_len) {
                debug!(source = %source_type, page, batch_len, "Last page reached");
                break;
            }
            page += 1;
        }

        Ok(records)
    }

    fn lock(&self) -> NoteSearchResult<MutexGuard<'_, Session>> {
        self.session
            .lock()
            .map_err(|e| NoteSearchError::SessionLock(e.to_string()))
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn begin_session(&self, source_type: SourceType) -> NoteSearchResult<u64> {
        let mut session = self.lock()?;
        let generation = self.next_generation();

        session.generation = generation;
        session.source = Some(source_type);
        session.state = SessionState::Fetching;
        session.records.clear();

        Ok(generation)
    }

    fn ensure_current(&self, generation: u64) -> NoteSearchResult<()> {
        if self.generation.load(Ordering::SeqCst) == generation {
            Ok(())
        } else {
            Err(NoteSearchError::SessionSuperseded(generation))
        }
    }

    fn complete_session(
        &self,
        generation: u64,
        records: Vec<ArticleRecord>,
    ) -> NoteSearchResult<Vec<ArticleRecord>> {
        let mut session = self.lock()?;
        if session.generation != generation {
            return Err(NoteSearchError::SessionSuperseded(generation));
        }

        session.state = SessionState::Complete;
        session.records = records.clone();
        Ok(records)
    }

    fn fail_session(&self, generation: u64) -> NoteSearchResult<()> {
        let mut session = self.lock()?;
        if session.generation == generation {
            session.state = SessionState::Failed;
            session.records.clear();
        }
        Ok(())
    }

    /// Make `source_type` the active source. Accumulated records are cleared
    /// and any in-flight session becomes stale.
    pub fn switch_source(&self, source_type: SourceType) -> NoteSearchResult<()> {
        let mut session = self.lock()?;
        session.generation = self.next_generation();
        session.source = Some(source_type);
        session.state = SessionState::Idle;
        session.records.clear();
        Ok(())
    }

    /// Drop accumulated records and return to idle, keeping the active source
    pub fn reset(&self) -> NoteSearchResult<()> {
        let mut session = self.lock()?;
        session.generation = self.next_generation();
        session.state = SessionState::Idle;
        session.records.clear();
        Ok(())
    }

    pub fn state(&self) -> NoteSearchResult<SessionState> {
        Ok(self.lock()?.state)
    }

    pub fn active_source(&self) -> NoteSearchResult<Option<SourceType>> {
        Ok(self.lock()?.source)
    }

    pub fn articles(&self) -> NoteSearchResult<Vec<ArticleRecord>> {
        Ok(self.lock()?.records.clone())
    }

    /// Records of the last completed session whose title contains `query`
    pub fn filter(&self, query: &str) -> NoteSearchResult<Vec<ArticleRecord>> {
        let session = self.lock()?;
        Ok(filter_by_title(&session.records, query)
            .into_iter()
            .cloned()
            .collect())
    }
}
