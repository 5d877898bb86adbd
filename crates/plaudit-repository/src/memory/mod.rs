//! Process-local like store.
//!
//! Used for local development (`database.url = "memory://"`) and tests. The
//! map has no native "increment unless member" primitive, so the increment is
//! an optimistic compare-and-swap over a versioned copy of the whole record:
//! read the record and its version, check membership, then swap only if the
//! version is unchanged, retrying otherwise.
//!
//! Losers of a swap back off briefly before retrying. An increment that still
//! loses [`MAX_CAS_ATTEMPTS`] times fails with `StoreUnavailable`. With the
//! backoff that means losing every swap for more than 100 ms straight on one
//! article.

use crate::traits::{ArticleLikeRepository, CreateOutcome, IncrementOutcome};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use plaudit_core::{ArticleId, ArticleLikeRecord, PlauditError, PlauditResult, UserId};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

/// Upper bound on compare-and-swap retries for one increment.
pub const MAX_CAS_ATTEMPTS: usize = 128;

/// Retries that only yield before the backoff starts sleeping.
const CAS_YIELD_ATTEMPTS: usize = 4;

/// Sleep unit of the backoff; the sleep grows linearly up to 16 units.
const CAS_BACKOFF_STEP: Duration = Duration::from_micros(50);

/// Pause before retry number `attempt + 1`, or `None` to just yield.
fn cas_backoff(attempt: usize) -> Option<Duration> {
    if attempt <= CAS_YIELD_ATTEMPTS {
        return None;
    }
    let steps = u32::try_from((attempt - CAS_YIELD_ATTEMPTS).min(16)).unwrap_or(16);
    Some(CAS_BACKOFF_STEP * steps)
}

#[derive(Debug, Clone)]
struct Versioned {
    version: u64,
    record: ArticleLikeRecord,
}

/// In-memory like store with versioned compare-and-swap writes.
#[derive(Debug)]
pub struct MemoryArticleLikeRepository {
    records: RwLock<HashMap<ArticleId, Versioned>>,
    available: AtomicBool,
}

impl MemoryArticleLikeRepository {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulates the store going down (`false`) or coming back (`true`).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of article records held.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.records.read().len()
    }

    fn ensure_available(&self) -> PlauditResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(PlauditError::store("memory store is unavailable"))
        }
    }

    fn snapshot(&self, article_id: &ArticleId) -> Option<Versioned> {
        self.records.read().get(article_id).cloned()
    }

    /// Replaces the record if its version still equals `expected`.
    fn compare_and_swap(&self, expected: u64, next: ArticleLikeRecord) -> bool {
        let mut records = self.records.write();
        match records.get_mut(&next.article_id) {
            Some(current) if current.version == expected => {
                current.version += 1;
                current.record = next;
                true
            }
            _ => false,
        }
    }
}

impl Default for MemoryArticleLikeRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArticleLikeRepository for MemoryArticleLikeRepository {
    async fn fetch(&self, article_id: &ArticleId) -> PlauditResult<Option<ArticleLikeRecord>> {
        self.ensure_available()?;
        Ok(self.snapshot(article_id).map(|v| v.record))
    }

    async fn create_if_absent(
        &self,
        article_id: &ArticleId,
        first_user: &UserId,
    ) -> PlauditResult<CreateOutcome> {
        self.ensure_available()?;

        let mut records = self.records.write();
        match records.entry(article_id.clone()) {
            Entry::Occupied(_) => {
                debug!("Like record for article {} already exists", article_id);
                Ok(CreateOutcome::AlreadyExists)
            }
            Entry::Vacant(slot) => {
                let record =
                    ArticleLikeRecord::first_like(article_id.clone(), first_user.clone(), Utc::now());
                slot.insert(Versioned {
                    version: 1,
                    record: record.clone(),
                });
                Ok(CreateOutcome::Created(record))
            }
        }
    }

    async fn conditional_increment(
        &self,
        article_id: &ArticleId,
        user_id: &UserId,
    ) -> PlauditResult<IncrementOutcome> {
        for attempt in 1..=MAX_CAS_ATTEMPTS {
            self.ensure_available()?;

            let current = self
                .snapshot(article_id)
                .ok_or_else(|| PlauditError::not_found("Article", article_id))?;

            let Some(next) = current.record.with_like(user_id, Utc::now()) else {
                return Ok(IncrementOutcome::AlreadyMember);
            };

            if self.compare_and_swap(current.version, next.clone()) {
                return Ok(IncrementOutcome::Incremented(next));
            }

            debug!(
                "Version conflict on article {} (attempt {}), retrying",
                article_id, attempt
            );
            match cas_backoff(attempt) {
                Some(pause) => tokio::time::sleep(pause).await,
                None => tokio::task::yield_now().await,
            }
        }

        warn!("Gave up incrementing article {} after {} attempts", article_id, MAX_CAS_ATTEMPTS);
        Err(PlauditError::store(format!(
            "too much contention on article {}",
            article_id
        )))
    }

    async fn health_check(&self) -> PlauditResult<()> {
        self.ensure_available()
    }
}
