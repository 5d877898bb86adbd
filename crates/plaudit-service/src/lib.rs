//! # Plaudit Service
//!
//! The like engine: read-through and write-through caching of like counts in
//! front of the durable like store.

pub mod cache;
pub mod dto;
pub mod r#impl;
pub mod like_service;

pub use cache::*;
pub use dto::*;
pub use like_service::*;
pub use r#impl::{CachePolicy, LikeServiceImpl};

#[cfg(test)]
pub(crate) mod test_support {
    //! In-process doubles shared by the unit tests.

    use crate::cache::CacheInterface;
    use async_trait::async_trait;
    use plaudit_core::{ArticleId, ArticleLikeRecord, PlauditResult, UserId};
    use plaudit_repository::{
        ArticleLikeRepository, CreateOutcome, IncrementOutcome, MemoryArticleLikeRepository,
    };
    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::Notify;

    /// Cache backend that records values together with their TTL.
    #[derive(Default)]
    pub struct MapCache {
        entries: Mutex<HashMap<String, (String, Option<Duration>)>>,
    }

    impl MapCache {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn insert(&self, key: &str, value: &str) {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), (value.to_string(), None));
        }

        pub fn entry(&self, key: &str) -> Option<(String, Option<Duration>)> {
            self.entries.lock().unwrap().get(key).cloned()
        }

        pub fn len(&self) -> usize {
            self.entries.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CacheInterface for MapCache {
        async fn get_raw(&self, key: &str) -> PlauditResult<Option<String>> {
            Ok(self.entries.lock().unwrap().get(key).map(|(v, _)| v.clone()))
        }

        async fn set_raw_if_absent(
            &self,
            key: &str,
            value: &str,
            ttl: Option<Duration>,
        ) -> PlauditResult<bool> {
            let mut entries = self.entries.lock().unwrap();
            if entries.contains_key(key) {
                return Ok(false);
            }
            entries.insert(key.to_string(), (value.to_string(), ttl));
            Ok(true)
        }

        async fn set_counter_if_greater(
            &self,
            key: &str,
            value: u64,
            ttl: Option<Duration>,
        ) -> PlauditResult<bool> {
            let mut entries = self.entries.lock().unwrap();
            let current = entries.get(key).and_then(|(v, _)| v.parse::<u64>().ok());
            if current.is_some_and(|current| current >= value) {
                return Ok(false);
            }
            entries.insert(key.to_string(), (value.to_string(), ttl));
            Ok(true)
        }

        async fn delete(&self, key: &str) -> PlauditResult<bool> {
            Ok(self.entries.lock().unwrap().remove(key).is_some())
        }

        fn is_enabled(&self) -> bool {
            true
        }
    }

    /// Cache that parks every populate until the test releases it, so a
    /// like can complete between a reader's store fetch and its cache fill.
    #[derive(Default)]
    pub struct GatedCache {
        inner: MapCache,
        arrived: Notify,
        release: Notify,
    }

    impl GatedCache {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn entry(&self, key: &str) -> Option<(String, Option<Duration>)> {
            self.inner.entry(key)
        }

        /// Waits until a populate is parked.
        pub async fn wait_for_populate(&self) {
            self.arrived.notified().await;
        }

        /// Lets the parked populate through.
        pub fn release_populate(&self) {
            self.release.notify_one();
        }
    }

    #[async_trait]
    impl CacheInterface for GatedCache {
        async fn get_raw(&self, key: &str) -> PlauditResult<Option<String>> {
            self.inner.get_raw(key).await
        }

        async fn set_raw_if_absent(
            &self,
            key: &str,
            value: &str,
            ttl: Option<Duration>,
        ) -> PlauditResult<bool> {
            self.arrived.notify_one();
            self.release.notified().await;
            self.inner.set_raw_if_absent(key, value, ttl).await
        }

        async fn set_counter_if_greater(
            &self,
            key: &str,
            value: u64,
            ttl: Option<Duration>,
        ) -> PlauditResult<bool> {
            self.inner.set_counter_if_greater(key, value, ttl).await
        }

        async fn delete(&self, key: &str) -> PlauditResult<bool> {
            self.inner.delete(key).await
        }

        fn is_enabled(&self) -> bool {
            true
        }
    }

    /// Memory store that counts reads and can replay stale `fetch` results,
    /// which is how a racing writer looks from the engine's side.
    #[derive(Default)]
    pub struct ScriptedRepository {
        inner: MemoryArticleLikeRepository,
        stale_fetches: Mutex<VecDeque<Option<ArticleLikeRecord>>>,
        fetch_calls: AtomicUsize,
    }

    impl ScriptedRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn inner(&self) -> &MemoryArticleLikeRepository {
            &self.inner
        }

        /// Makes the next `fetch` return `record` instead of the live value.
        pub fn push_fetch(&self, record: Option<ArticleLikeRecord>) {
            self.stale_fetches.lock().unwrap().push_back(record);
        }

        pub fn fetch_calls(&self) -> usize {
            self.fetch_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ArticleLikeRepository for ScriptedRepository {
        async fn fetch(&self, article_id: &ArticleId) -> PlauditResult<Option<ArticleLikeRecord>> {
            self.fetch_calls.fetch_add(1, Ordering::SeqCst);
            let stale = self.stale_fetches.lock().unwrap().pop_front();
            match stale {
                Some(record) => Ok(record),
                None => self.inner.fetch(article_id).await,
            }
        }

        async fn create_if_absent(
            &self,
            article_id: &ArticleId,
            first_user: &UserId,
        ) -> PlauditResult<CreateOutcome> {
            self.inner.create_if_absent(article_id, first_user).await
        }

        async fn conditional_increment(
            &self,
            article_id: &ArticleId,
            user_id: &UserId,
        ) -> PlauditResult<IncrementOutcome> {
            self.inner.conditional_increment(article_id, user_id).await
        }

        async fn health_check(&self) -> PlauditResult<()> {
            self.inner.health_check().await
        }
    }
}
