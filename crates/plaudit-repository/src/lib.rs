//! # Plaudit Repository
//!
//! Durable store adapters for article like records.
//!
//! ```text
//! LikeService
//!   ↓  Arc<dyn ArticleLikeRepository>
//! MySqlArticleLikeRepository    (transactional guarded increment, SQLx)
//! MemoryArticleLikeRepository   (versioned compare-and-swap, local/dev)
//! ```
//!
//! Both implementations make "add the user and bump the count" a single
//! atomic operation, so concurrent likes never lose an update and a user's
//! repeated likes collapse into one.

pub mod memory;
pub mod mysql;
pub mod pool;
pub mod traits;

pub use memory::MemoryArticleLikeRepository;
pub use mysql::*;
pub use pool::*;
pub use traits::*;

use plaudit_config::DatabaseConfig;
use plaudit_core::PlauditResult;
use std::sync::Arc;
use tracing::info;

/// Builds the store selected by `config.url`, running migrations for MySQL
/// when enabled.
pub async fn connect_repository(
    config: &DatabaseConfig,
) -> PlauditResult<Arc<dyn ArticleLikeRepository>> {
    if config.is_memory() {
        info!("Using in-memory like store; data will not survive a restart");
        return Ok(Arc::new(MemoryArticleLikeRepository::new()));
    }

    let pool = create_pool(config).await?;
    if config.run_migrations {
        pool.run_migrations().await?;
    }

    Ok(Arc::new(MySqlArticleLikeRepository::new(pool)))
}
