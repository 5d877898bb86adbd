//! MySQL article like repository implementation.

use crate::traits::{ArticleLikeRepository, CreateOutcome, IncrementOutcome};
use crate::DatabasePool;
use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use plaudit_core::{ArticleId, ArticleLikeRecord, PlauditError, PlauditResult, UserId};
use sqlx::{FromRow, MySqlConnection};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// MySQL-backed like store.
///
/// Counters live in `article_likes` and memberships in `article_like_members`,
/// whose `(article_id, user_id)` primary key is the idempotency guard. Each
/// mutation runs in one transaction so the count and the membership set
/// change together or not at all.
#[derive(Clone)]
pub struct MySqlArticleLikeRepository {
    pool: Arc<DatabasePool>,
}

impl MySqlArticleLikeRepository {
    /// Creates a new MySQL article like repository.
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

/// Database row representation of an article counter.
#[derive(Debug, FromRow)]
struct ArticleLikeRow {
    article_id: String,
    like_count: u64,
    last_updated: DateTime<Utc>,
}

impl ArticleLikeRow {
    fn into_record(self, members: Vec<String>) -> PlauditResult<ArticleLikeRecord> {
        let article_id = ArticleId::parse(&self.article_id)
            .map_err(|e| PlauditError::Internal(format!("Invalid article id in database: {}", e)))?;

        let liked_by = members
            .iter()
            .map(|raw| UserId::parse(raw))
            .collect::<PlauditResult<BTreeSet<_>>>()
            .map_err(|e| PlauditError::Internal(format!("Invalid user id in database: {}", e)))?;

        Ok(ArticleLikeRecord {
            article_id,
            like_count: self.like_count,
            liked_by,
            last_updated: self.last_updated,
        })
    }
}

/// MySQL stores microseconds; trimming up front keeps returned records equal
/// to what a later fetch reads back.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

async fn load_record(
    conn: &mut MySqlConnection,
    article_id: &ArticleId,
) -> PlauditResult<Option<ArticleLikeRecord>> {
    let row = sqlx::query_as::<_, ArticleLikeRow>(
        r#"
        SELECT article_id, like_count, last_updated
        FROM article_likes
        WHERE article_id = ?
        "#,
    )
    .bind(article_id.as_str())
    .fetch_optional(&mut *conn)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let members: Vec<String> = sqlx::query_scalar(
        "SELECT user_id FROM article_like_members WHERE article_id = ? ORDER BY user_id",
    )
    .bind(article_id.as_str())
    .fetch_all(&mut *conn)
    .await?;

    row.into_record(members).map(Some)
}

async fn insert_member(
    conn: &mut MySqlConnection,
    article_id: &ArticleId,
    user_id: &UserId,
    at: DateTime<Utc>,
) -> PlauditResult<()> {
    sqlx::query(
        "INSERT INTO article_like_members (article_id, user_id, liked_at) VALUES (?, ?, ?)",
    )
    .bind(article_id.as_str())
    .bind(user_id.as_str())
    .bind(at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

#[async_trait]
impl ArticleLikeRepository for MySqlArticleLikeRepository {
    async fn fetch(&self, article_id: &ArticleId) -> PlauditResult<Option<ArticleLikeRecord>> {
        debug!("Fetching like record for article: {}", article_id);

        // One transaction so the counter and the members come from one snapshot.
        let mut tx = self.pool.inner().begin().await?;
        let record = load_record(&mut tx, article_id).await?;
        tx.commit().await?;

        Ok(record)
    }

    async fn create_if_absent(
        &self,
        article_id: &ArticleId,
        first_user: &UserId,
    ) -> PlauditResult<CreateOutcome> {
        debug!("Creating like record for article: {} (first user {})", article_id, first_user);

        let at = now();
        let mut tx = self.pool.inner().begin().await?;

        let inserted = sqlx::query(
            "INSERT INTO article_likes (article_id, like_count, last_updated) VALUES (?, 1, ?)",
        )
        .bind(article_id.as_str())
        .bind(at)
        .execute(&mut *tx)
        .await;

        if let Err(err) = inserted {
            return match PlauditError::from(err) {
                PlauditError::Conflict(_) => {
                    tx.rollback().await?;
                    debug!("Like record for article {} already exists", article_id);
                    Ok(CreateOutcome::AlreadyExists)
                }
                other => Err(other),
            };
        }

        insert_member(&mut tx, article_id, first_user, at).await?;
        tx.commit().await?;

        Ok(CreateOutcome::Created(ArticleLikeRecord::first_like(
            article_id.clone(),
            first_user.clone(),
            at,
        )))
    }

    async fn conditional_increment(
        &self,
        article_id: &ArticleId,
        user_id: &UserId,
    ) -> PlauditResult<IncrementOutcome> {
        debug!("Conditional increment for article: {} by user {}", article_id, user_id);

        let at = now();
        let mut tx = self.pool.inner().begin().await?;

        // Takes the article row lock; concurrent likes on the article queue here.
        let updated = sqlx::query(
            r#"
            UPDATE article_likes
            SET like_count = like_count + 1, last_updated = ?
            WHERE article_id = ?
            "#,
        )
        .bind(at)
        .bind(article_id.as_str())
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(PlauditError::not_found("Article", article_id));
        }

        match insert_member(&mut tx, article_id, user_id, at).await {
            Ok(()) => {}
            Err(PlauditError::Conflict(_)) => {
                tx.rollback().await?;
                debug!("User {} already liked article {}", user_id, article_id);
                return Ok(IncrementOutcome::AlreadyMember);
            }
            Err(other) => return Err(other),
        }

        let record = load_record(&mut tx, article_id)
            .await?
            .ok_or_else(|| PlauditError::internal("Like record vanished inside its transaction"))?;
        tx.commit().await?;

        Ok(IncrementOutcome::Incremented(record))
    }

    async fn health_check(&self) -> PlauditResult<()> {
        self.pool.health_check().await
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
