use crate::domain::error::DomainError;
use crate::domain::like::Like;
use crate::domain::user::User;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, error};
use uuid::Uuid;

#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Flips membership of `user_id` in the like set of `post_id`.
    /// Returns true when the like exists afterwards.
    async fn toggle(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, DomainError>;
    /// Users who like a post, in the order they liked it.
    async fn likers(&self, post_id: Uuid) -> Result<Vec<User>, DomainError>;
    async fn likers_for_posts(&self, post_ids: &[Uuid]) -> Result<Vec<(Uuid, User)>, DomainError>;
}

#[derive(Clone)]
pub struct PostgresLikeRepository {
    pool: PgPool,
}

impl PostgresLikeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct LikerRow {
    post_id: Uuid,
    #[sqlx(flatten)]
    user: User,
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    error!("{}: {}", context, e);
    DomainError::Internal(format!("database error: {}", e))
}

#[async_trait]
impl LikeRepository for PostgresLikeRepository {
    async fn toggle(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("failed to open like transaction", e))?;

        let removed = sqlx::query("DELETE FROM post_user_likes WHERE post_id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("failed to remove like", e))?
            .rows_affected();

        if removed == 0 {
            // the primary key settles two concurrent inserts of the same pair
            let like = Like::new(post_id, user_id);
            sqlx::query(
                r#"
                INSERT INTO post_user_likes (post_id, user_id, created_at)
                VALUES ($1, $2, $3)
                ON CONFLICT (post_id, user_id) DO NOTHING
                "#,
            )
            .bind(like.post_id)
            .bind(like.user_id)
            .bind(like.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("failed to insert like", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| db_error("failed to commit like toggle", e))?;

        let liked = removed == 0;
        debug!(post_id = %post_id, user_id = %user_id, liked, "like toggled");
        Ok(liked)
    }

    async fn likers(&self, post_id: Uuid) -> Result<Vec<User>, DomainError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.name, u.email, u.password_hash, u.created_at
            FROM post_user_likes l
            JOIN users u ON u.id = l.user_id
            WHERE l.post_id = $1
            ORDER BY l.created_at, u.id
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("failed to load likes", e))
    }

    async fn likers_for_posts(&self, post_ids: &[Uuid]) -> Result<Vec<(Uuid, User)>, DomainError> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, LikerRow>(
            r#"
            SELECT l.post_id, u.id, u.name, u.email, u.password_hash, u.created_at
            FROM post_user_likes l
            JOIN users u ON u.id = l.user_id
            WHERE l.post_id = ANY($1)
            ORDER BY l.created_at, u.id
            "#,
        )
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("failed to load likes", e))?;

        Ok(rows.into_iter().map(|row| (row.post_id, row.user)).collect())
    }
}
