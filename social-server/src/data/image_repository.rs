use crate::domain::error::DomainError;
use crate::domain::image::Image;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

#[async_trait]
pub trait ImageRepository: Send + Sync {
    async fn create(&self, image: Image) -> Result<Image, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Image>, DomainError>;
    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Image>, DomainError>;
    /// A `None` body keeps the current caption.
    async fn update(
        &self,
        id: Uuid,
        body: Option<String>,
        image: String,
    ) -> Result<Option<Image>, DomainError>;
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}

#[derive(Clone)]
pub struct PostgresImageRepository {
    pool: PgPool,
}

impl PostgresImageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImageRepository for PostgresImageRepository {
    async fn create(&self, image: Image) -> Result<Image, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO images (id, user_id, body, image, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(image.id)
        .bind(image.user_id)
        .bind(&image.body)
        .bind(&image.image)
        .bind(image.created_at)
        .bind(image.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create image: {}", e);
            DomainError::Internal(format!("database error: {}", e))
        })?;

        info!(image_id = %image.id, user_id = %image.user_id, "image created");
        Ok(image)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Image>, DomainError> {
        sqlx::query_as::<_, Image>(
            r#"
            SELECT id, user_id, body, image, created_at, updated_at
            FROM images WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("db error find_by_id {}: {}", id, e);
            DomainError::Internal(e.to_string())
        })
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Image>, DomainError> {
        sqlx::query_as::<_, Image>(
            r#"
            SELECT id, user_id, body, image, created_at, updated_at
            FROM images
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching images of {}: {}", user_id, e);
            DomainError::Internal(e.to_string())
        })
    }

    async fn update(
        &self,
        id: Uuid,
        body: Option<String>,
        image: String,
    ) -> Result<Option<Image>, DomainError> {
        let updated = sqlx::query_as::<_, Image>(
            r#"
            UPDATE images
            SET
                body = COALESCE($1, body),
                image = $2,
                updated_at = $3
            WHERE id = $4
            RETURNING id, user_id, body, image, created_at, updated_at
            "#,
        )
        .bind(body)
        .bind(image)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to update image {}: {}", id, e);
            DomainError::Internal(e.to_string())
        })?;

        if updated.is_some() {
            info!(image_id = %id, "image updated");
        }

        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let deleted = sqlx::query("DELETE FROM images WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to delete image {}: {}", id, e);
                DomainError::Internal(e.to_string())
            })?;

        let removed = deleted.rows_affected() > 0;
        if removed {
            info!(image_id = %id, "image deleted");
        }
        Ok(removed)
    }
}
