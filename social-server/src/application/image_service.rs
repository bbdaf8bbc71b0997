use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::data::image_repository::ImageRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::image::{Image, ImageUpload, ImageView};
use crate::domain::policy::authorize_touch;
use crate::infrastructure::storage::ImageStorage;

const IMAGE_DIRECTORY: &str = "images";

#[derive(Clone)]
pub struct ImageService {
    images: Arc<dyn ImageRepository>,
    users: Arc<dyn UserRepository>,
    storage: Arc<dyn ImageStorage>,
}

impl ImageService {
    pub fn new(
        images: Arc<dyn ImageRepository>,
        users: Arc<dyn UserRepository>,
        storage: Arc<dyn ImageStorage>,
    ) -> Self {
        Self {
            images,
            users,
            storage,
        }
    }

    async fn owned_image(&self, actor_id: Uuid, image_id: Uuid) -> Result<Image, DomainError> {
        let image = self
            .images
            .find_by_id(image_id)
            .await?
            .ok_or(DomainError::ImageNotFound(image_id))?;
        authorize_touch(actor_id, &image)?;
        Ok(image)
    }

    async fn view(&self, image: Image) -> Result<ImageView, DomainError> {
        let author = self
            .users
            .find_by_id(image.user_id)
            .await?
            .ok_or(DomainError::UserNotFound(image.user_id))?;
        Ok(ImageView { image, author })
    }

    async fn persist(&self, upload: &ImageUpload) -> Result<String, DomainError> {
        self.storage
            .store(IMAGE_DIRECTORY, upload.file_name.as_deref(), &upload.bytes)
            .await
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<ImageView>, DomainError> {
        let images = self.images.list_by_user(user_id).await?;
        if images.is_empty() {
            return Ok(Vec::new());
        }

        let author = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))?;

        Ok(images
            .into_iter()
            .map(|image| ImageView {
                image,
                author: author.clone(),
            })
            .collect())
    }

    pub async fn get_image(
        &self,
        actor_id: Uuid,
        image_id: Uuid,
    ) -> Result<ImageView, DomainError> {
        let image = self.owned_image(actor_id, image_id).await?;
        self.view(image).await
    }

    /// The file is written before the row; a failed insert leaves the file behind.
    #[instrument(skip(self, upload, body), fields(size = upload.bytes.len()))]
    pub async fn create_image(
        &self,
        user_id: Uuid,
        upload: ImageUpload,
        body: String,
    ) -> Result<ImageView, DomainError> {
        let path = self.persist(&upload).await?;
        let image = self.images.create(Image::new(user_id, body, path)).await?;
        self.view(image).await
    }

    #[instrument(skip(self, upload, body), fields(size = upload.bytes.len()))]
    pub async fn update_image(
        &self,
        actor_id: Uuid,
        image_id: Uuid,
        upload: ImageUpload,
        body: Option<String>,
    ) -> Result<ImageView, DomainError> {
        self.owned_image(actor_id, image_id).await?;
        let path = self.persist(&upload).await?;
        let image = self
            .images
            .update(image_id, body, path)
            .await?
            .ok_or(DomainError::ImageNotFound(image_id))?;
        self.view(image).await
    }

    #[instrument(skip(self))]
    pub async fn delete_image(&self, actor_id: Uuid, image_id: Uuid) -> Result<(), DomainError> {
        self.owned_image(actor_id, image_id).await?;
        if !self.images.delete(image_id).await? {
            return Err(DomainError::ImageNotFound(image_id));
        }
        Ok(())
    }
}
