use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::data::like_repository::LikeRepository;
use crate::data::post_repository::PostRepository;
use crate::domain::error::DomainError;
use crate::domain::user::User;

#[derive(Clone)]
pub struct LikeService {
    posts: Arc<dyn PostRepository>,
    likes: Arc<dyn LikeRepository>,
}

impl LikeService {
    pub fn new(posts: Arc<dyn PostRepository>, likes: Arc<dyn LikeRepository>) -> Self {
        Self { posts, likes }
    }

    /// Likes the post if the user has not yet, unlikes it otherwise, and
    /// returns the like set as it stands afterwards.
    #[instrument(skip(self))]
    pub async fn toggle(&self, post_id: Uuid, user_id: Uuid) -> Result<Vec<User>, DomainError> {
        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(DomainError::PostNotFound(post_id));
        }

        self.likes.toggle(post_id, user_id).await?;
        self.likes.likers(post_id).await
    }
}
