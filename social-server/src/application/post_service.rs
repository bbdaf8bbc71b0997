use std::collections::HashMap;
use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::data::like_repository::LikeRepository;
use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::policy::authorize_touch;
use crate::domain::post::{Post, PostView};

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    likes: Arc<dyn LikeRepository>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        likes: Arc<dyn LikeRepository>,
    ) -> Self {
        Self {
            posts,
            users,
            likes,
        }
    }

    /// Loads a post and checks the `touch` capability. Unknown ids are
    /// reported before ownership.
    async fn owned_post(&self, actor_id: Uuid, post_id: Uuid) -> Result<Post, DomainError> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))?;
        authorize_touch(actor_id, &post)?;
        Ok(post)
    }

    async fn view(&self, post: Post) -> Result<PostView, DomainError> {
        let author = self
            .users
            .find_by_id(post.user_id)
            .await?
            .ok_or(DomainError::UserNotFound(post.user_id))?;
        let likes = self.likes.likers(post.id).await?;
        Ok(PostView {
            post,
            author,
            likes,
        })
    }

    #[instrument(skip(self))]
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<PostView>, DomainError> {
        let posts = self.posts.list_by_user(user_id).await?;
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let author = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))?;

        let ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
        let mut likes_by_post: HashMap<Uuid, Vec<_>> = HashMap::new();
        for (post_id, user) in self.likes.likers_for_posts(&ids).await? {
            likes_by_post.entry(post_id).or_default().push(user);
        }

        Ok(posts
            .into_iter()
            .map(|post| PostView {
                likes: likes_by_post.remove(&post.id).unwrap_or_default(),
                author: author.clone(),
                post,
            })
            .collect())
    }

    pub async fn get_post(&self, actor_id: Uuid, post_id: Uuid) -> Result<PostView, DomainError> {
        let post = self.owned_post(actor_id, post_id).await?;
        self.view(post).await
    }

    #[instrument(skip(self, body))]
    pub async fn create_post(&self, user_id: Uuid, body: String) -> Result<PostView, DomainError> {
        let post = self.posts.create(Post::new(user_id, body)).await?;
        self.view(post).await
    }

    #[instrument(skip(self, body))]
    pub async fn update_post(
        &self,
        actor_id: Uuid,
        post_id: Uuid,
        body: String,
    ) -> Result<PostView, DomainError> {
        self.owned_post(actor_id, post_id).await?;
        let post = self
            .posts
            .update_body(post_id, body)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))?;
        self.view(post).await
    }

    #[instrument(skip(self))]
    pub async fn delete_post(&self, actor_id: Uuid, post_id: Uuid) -> Result<(), DomainError> {
        self.owned_post(actor_id, post_id).await?;
        if !self.posts.delete(post_id).await? {
            return Err(DomainError::PostNotFound(post_id));
        }
        Ok(())
    }
}
