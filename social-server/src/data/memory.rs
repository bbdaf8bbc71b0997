//! In-memory repositories backing the handler tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::data::image_repository::ImageRepository;
use crate::data::like_repository::LikeRepository;
use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::image::Image;
use crate::domain::like::Like;
use crate::domain::post::Post;
use crate::domain::user::User;

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(DomainError::UserAlreadyExists(
                "email already registered".to_string(),
            ));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }
}

/// `ORDER BY created_at DESC, id DESC`, as the Postgres repositories sort.
fn newest_first<T, F>(mut rows: Vec<T>, key: F) -> Vec<T>
where
    F: Fn(&T) -> (chrono::DateTime<Utc>, Uuid),
{
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
    rows
}

#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: Mutex<Vec<Post>>,
}

impl InMemoryPostRepository {
    pub fn count(&self) -> usize {
        self.posts.lock().unwrap().len()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, post: Post) -> Result<Post, DomainError> {
        self.posts.lock().unwrap().push(post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        let posts = self.posts.lock().unwrap();
        Ok(posts.iter().find(|p| p.id == id).cloned())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Post>, DomainError> {
        let owned: Vec<Post> = {
            let posts = self.posts.lock().unwrap();
            posts.iter().filter(|p| p.user_id == user_id).cloned().collect()
        };
        Ok(newest_first(owned, |p| (p.created_at, p.id)))
    }

    async fn update_body(&self, id: Uuid, body: String) -> Result<Option<Post>, DomainError> {
        let mut posts = self.posts.lock().unwrap();
        Ok(posts.iter_mut().find(|p| p.id == id).map(|post| {
            post.body = body;
            post.updated_at = Utc::now();
            post.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|p| p.id != id);
        Ok(posts.len() != before)
    }
}

#[derive(Default)]
pub struct InMemoryImageRepository {
    images: Mutex<Vec<Image>>,
}

impl InMemoryImageRepository {
    pub fn count(&self) -> usize {
        self.images.lock().unwrap().len()
    }
}

#[async_trait]
impl ImageRepository for InMemoryImageRepository {
    async fn create(&self, image: Image) -> Result<Image, DomainError> {
        self.images.lock().unwrap().push(image.clone());
        Ok(image)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Image>, DomainError> {
        let images = self.images.lock().unwrap();
        Ok(images.iter().find(|i| i.id == id).cloned())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Image>, DomainError> {
        let owned: Vec<Image> = {
            let images = self.images.lock().unwrap();
            images.iter().filter(|i| i.user_id == user_id).cloned().collect()
        };
        Ok(newest_first(owned, |i| (i.created_at, i.id)))
    }

    async fn update(
        &self,
        id: Uuid,
        body: Option<String>,
        image: String,
    ) -> Result<Option<Image>, DomainError> {
        let mut images = self.images.lock().unwrap();
        Ok(images.iter_mut().find(|i| i.id == id).map(|row| {
            if let Some(body) = body {
                row.body = body;
            }
            row.image = image;
            row.updated_at = Utc::now();
            row.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut images = self.images.lock().unwrap();
        let before = images.len();
        images.retain(|i| i.id != id);
        Ok(images.len() != before)
    }
}

pub struct InMemoryLikeRepository {
    likes: Mutex<Vec<Like>>,
    users: Arc<InMemoryUserRepository>,
}

impl InMemoryLikeRepository {
    pub fn new(users: Arc<InMemoryUserRepository>) -> Self {
        Self {
            likes: Mutex::new(Vec::new()),
            users,
        }
    }

    fn rows_for(&self, post_ids: &[Uuid]) -> Vec<Like> {
        let likes = self.likes.lock().unwrap();
        likes
            .iter()
            .filter(|l| post_ids.contains(&l.post_id))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl LikeRepository for InMemoryLikeRepository {
    async fn toggle(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, DomainError> {
        let mut likes = self.likes.lock().unwrap();
        let before = likes.len();
        likes.retain(|l| !(l.post_id == post_id && l.user_id == user_id));
        if likes.len() != before {
            return Ok(false);
        }
        likes.push(Like::new(post_id, user_id));
        Ok(true)
    }

    async fn likers(&self, post_id: Uuid) -> Result<Vec<User>, DomainError> {
        Ok(self
            .likers_for_posts(&[post_id])
            .await?
            .into_iter()
            .map(|(_, user)| user)
            .collect())
    }

    async fn likers_for_posts(&self, post_ids: &[Uuid]) -> Result<Vec<(Uuid, User)>, DomainError> {
        let rows = self.rows_for(post_ids);
        let mut result = Vec::with_capacity(rows.len());
        for like in rows {
            if let Some(user) = self.users.find_by_id(like.user_id).await? {
                result.push((like.post_id, user));
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_instant_posts_fall_back_to_id_order() {
        let repo = InMemoryPostRepository::default();
        let user_id = Uuid::new_v4();
        let at = Utc::now();

        let mut ids = Vec::new();
        for body in ["a", "b", "c"] {
            let mut post = Post::new(user_id, body.to_string());
            post.created_at = at;
            ids.push(repo.create(post).await.unwrap().id);
        }
        let mut newer = Post::new(user_id, "newest".to_string());
        newer.created_at = at + chrono::Duration::seconds(1);
        let newer = repo.create(newer).await.unwrap();

        let listed: Vec<Uuid> = repo
            .list_by_user(user_id)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();

        ids.sort();
        ids.reverse();
        assert_eq!(listed[0], newer.id);
        assert_eq!(&listed[1..], ids.as_slice());
    }
}
