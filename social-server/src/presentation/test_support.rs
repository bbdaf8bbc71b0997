//! Wiring for handler tests: the real routes and middleware on top of
//! in-memory repositories and storage.

use std::sync::Arc;

use crate::application::auth_service::AuthService;
use crate::application::image_service::ImageService;
use crate::application::like_service::LikeService;
use crate::application::post_service::PostService;
use crate::data::image_repository::ImageRepository;
use crate::data::memory::{
    InMemoryImageRepository, InMemoryLikeRepository, InMemoryPostRepository,
    InMemoryUserRepository,
};
use crate::data::post_repository::PostRepository;
use crate::domain::image::Image;
use crate::domain::post::Post;
use crate::domain::user::User;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::security::JwtKeys;
use crate::infrastructure::storage::InMemoryImageStorage;
use crate::utils::AppState;

pub struct TestContext {
    pub users: Arc<InMemoryUserRepository>,
    pub posts: Arc<InMemoryPostRepository>,
    pub images: Arc<InMemoryImageRepository>,
    pub storage: Arc<InMemoryImageStorage>,
    pub config: AppConfig,
    state: AppState,
}

impl TestContext {
    pub fn new() -> Self {
        let config = AppConfig::from_lookup(|key| match key {
            "DATABASE_URL" => Some("postgres://unused".to_string()),
            "JWT_SECRET" => Some("test-secret".to_string()),
            "APP_URL" => Some("http://social.test".to_string()),
            _ => None,
        })
        .expect("test config");

        let users = Arc::new(InMemoryUserRepository::default());
        let posts = Arc::new(InMemoryPostRepository::default());
        let images = Arc::new(InMemoryImageRepository::default());
        let likes = Arc::new(InMemoryLikeRepository::new(users.clone()));
        let storage = Arc::new(InMemoryImageStorage::default());

        let state = AppState {
            auth: AuthService::new(
                users.clone(),
                JwtKeys::new(config.jwt_secret.clone(), config.jwt_ttl_seconds),
            ),
            posts: PostService::new(posts.clone(), users.clone(), likes.clone()),
            images: ImageService::new(images.clone(), users.clone(), storage.clone()),
            likes: LikeService::new(posts.clone(), likes),
            config: config.clone(),
        };

        Self {
            users,
            posts,
            images,
            storage,
            config,
            state,
        }
    }

    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Registers `name` through the auth service (password `password123`)
    /// and returns the user with a bearer token.
    pub async fn user(&self, name: &str) -> (User, String) {
        let user = self
            .state
            .auth
            .register(
                name.to_string(),
                format!("{}@example.com", name.to_lowercase()),
                "password123".to_string(),
            )
            .await
            .expect("register user");
        let token = self.state.auth.token_for(&user).expect("token");
        (user, token)
    }

    pub async fn post_for(&self, user: &User, body: &str) -> Post {
        self.posts
            .create(Post::new(user.id, body.to_string()))
            .await
            .expect("seed post")
    }

    pub async fn image_for(&self, user: &User, body: &str) -> Image {
        self.images
            .create(Image::new(
                user.id,
                body.to_string(),
                "images/seed.png".to_string(),
            ))
            .await
            .expect("seed image")
    }
}

macro_rules! test_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap($crate::presentation::middleware::TimingMiddleware)
                .wrap($crate::presentation::middleware::RequestIdMiddleware)
                .configure($crate::utils::configure($ctx.state())),
        )
        .await
    };
}
pub(crate) use test_app;

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

pub struct Part<'a> {
    name: &'a str,
    file_name: Option<&'a str>,
    bytes: &'a [u8],
}

impl<'a> Part<'a> {
    pub fn file(name: &'a str, file_name: &'a str, bytes: &'a [u8]) -> Self {
        Self {
            name,
            file_name: Some(file_name),
            bytes,
        }
    }

    pub fn text(name: &'a str, value: &'a str) -> Self {
        Self {
            name,
            file_name: None,
            bytes: value.as_bytes(),
        }
    }
}

/// Encodes `multipart/form-data`; returns the content type and the body.
pub fn multipart(parts: &[Part<'_>]) -> (String, Vec<u8>) {
    const BOUNDARY: &str = "social-test-boundary-7MA4YWxk";
    let mut body = Vec::new();

    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        let disposition = match part.file_name {
            Some(file_name) => format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n",
                part.name, file_name
            ),
            None => format!(
                "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                part.name
            ),
        };
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(part.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    (format!("multipart/form-data; boundary={}", BOUNDARY), body)
}
