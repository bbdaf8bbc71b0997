mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod utils;

use std::sync::Arc;

use application::auth_service::AuthService;
use application::image_service::ImageService;
use application::like_service::LikeService;
use application::post_service::PostService;
use data::image_repository::PostgresImageRepository;
use data::like_repository::PostgresLikeRepository;
use data::post_repository::PostgresPostRepository;
use data::user_repository::PostgresUserRepository;
use infrastructure::config::AppConfig;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::logging::init_logging;
use infrastructure::security::JwtKeys;
use infrastructure::storage::LocalImageStorage;
use utils::{AppState, start_rest_server};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let user_repo = Arc::new(PostgresUserRepository::new(pool.clone()));
    let post_repo = Arc::new(PostgresPostRepository::new(pool.clone()));
    let image_repo = Arc::new(PostgresImageRepository::new(pool.clone()));
    let like_repo = Arc::new(PostgresLikeRepository::new(pool.clone()));
    let storage = Arc::new(LocalImageStorage::new(&config.storage_dir));

    let state = AppState {
        auth: AuthService::new(
            user_repo.clone(),
            JwtKeys::new(config.jwt_secret.clone(), config.jwt_ttl_seconds),
        ),
        posts: PostService::new(post_repo.clone(), user_repo.clone(), like_repo.clone()),
        images: ImageService::new(image_repo, user_repo, storage),
        likes: LikeService::new(post_repo, like_repo),
        config,
    };

    start_rest_server(state).await
}
