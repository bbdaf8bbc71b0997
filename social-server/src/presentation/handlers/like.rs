use crate::application::like_service::LikeService;
use crate::domain::error::DomainError;
use crate::infrastructure::config::AppConfig;
use crate::presentation::resources::{LikeCollection, ResourceContext};
use crate::presentation::utils::{AuthenticatedUser, request_id};
use actix_web::{HttpRequest, HttpResponse, post, web};
use tracing::info;
use uuid::Uuid;

/// Likes or unlikes the post for the caller.
#[post("/posts/{id}/likes")]
pub async fn toggle_like(
    req: HttpRequest,
    user: AuthenticatedUser,
    likes: web::Data<LikeService>,
    config: web::Data<AppConfig>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let likers = likes.toggle(post_id, user.id).await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        post_id = %post_id,
        like_count = likers.len(),
        "like toggled"
    );

    let ctx = ResourceContext::new(&config.app_url, user.id);
    Ok(HttpResponse::Ok().json(LikeCollection::new(post_id, &likers, &ctx)))
}
