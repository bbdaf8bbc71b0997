use crate::application::post_service::PostService;
use crate::domain::error::DomainError;
use crate::infrastructure::config::AppConfig;
use crate::presentation::dto::PostBodyRequest;
use crate::presentation::resources::{PostCollection, PostResource, ResourceContext};
use crate::presentation::utils::{AuthenticatedUser, request_id};
use actix_web::{Either, HttpRequest, HttpResponse, delete, get, patch, post, web};
use serde_json::json;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

type BodyPayload = Either<web::Json<PostBodyRequest>, web::Form<PostBodyRequest>>;

fn validated_body(payload: BodyPayload) -> Result<String, DomainError> {
    let payload = match payload {
        Either::Left(json) => json.into_inner(),
        Either::Right(form) => form.into_inner(),
    }
    .normalized();
    payload.validate()?;
    payload
        .body
        .ok_or_else(|| DomainError::InvalidPayload("body missing".to_string()))
}

#[get("/posts")]
pub async fn get_posts(
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, DomainError> {
    let views = posts.list_for_user(user.id).await?;
    let ctx = ResourceContext::new(&config.app_url, user.id);
    Ok(HttpResponse::Ok().json(PostCollection::new(&views, &ctx)))
}

#[get("/posts/{id}")]
pub async fn get_post(
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    config: web::Data<AppConfig>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let view = posts.get_post(user.id, path.into_inner()).await?;
    let ctx = ResourceContext::new(&config.app_url, user.id);
    Ok(HttpResponse::Ok().json(PostResource::new(&view, &ctx)))
}

#[post("/posts")]
pub async fn create_post(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    config: web::Data<AppConfig>,
    payload: BodyPayload,
) -> Result<HttpResponse, DomainError> {
    let body = validated_body(payload)?;
    let view = posts.create_post(user.id, body).await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        post_id = %view.post.id,
        "post created"
    );

    let ctx = ResourceContext::new(&config.app_url, user.id);
    Ok(HttpResponse::Created().json(PostResource::new(&view, &ctx)))
}

#[patch("/posts/{id}")]
pub async fn update_post(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    config: web::Data<AppConfig>,
    payload: BodyPayload,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let body = validated_body(payload)?;
    let view = posts.update_post(user.id, post_id, body).await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        post_id = %post_id,
        "post updated"
    );

    let ctx = ResourceContext::new(&config.app_url, user.id);
    Ok(HttpResponse::Ok().json(PostResource::new(&view, &ctx)))
}

#[delete("/posts/{id}")]
pub async fn delete_post(
    req: HttpRequest,
    user: AuthenticatedUser,
    posts: web::Data<PostService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    posts.delete_post(user.id, post_id).await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        post_id = %post_id,
        "post deleted"
    );

    Ok(HttpResponse::Ok().json(json!([])))
}
