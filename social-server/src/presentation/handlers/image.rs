use crate::application::image_service::ImageService;
use crate::domain::error::DomainError;
use crate::infrastructure::config::AppConfig;
use crate::presentation::dto::{StoreImageForm, UpdateImageForm};
use crate::presentation::resources::{ImageCollection, ImageResource, ResourceContext};
use crate::presentation::utils::{AuthenticatedUser, read_image_form, request_id};
use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, web};
use serde_json::json;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

#[get("/images")]
pub async fn get_images(
    user: AuthenticatedUser,
    images: web::Data<ImageService>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, DomainError> {
    let views = images.list_for_user(user.id).await?;
    let ctx = ResourceContext::new(&config.app_url, user.id);
    Ok(HttpResponse::Ok().json(ImageCollection::new(&views, &ctx)))
}

#[get("/images/{id}")]
pub async fn get_image(
    user: AuthenticatedUser,
    images: web::Data<ImageService>,
    config: web::Data<AppConfig>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let view = images.get_image(user.id, path.into_inner()).await?;
    let ctx = ResourceContext::new(&config.app_url, user.id);
    Ok(HttpResponse::Ok().json(ImageResource::new(&view, &ctx)))
}

#[post("/images")]
pub async fn create_image(
    req: HttpRequest,
    user: AuthenticatedUser,
    images: web::Data<ImageService>,
    config: web::Data<AppConfig>,
    payload: Multipart,
) -> Result<HttpResponse, DomainError> {
    let form = StoreImageForm::from(read_image_form(payload).await?);
    form.validate()?;
    let (Some(upload), Some(body)) = (form.image, form.body) else {
        return Err(DomainError::InvalidPayload("image form incomplete".to_string()));
    };

    let view = images.create_image(user.id, upload, body).await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        image_id = %view.image.id,
        path = %view.image.image,
        "image created"
    );

    let ctx = ResourceContext::new(&config.app_url, user.id);
    Ok(HttpResponse::Ok().json(ImageResource::new(&view, &ctx)))
}

#[patch("/images/{id}")]
pub async fn update_image(
    req: HttpRequest,
    user: AuthenticatedUser,
    images: web::Data<ImageService>,
    config: web::Data<AppConfig>,
    path: web::Path<Uuid>,
    payload: Multipart,
) -> Result<HttpResponse, DomainError> {
    let image_id = path.into_inner();
    let form = UpdateImageForm::from(read_image_form(payload).await?);
    form.validate()?;
    let Some(upload) = form.image else {
        return Err(DomainError::InvalidPayload("image form incomplete".to_string()));
    };

    let view = images
        .update_image(user.id, image_id, upload, form.body)
        .await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        image_id = %image_id,
        "image updated"
    );

    let ctx = ResourceContext::new(&config.app_url, user.id);
    Ok(HttpResponse::Ok().json(ImageResource::new(&view, &ctx)))
}

#[delete("/images/{id}")]
pub async fn delete_image(
    req: HttpRequest,
    user: AuthenticatedUser,
    images: web::Data<ImageService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let image_id = path.into_inner();
    images.delete_image(user.id, image_id).await?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        image_id = %image_id,
        "image deleted"
    );

    Ok(HttpResponse::Ok().json(json!([])))
}
