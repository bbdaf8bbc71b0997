use actix_multipart::Multipart;
use actix_web::dev::Payload;
use actix_web::error::JsonPayloadError;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures_util::StreamExt;
use futures_util::future::{Ready, ready};
use tracing::warn;
use uuid::Uuid;

use crate::application::auth_service::AuthService;
use crate::domain::error::DomainError;
use crate::domain::image::ImageUpload;
use crate::infrastructure::security::JwtKeys;
use crate::presentation::dto::ImageFormFields;
use crate::presentation::middleware::RequestId;

const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(DomainError::Unauthorized.into())),
        }
    }
}

pub async fn extract_user_from_token(
    token: &str,
    keys: &JwtKeys,
    auth_service: &AuthService,
) -> Result<AuthenticatedUser, DomainError> {
    let claims = keys
        .verify_token(token)
        .map_err(|_| DomainError::Unauthorized)?;
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| DomainError::Unauthorized)?;

    let user = auth_service
        .get_user(user_id)
        .await
        .map_err(|_| DomainError::Unauthorized)?;

    Ok(AuthenticatedUser { id: user.id })
}

/// Installed as the `JsonConfig` error handler so body failures render like
/// every other `DomainError`.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> Error {
    warn!(
        request_id = %request_id(req),
        path = %req.path(),
        error = %err,
        "rejected request body"
    );
    let error = match err {
        JsonPayloadError::Deserialize(cause) => DomainError::malformed(cause.to_string()),
        other => DomainError::InvalidPayload(other.to_string()),
    };
    error.into()
}

pub fn request_id(req: &HttpRequest) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|rid| rid.0.clone())
        .unwrap_or_else(|| "unknown".into())
}

/// Drains a multipart body into the `image` and `body` fields; other parts
/// are ignored. An empty `image` part counts as missing.
pub async fn read_image_form(mut payload: Multipart) -> Result<ImageFormFields, DomainError> {
    let mut fields = ImageFormFields::default();
    let mut total_bytes = 0usize;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| DomainError::InvalidPayload(e.to_string()))?;
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(|s| s.to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| DomainError::InvalidPayload(e.to_string()))?;
            total_bytes += chunk.len();
            if total_bytes > MAX_UPLOAD_BYTES {
                return Err(DomainError::InvalidPayload(
                    "upload exceeds 20MB limit".to_string(),
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        match name.as_str() {
            "image" if !bytes.is_empty() => {
                fields.image = Some(ImageUpload { file_name, bytes });
            }
            "body" => {
                let text = String::from_utf8(bytes).map_err(|_| {
                    DomainError::InvalidPayload("body must be valid UTF-8".to_string())
                })?;
                fields.body = Some(text);
            }
            _ => {}
        }
    }

    Ok(fields)
}
