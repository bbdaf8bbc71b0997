use crate::application::auth_service::AuthService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{AuthResponse, LoginRequest, RegisterRequest};
use actix_web::{Either, HttpResponse, Scope, post, web};
use tracing::info;
use validator::Validate;

pub fn scope() -> Scope {
    web::scope("/auth").service(register).service(login)
}

#[post("/register")]
async fn register(
    service: web::Data<AuthService>,
    payload: Either<web::Json<RegisterRequest>, web::Form<RegisterRequest>>,
) -> Result<HttpResponse, DomainError> {
    let request = match payload {
        Either::Left(json) => json.into_inner(),
        Either::Right(form) => form.into_inner(),
    }
    .normalized();
    request.validate()?;

    let (Some(name), Some(email), Some(password)) = (request.name, request.email, request.password)
    else {
        return Err(DomainError::InvalidPayload("incomplete registration".to_string()));
    };

    let user = service.register(name, email, password).await?;
    let token = service.token_for(&user)?;

    info!(user_id = %user.id, email = %user.email, "user registered");

    Ok(HttpResponse::Created().json(AuthResponse {
        access_token: token,
        expires_in: service.keys().ttl_seconds(),
        token_type: "Bearer".to_string(),
    }))
}

#[post("/login")]
async fn login(
    service: web::Data<AuthService>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, DomainError> {
    let token = service.login(&payload.email, &payload.password).await?;

    info!(email = %payload.email, "user logged in");

    Ok(HttpResponse::Ok().json(AuthResponse {
        access_token: token,
        expires_in: service.keys().ttl_seconds(),
        token_type: "Bearer".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use crate::presentation::dto::AuthResponse;
    use crate::presentation::test_support::{TestContext, test_app};
    use actix_web::test;
    use serde_json::{Value, json};

    #[actix_web::test]
    async fn register_returns_token_usable_for_api() {
        let ctx = TestContext::new();
        let app = test_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({
                "name": "Jane",
                "email": "jane@example.com",
                "password": "password123"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);
        let auth: AuthResponse = test::read_body_json(resp).await;
        assert_eq!(auth.token_type, "Bearer");

        let req = test::TestRequest::get()
            .uri("/api/posts")
            .insert_header(("Authorization", format!("Bearer {}", auth.access_token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
    }

    #[actix_web::test]
    async fn register_rejects_invalid_fields() {
        let ctx = TestContext::new();
        let app = test_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({ "name": " ", "email": "nope", "password": "short" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 422);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "The given data was invalid.");
        assert_eq!(body["errors"]["name"][0], "The name field is required.");
        assert!(body["errors"]["email"].is_array());
        assert!(body["errors"]["password"].is_array());
    }

    #[actix_web::test]
    async fn login_with_wrong_password_is_unauthorized() {
        let ctx = TestContext::new();
        ctx.user("Jane").await;
        let app = test_app!(ctx);

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "jane@example.com", "password": "wrong-password" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "jane@example.com", "password": "password123" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
    }
}
