use crate::application::auth_service::AuthService;
use crate::application::image_service::ImageService;
use crate::application::like_service::LikeService;
use crate::application::post_service::PostService;
use crate::infrastructure::config::AppConfig;
use crate::presentation::handlers;
use crate::presentation::middleware::{JwtAuthMiddleware, RequestIdMiddleware, TimingMiddleware};
use crate::presentation::utils::json_error_handler;
use actix_cors::Cors;
use actix_files::Files;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{App, HttpResponse, HttpServer, Responder, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

/// Services shared by every worker.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub posts: PostService,
    pub images: ImageService,
    pub likes: LikeService,
    pub config: AppConfig,
}

/// Registers shared data and the `/api` routes. Everything except health
/// and auth sits behind the bearer token check.
pub fn configure(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let keys = state.auth.keys().clone();

        cfg.app_data(web::Data::new(state.auth))
            .app_data(web::Data::new(state.posts))
            .app_data(web::Data::new(state.images))
            .app_data(web::Data::new(state.likes))
            .app_data(web::Data::new(state.config))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(health))
                    .service(handlers::auth::scope())
                    .service(
                        web::scope("")
                            .wrap(JwtAuthMiddleware::new(keys))
                            .service(handlers::post::get_posts)
                            .service(handlers::post::create_post)
                            .service(handlers::post::get_post)
                            .service(handlers::post::update_post)
                            .service(handlers::post::delete_post)
                            .service(handlers::like::toggle_like)
                            .service(handlers::image::get_images)
                            .service(handlers::image::create_image)
                            .service(handlers::image::get_image)
                            .service(handlers::image::update_image)
                            .service(handlers::image::delete_image),
                    ),
            );
    }
}

pub async fn start_rest_server(state: AppState) -> anyhow::Result<()> {
    let config = state.config.clone();
    tokio::fs::create_dir_all(&config.storage_dir).await?;

    info!(
        host = %config.host,
        port = config.port,
        storage = %config.storage_dir,
        "HTTP server starting"
    );

    let bind_address = (config.host.clone(), config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer"))
                    .add(("Permissions-Policy", "geolocation=()"))
                    .add(("Cross-Origin-Opener-Policy", "same-origin")),
            )
            .wrap(build_cors(&config))
            .configure(configure(state.clone()))
            .service(Files::new("/storage", &config.storage_dir))
    })
    .bind(bind_address)?
    .run()
    .await
    .map_err(anyhow::Error::new)?;

    Ok(())
}

fn build_cors(config: &AppConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::AUTHORIZATION,
        ])
        .max_age(3600);

    for origin in &config.cors_origins {
        cors = if origin == "*" {
            cors.allow_any_origin()
        } else {
            cors.allowed_origin(origin)
        };
    }

    cors
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
    })
}
