pub mod auth_service;
pub mod image_service;
pub mod like_service;
pub mod post_service;
