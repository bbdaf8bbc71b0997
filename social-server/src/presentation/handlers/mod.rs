pub mod auth;
pub mod image;
pub mod like;
pub mod post;
