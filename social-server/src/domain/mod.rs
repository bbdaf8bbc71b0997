pub mod error;
pub mod image;
pub mod like;
pub mod policy;
pub mod post;
pub mod user;
