// API request/response models
pub mod auth;
pub mod common;
pub mod feedback;
pub mod plan;
pub mod user;
