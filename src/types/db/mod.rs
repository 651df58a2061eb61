// Database entities - SeaORM models
pub mod feedback;
pub mod goal;
pub mod plan;
pub mod role;
pub mod user;
pub mod user_role;
