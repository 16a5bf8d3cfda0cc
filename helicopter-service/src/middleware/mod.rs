pub mod auth;
pub mod ownership;

pub use auth::{auth_middleware, AuthUser};
pub use ownership::{require_creator, CreatorGuard};
