//! HTTP handlers for helicopter-service.

pub mod attribute;
pub mod attribute_value;
pub mod auth;
pub mod engine;
pub mod helicopter;
pub mod metrics;
pub mod user;

use service_core::error::AppError;

fn not_found(kind: &str, id: i64) -> AppError {
    AppError::NotFound(anyhow::anyhow!("{} {} not found", kind, id))
}
