//! Domain models for helicopter-service.

mod attribute;
mod attribute_value;
mod engine;
mod helicopter;
mod user;

pub use attribute::{Attribute, CreateAttribute, UpdateAttribute};
pub use attribute_value::{
    AttributeValue, CreateAttributeValue, HelicopterAttribute, UpdateAttributeValue,
};
pub use engine::{CreateEngine, Engine, UpdateEngine};
pub use helicopter::{CreateHelicopter, Helicopter, UpdateHelicopter};
pub use user::{NewUser, User, UserResponse};

/// Pagination window for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}
