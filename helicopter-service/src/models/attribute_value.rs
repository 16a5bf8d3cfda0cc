//! Attribute value links between a helicopter and an attribute.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AttributeValue {
    pub id: i64,
    pub helicopter_id: i64,
    pub attribute_id: i64,
    pub value: String,
    pub creator_id: i64,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateAttributeValue {
    pub helicopter_id: i64,
    pub attribute_id: i64,
    pub value: String,
    pub creator_id: i64,
}

/// Only the value itself can change; the pair it links is fixed.
#[derive(Debug, Clone, Default)]
pub struct UpdateAttributeValue {
    pub value: Option<String>,
}

/// An attribute value joined with its attribute, as listed under a helicopter.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct HelicopterAttribute {
    pub id: i64,
    pub attribute_id: i64,
    pub name: String,
    pub unit: Option<String>,
    pub value: String,
}
