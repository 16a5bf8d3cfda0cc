//! Attribute model. Attribute names are globally unique.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Attribute {
    pub id: i64,
    pub name: String,
    pub unit: Option<String>,
    pub creator_id: i64,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateAttribute {
    pub name: String,
    pub unit: Option<String>,
    pub creator_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateAttribute {
    pub name: Option<String>,
    pub unit: Option<String>,
}
