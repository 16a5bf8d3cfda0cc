//! Engine model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Engine {
    pub id: i64,
    pub name: String,
    pub manufacturer: Option<String>,
    pub power_hp: i32,
    pub creator_id: i64,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateEngine {
    pub name: String,
    pub manufacturer: Option<String>,
    pub power_hp: i32,
    pub creator_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateEngine {
    pub name: Option<String>,
    pub manufacturer: Option<String>,
    pub power_hp: Option<i32>,
}
