//! Helicopter model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Helicopter {
    pub id: i64,
    pub model: String,
    pub manufacturer: String,
    pub max_speed_kmh: Option<i32>,
    pub engine_id: Option<i64>,
    pub creator_id: i64,
    pub created_utc: DateTime<Utc>,
    pub updated_utc: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateHelicopter {
    pub model: String,
    pub manufacturer: String,
    pub max_speed_kmh: Option<i32>,
    pub engine_id: Option<i64>,
    pub creator_id: i64,
}

/// Partial update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateHelicopter {
    pub model: Option<String>,
    pub manufacturer: Option<String>,
    pub max_speed_kmh: Option<i32>,
    pub engine_id: Option<i64>,
}
