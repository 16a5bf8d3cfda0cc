//! Request bodies for the resource endpoints.
//!
//! `creator_id` is never accepted from a client; it is stamped from the
//! authenticated identity.

use serde::Deserialize;
use validator::Validate;

use crate::models::{
    CreateAttribute, CreateAttributeValue, CreateEngine, CreateHelicopter, UpdateAttribute,
    UpdateAttributeValue, UpdateEngine, UpdateHelicopter,
};

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateHelicopterRequest {
    #[validate(length(min = 1, max = 100))]
    pub model: String,
    #[validate(length(min = 1, max = 100))]
    pub manufacturer: String,
    #[validate(range(min = 1))]
    pub max_speed_kmh: Option<i32>,
    pub engine_id: Option<i64>,
}

impl CreateHelicopterRequest {
    pub fn into_input(self, creator_id: i64) -> CreateHelicopter {
        CreateHelicopter {
            model: self.model,
            manufacturer: self.manufacturer,
            max_speed_kmh: self.max_speed_kmh,
            engine_id: self.engine_id,
            creator_id,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateHelicopterRequest {
    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub manufacturer: Option<String>,
    #[validate(range(min = 1))]
    pub max_speed_kmh: Option<i32>,
    pub engine_id: Option<i64>,
}

impl From<UpdateHelicopterRequest> for UpdateHelicopter {
    fn from(req: UpdateHelicopterRequest) -> Self {
        Self {
            model: req.model,
            manufacturer: req.manufacturer,
            max_speed_kmh: req.max_speed_kmh,
            engine_id: req.engine_id,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateEngineRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 100))]
    pub manufacturer: Option<String>,
    #[validate(range(min = 1))]
    pub power_hp: i32,
}

impl CreateEngineRequest {
    pub fn into_input(self, creator_id: i64) -> CreateEngine {
        CreateEngine {
            name: self.name,
            manufacturer: self.manufacturer,
            power_hp: self.power_hp,
            creator_id,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateEngineRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub manufacturer: Option<String>,
    #[validate(range(min = 1))]
    pub power_hp: Option<i32>,
}

impl From<UpdateEngineRequest> for UpdateEngine {
    fn from(req: UpdateEngineRequest) -> Self {
        Self {
            name: req.name,
            manufacturer: req.manufacturer,
            power_hp: req.power_hp,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateAttributeRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub unit: Option<String>,
}

impl CreateAttributeRequest {
    pub fn into_input(self, creator_id: i64) -> CreateAttribute {
        CreateAttribute {
            name: self.name,
            unit: self.unit,
            creator_id,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateAttributeRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub unit: Option<String>,
}

impl From<UpdateAttributeRequest> for UpdateAttribute {
    fn from(req: UpdateAttributeRequest) -> Self {
        Self {
            name: req.name,
            unit: req.unit,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateAttributeValueRequest {
    pub helicopter_id: i64,
    pub attribute_id: i64,
    #[validate(length(min = 1, max = 255))]
    pub value: String,
}

impl CreateAttributeValueRequest {
    pub fn into_input(self, creator_id: i64) -> CreateAttributeValue {
        CreateAttributeValue {
            helicopter_id: self.helicopter_id,
            attribute_id: self.attribute_id,
            value: self.value,
            creator_id,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateAttributeValueRequest {
    #[validate(length(min = 1, max = 255))]
    pub value: Option<String>,
}

impl From<UpdateAttributeValueRequest> for UpdateAttributeValue {
    fn from(req: UpdateAttributeValueRequest) -> Self {
        Self { value: req.value }
    }
}
