use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

use super::not_found;
use crate::{
    dtos::{
        resources::{CreateAttributeValueRequest, UpdateAttributeValueRequest},
        ListQuery,
    },
    middleware::AuthUser,
    utils::ValidatedJson,
    AppState,
};

pub async fn list_attribute_values(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.db.list_attribute_values(query.page()).await?))
}

pub async fn get_attribute_value(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let value = state
        .db
        .get_attribute_value(id)
        .await?
        .ok_or_else(|| not_found("Attribute value", id))?;
    Ok(Json(value))
}

/// Any authenticated user may attach a value to any helicopter.
pub async fn create_attribute_value(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidatedJson(req): ValidatedJson<CreateAttributeValueRequest>,
) -> Result<impl IntoResponse, AppError> {
    let value = state
        .db
        .create_attribute_value(&req.into_input(user.id))
        .await?;
    tracing::info!(
        attribute_value_id = value.id,
        helicopter_id = value.helicopter_id,
        user_id = user.id,
        "Attribute value created"
    );
    Ok((StatusCode::CREATED, Json(value)))
}

pub async fn update_attribute_value(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateAttributeValueRequest>,
) -> Result<impl IntoResponse, AppError> {
    let value = state
        .db
        .update_attribute_value(id, &req.into())
        .await?
        .ok_or_else(|| not_found("Attribute value", id))?;
    Ok(Json(value))
}

pub async fn delete_attribute_value(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !state.db.delete_attribute_value(id).await? {
        return Err(not_found("Attribute value", id));
    }
    Ok(StatusCode::NO_CONTENT)
}
