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
        resources::{CreateHelicopterRequest, UpdateHelicopterRequest},
        ListQuery,
    },
    middleware::AuthUser,
    utils::ValidatedJson,
    AppState,
};

pub async fn list_helicopters(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let helicopters = state.db.list_helicopters(query.page()).await?;
    Ok(Json(helicopters))
}

pub async fn get_helicopter(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let helicopter = state
        .db
        .get_helicopter(id)
        .await?
        .ok_or_else(|| not_found("Helicopter", id))?;
    Ok(Json(helicopter))
}

pub async fn create_helicopter(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidatedJson(req): ValidatedJson<CreateHelicopterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let helicopter = state.db.create_helicopter(&req.into_input(user.id)).await?;
    tracing::info!(helicopter_id = helicopter.id, user_id = user.id, "Helicopter created");
    Ok((StatusCode::CREATED, Json(helicopter)))
}

pub async fn update_helicopter(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateHelicopterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let helicopter = state
        .db
        .update_helicopter(id, &req.into())
        .await?
        .ok_or_else(|| not_found("Helicopter", id))?;
    Ok(Json(helicopter))
}

pub async fn delete_helicopter(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !state.db.delete_helicopter(id).await? {
        return Err(not_found("Helicopter", id));
    }
    tracing::info!(helicopter_id = id, "Helicopter deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Attribute values recorded for one helicopter
pub async fn list_helicopter_attributes(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if state.db.get_helicopter(id).await?.is_none() {
        return Err(not_found("Helicopter", id));
    }
    let attributes = state.db.list_helicopter_attributes(id).await?;
    Ok(Json(attributes))
}
