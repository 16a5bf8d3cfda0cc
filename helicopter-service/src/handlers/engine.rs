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
        resources::{CreateEngineRequest, UpdateEngineRequest},
        ListQuery,
    },
    middleware::AuthUser,
    utils::ValidatedJson,
    AppState,
};

pub async fn list_engines(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.db.list_engines(query.page()).await?))
}

pub async fn get_engine(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let engine = state
        .db
        .get_engine(id)
        .await?
        .ok_or_else(|| not_found("Engine", id))?;
    Ok(Json(engine))
}

pub async fn create_engine(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidatedJson(req): ValidatedJson<CreateEngineRequest>,
) -> Result<impl IntoResponse, AppError> {
    let engine = state.db.create_engine(&req.into_input(user.id)).await?;
    tracing::info!(engine_id = engine.id, user_id = user.id, "Engine created");
    Ok((StatusCode::CREATED, Json(engine)))
}

pub async fn update_engine(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateEngineRequest>,
) -> Result<impl IntoResponse, AppError> {
    let engine = state
        .db
        .update_engine(id, &req.into())
        .await?
        .ok_or_else(|| not_found("Engine", id))?;
    Ok(Json(engine))
}

pub async fn delete_engine(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !state.db.delete_engine(id).await? {
        return Err(not_found("Engine", id));
    }
    tracing::info!(engine_id = id, "Engine deleted");
    Ok(StatusCode::NO_CONTENT)
}
