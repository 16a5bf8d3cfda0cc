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
        resources::{CreateAttributeRequest, UpdateAttributeRequest},
        ListQuery,
    },
    middleware::AuthUser,
    utils::ValidatedJson,
    AppState,
};

pub async fn list_attributes(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.db.list_attributes(query.page()).await?))
}

pub async fn get_attribute(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let attribute = state
        .db
        .get_attribute(id)
        .await?
        .ok_or_else(|| not_found("Attribute", id))?;
    Ok(Json(attribute))
}

pub async fn create_attribute(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidatedJson(req): ValidatedJson<CreateAttributeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let attribute = state.db.create_attribute(&req.into_input(user.id)).await?;
    tracing::info!(attribute_id = attribute.id, user_id = user.id, "Attribute created");
    Ok((StatusCode::CREATED, Json(attribute)))
}

pub async fn update_attribute(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateAttributeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let attribute = state
        .db
        .update_attribute(id, &req.into())
        .await?
        .ok_or_else(|| not_found("Attribute", id))?;
    Ok(Json(attribute))
}

pub async fn delete_attribute(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    if !state.db.delete_attribute(id).await? {
        return Err(not_found("Attribute", id));
    }
    tracing::info!(attribute_id = id, "Attribute deleted");
    Ok(StatusCode::NO_CONTENT)
}
