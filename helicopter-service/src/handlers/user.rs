use axum::Json;

use crate::{middleware::AuthUser, models::UserResponse};

/// The authenticated identity, without its password hash
pub async fn get_me(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}
