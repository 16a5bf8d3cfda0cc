use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::Response,
};
use service_core::error::AppError;

use crate::models::User;
use crate::services::{metrics, OwnershipGate, ResourceKind};

/// Route-layer state: which kind the `:id` path parameter refers to.
#[derive(Clone)]
pub struct CreatorGuard {
    pub gate: OwnershipGate,
    pub kind: ResourceKind,
}

impl CreatorGuard {
    pub fn new(gate: OwnershipGate, kind: ResourceKind) -> Self {
        Self { gate, kind }
    }
}

/// Let the request through only if the caller created the `:id` resource.
///
/// Runs inside `auth_middleware`. A missing resource, an unparseable id and a
/// failed lookup are all rejected with 403.
pub async fn require_creator(
    State(guard): State<CreatorGuard>,
    Path(id): Path<String>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = req.extensions().get::<User>();

    let allowed = match id.parse::<i64>() {
        Ok(id) => guard.gate.is_creator(guard.kind, id, identity).await,
        Err(_) => false,
    };

    if !allowed {
        tracing::info!(
            kind = %guard.kind,
            resource_id = %id,
            user_id = identity.map(|u| u.id),
            "Mutation denied: caller is not the creator"
        );
        metrics::record_ownership_denial(guard.kind.as_str());
        return Err(AppError::Forbidden(anyhow::anyhow!(
            "Only the creator of this {} may modify it",
            guard.kind
        )));
    }

    Ok(next.run(req).await)
}
