use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::{Permission, TokenVerifier};
use crate::error::ApiError;

/// State for one protected route: who verifies tokens and what they must grant
#[derive(Clone)]
pub struct PermissionGuard {
    pub verifier: Arc<TokenVerifier>,
    pub permission: Permission,
}

impl PermissionGuard {
    pub fn new(verifier: Arc<TokenVerifier>, permission: Permission) -> Self {
        Self { verifier, permission }
    }
}

/// Verifies the bearer token before the handler runs and injects its `Claims`
pub async fn require_permission(
    State(guard): State<PermissionGuard>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = guard
        .verifier
        .authorize(&headers, guard.permission)
        .await
        .map_err(|e| {
            tracing::warn!(
                "Rejected {} {} requiring {}: {} ({})",
                request.method(),
                request.uri().path(),
                guard.permission,
                e,
                e.code()
            );
            ApiError::from(e)
        })?;

    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}
