//! Bearer-token middleware, adapted from the teacher's `auth_middleware`:
//! extract `Authorization: Bearer <token>`, validate, stamp the caller's
//! user id onto the request extensions for handlers to read.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::auth::jwt::JwtHandler;
use crate::error::{ApiError, ApiErrorResponse};
use crate::http::middleware::extract_request_id;

#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

pub async fn auth_middleware(
    State(jwt_handler): State<Arc<JwtHandler>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let request_id = extract_request_id(&req);

    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .ok_or_else(|| AuthError { request_id: request_id.clone() })?
        .to_string();

    let user_id = jwt_handler.validate_token(&token).map_err(|_| AuthError { request_id })?;
    req.extensions_mut().insert(AuthUser(user_id));

    Ok(next.run(req).await)
}

pub fn extract_user(req: &Request) -> Option<AuthUser> {
    req.extensions().get::<AuthUser>().copied()
}

/// Missing and invalid bearer tokens both render the same envelope every
/// other handler error uses (spec.md's error-code list has no separate
/// "missing token" code, so both collapse onto `ApiError::InvalidToken`).
#[derive(Debug)]
pub struct AuthError {
    request_id: crate::http::middleware::RequestId,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiErrorResponse { error: ApiError::InvalidToken, request_id: self.request_id.as_str().to_string() }
            .into_response()
    }
}
