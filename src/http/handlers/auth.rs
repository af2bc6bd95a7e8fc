//! Signup / login / current-user endpoints, shaped after the teacher's
//! `auth::api::login`: a `State<AppState>` + `Json<Request>` handler
//! returning `Result<Json<Response>, ...>`, credential checks first, token
//! issuance last.

use axum::extract::State;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::http::handlers::{fail, ok, wrap, HandlerResult};
use crate::http::middleware::RequestId;
use crate::http::state::AppState;
use crate::models::{User, UserResponse};

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_locale() -> String {
    "en-US".to_string()
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user_id: Uuid,
    pub access_token: String,
}

pub async fn signup(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(payload): Json<SignupRequest>,
) -> HandlerResult<AuthResponse> {
    if payload.password.len() < 8 {
        return fail(&request_id, ApiError::invalid_input("password must be at least 8 characters"));
    }
    if !payload.email.contains('@') {
        return fail(&request_id, ApiError::invalid_input("email is not valid"));
    }
    if state.store.users.find_by_email(&payload.email).is_some() {
        return fail(&request_id, ApiError::EmailAlreadyExists);
    }

    let password_hash = match bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(_) => return fail(&request_id, ApiError::Unknown),
    };

    let user = User {
        id: state.ids.new_id(),
        email: payload.email.clone(),
        password_hash,
        locale: payload.locale,
        created_at_utc: state.clock.now(),
    };

    let created = match state.store.users.create(user) {
        Ok(user) => user,
        Err(err) => return fail(&request_id, err.into()),
    };

    info!(user_id = %created.id, "user signed up");
    issue_token(&state, &request_id, &created)
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(payload): Json<LoginRequest>,
) -> HandlerResult<AuthResponse> {
    let user = match state.store.users.find_by_email(&payload.email) {
        Some(user) => user,
        None => return fail(&request_id, ApiError::InvalidCredentials),
    };

    let matches = bcrypt::verify(&payload.password, &user.password_hash).unwrap_or(false);
    if !matches {
        return fail(&request_id, ApiError::InvalidCredentials);
    }

    issue_token(&state, &request_id, &user)
}

fn issue_token(state: &AppState, request_id: &RequestId, user: &User) -> HandlerResult<AuthResponse> {
    match state.jwt_handler.generate_token(user.id) {
        Ok(access_token) => ok(AuthResponse { user_id: user.id, access_token }),
        Err(_) => fail(request_id, ApiError::Unknown),
    }
}

pub async fn me(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Extension(auth_user): Extension<crate::auth::AuthUser>,
) -> HandlerResult<UserResponse> {
    let result: Result<UserResponse, ApiError> =
        lookup_user(&state, auth_user.0).map(|u| UserResponse::from(&u));
    wrap(&request_id, result)
}

fn lookup_user(state: &AppState, user_id: Uuid) -> Result<User, ApiError> {
    state.store.users.get(user_id).map_err(ApiError::from)
}
