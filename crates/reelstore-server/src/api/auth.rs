//! Instagram OAuth endpoints for the admin flow: consent URL and code
//! exchange. The OAuth client is built per request from app config so a
//! deployment without credentials fails with a named configuration error
//! instead of failing startup.

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use super::{map_ingest_error, ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;
use reelstore_ingest::{InstagramOAuth, OAuthSettings};

#[derive(Debug, Deserialize)]
pub struct ExchangeRequest {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct AuthUrlData {
    pub auth_url: String,
}

#[derive(Debug, Serialize)]
pub struct TokenData {
    pub access_token: String,
    pub user_id: Option<i64>,
}

fn oauth_client(state: &AppState, req_id: &str) -> Result<InstagramOAuth, ApiError> {
    let settings = OAuthSettings::from_app_config(&state.config)
        .map_err(|e| map_ingest_error(req_id.to_string(), &e))?;
    InstagramOAuth::new(settings, state.config.ingest_request_timeout_secs)
        .map_err(|e| map_ingest_error(req_id.to_string(), &e))
}

/// `GET /api/v1/auth/instagram/url` — the consent URL to send an admin to.
pub async fn authorization_url(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<AuthUrlData>>, ApiError> {
    let oauth = oauth_client(&state, &req_id.0)?;

    Ok(Json(ApiResponse {
        data: AuthUrlData {
            auth_url: oauth.authorization_url(),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// `POST /api/v1/auth/instagram/exchange` — trades an authorization code
/// for a (long-lived where possible) access token.
pub async fn exchange_code(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ExchangeRequest>,
) -> Result<Json<ApiResponse<TokenData>>, ApiError> {
    let code = body.code.trim();
    if code.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "code must not be empty",
        ));
    }

    let oauth = oauth_client(&state, &req_id.0)?;
    let exchange = oauth
        .exchange_code(code)
        .await
        .map_err(|e| map_ingest_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: TokenData {
            access_token: exchange.access_token,
            user_id: exchange.user_id,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
