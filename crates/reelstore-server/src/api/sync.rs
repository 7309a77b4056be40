//! Ingestion trigger endpoints: profile sync and token-based media sync.

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use super::{map_ingest_error, ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub struct ProfileSyncRequest {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct MediaSyncRequest {
    pub access_token: String,
}

#[derive(Debug, Serialize)]
pub struct SyncData {
    pub success: bool,
    pub new_reels: usize,
    pub message: String,
}

/// `POST /api/v1/sync` — runs one profile sync to completion.
pub async fn sync_profile(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ProfileSyncRequest>,
) -> Result<Json<ApiResponse<SyncData>>, ApiError> {
    let username = body.username.trim();
    if username.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "username must not be empty",
        ));
    }

    let outcome = state
        .sync
        .sync_profile(username)
        .await
        .map_err(|e| map_ingest_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: SyncData {
            success: true,
            new_reels: outcome.new_reels,
            message: outcome.message,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// `POST /api/v1/sync/media` — syncs the authenticated account's videos
/// through the Graph API using a caller-supplied access token.
pub async fn sync_media(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<MediaSyncRequest>,
) -> Result<Json<ApiResponse<SyncData>>, ApiError> {
    let token = body.access_token.trim();
    if token.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "access_token must not be empty",
        ));
    }

    let outcome = state
        .sync
        .sync_media(&state.graph, token)
        .await
        .map_err(|e| map_ingest_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: SyncData {
            success: true,
            new_reels: outcome.new_reels,
            message: outcome.message,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
