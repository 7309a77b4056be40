//! Catalog endpoints: the public storefront listing and admin deletion.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;
use reelstore_db::VisibleReelRow;

/// A reel as served to the storefront, flattened with creator identity.
#[derive(Debug, Serialize)]
pub struct ReelItem {
    pub id: i64,
    pub caption: Option<String>,
    pub thumbnail_image_url: Option<String>,
    pub instagram_video_url: Option<String>,
    pub product_name: String,
    pub affiliate_link: String,
    pub tags: Option<String>,
    pub created_at: DateTime<Utc>,
    pub post_date: Option<DateTime<Utc>>,
    pub creator_name: Option<String>,
    pub creator_handle: Option<String>,
}

impl From<VisibleReelRow> for ReelItem {
    fn from(row: VisibleReelRow) -> Self {
        Self {
            id: row.id,
            caption: row.caption,
            thumbnail_image_url: row.thumbnail_image_url,
            instagram_video_url: row.instagram_video_url,
            product_name: row.product_name,
            affiliate_link: row.affiliate_link,
            tags: row.tags,
            created_at: row.created_at,
            post_date: row.post_date,
            creator_name: row.creator_name,
            creator_handle: row.creator_handle,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteData {
    pub deleted: bool,
    pub id: i64,
}

/// `GET /api/v1/reels` — all visible reels, newest post first.
pub async fn list_reels(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<ReelItem>>>, ApiError> {
    let rows = reelstore_db::list_visible_reels(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: rows.into_iter().map(ReelItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// `DELETE /api/v1/reels/{id}` — removes a reel from the catalog outright.
pub async fn delete_reel(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<DeleteData>>, ApiError> {
    match reelstore_db::delete_reel(&state.pool, id).await {
        Ok(()) => Ok(Json(ApiResponse {
            data: DeleteData { deleted: true, id },
            meta: ResponseMeta::new(req_id.0),
        })),
        Err(reelstore_db::DbError::NotFound) => Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("no reel with id {id}"),
        )),
        Err(e) => Err(map_db_error(req_id.0, &e)),
    }
}
