//! `GET /launches`

use axum::{
    extract::{RawQuery, State},
    Json,
};

use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::launches::model::{Launch, Rocket, TransformedLaunch};
use crate::launches::query::parse_page;
use crate::launches::transform::{decode_list, paginate, transform_launches};
use crate::upstream::client::{LAUNCHES, ROCKETS};

/// Validate the query, fetch both listings, join them and return one page.
///
/// Both upstream calls run concurrently. When both fail the launches error is
/// the one reported.
pub async fn list_launches(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<TransformedLaunch>>, ApiError> {
    let page = parse_page(query.as_deref(), state.default_limit)?;

    let (launches, rockets) = tokio::join!(state.upstream.launches(), state.upstream.rockets());
    let launches = launches.map_err(|e| ApiError::upstream(LAUNCHES, e))?;
    let rockets = rockets.map_err(|e| ApiError::upstream(ROCKETS, e))?;

    let launches: Vec<Launch> = decode_list(LAUNCHES, launches)?;
    let rockets: Vec<Rocket> = decode_list(ROCKETS, rockets)?;
    let total = launches.len();

    let body = paginate(transform_launches(launches, rockets), page);
    tracing::debug!(
        total,
        returned = body.len(),
        limit = page.limit,
        offset = page.offset,
        "Launches page built"
    );

    Ok(Json(body))
}
