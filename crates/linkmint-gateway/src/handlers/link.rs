use crate::error::Result;
use crate::extract::{AppJson, AppQuery};
use crate::model::{
    CreateLinkRequest, CreateLinkResponse, LinkResponse, ListLinksQuery, ListLinksResponse,
};
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::info;

pub const DEFAULT_LIST_LIMIT: usize = 50;
pub const MAX_LIST_LIMIT: usize = 500;

pub async fn create_link_handler(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateLinkRequest>,
) -> Result<Response> {
    let allocation = state.shortener().shorten(&request.original_url).await?;

    let status = if allocation.is_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    info!(
        code = %allocation.link.short_code,
        outcome = ?allocation.outcome,
        "served short link"
    );

    let body = CreateLinkResponse {
        status: allocation.outcome,
        link: LinkResponse::new(allocation.link, state.base_url()),
    };
    Ok((status, Json(body)).into_response())
}

pub async fn list_links_handler(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListLinksQuery>,
) -> Result<Json<ListLinksResponse>> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);

    let links = state.shortener().recent(limit).await?;
    let links = links
        .into_iter()
        .map(|link| LinkResponse::new(link, state.base_url()))
        .collect();

    Ok(Json(ListLinksResponse { links }))
}
