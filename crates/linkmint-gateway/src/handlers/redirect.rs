use crate::error::{AppError, Result};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::header::{REFERER, USER_AGENT};
use axum::http::HeaderMap;
use axum::response::Redirect;
use linkmint_core::{ClickLogEntry, ShortCode};

pub async fn redirect_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Redirect> {
    let not_found = || AppError::NotFound(format!("short code {short_code} not found"));

    let code = ShortCode::new(short_code.as_str()).map_err(|_| not_found())?;
    let link = state.shortener().resolve(&code).await?.ok_or_else(not_found)?;

    let mut entry = ClickLogEntry::now(&code);
    if let Some(agent) = headers.get(USER_AGENT).and_then(|v| v.to_str().ok()) {
        entry = entry.with_metadata("user_agent", agent);
    }
    if let Some(referer) = headers.get(REFERER).and_then(|v| v.to_str().ok()) {
        entry = entry.with_metadata("referer", referer);
    }
    // The redirect is not held back by the click write.
    let _ = state.clicks().record(entry);

    Ok(Redirect::temporary(&link.original_url))
}
