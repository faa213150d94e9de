use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use linkmint_shortener::Analytics;

/// Never fails. A sink that cannot be read contributes empty results.
pub async fn analytics_handler(State(state): State<AppState>) -> Json<Analytics> {
    Json(state.analytics().aggregate().await)
}
