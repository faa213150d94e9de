use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    analytics_handler, create_link_handler, health_handler, list_links_handler, redirect_handler,
};
use crate::state::AppState;

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .nest(
                "/api",
                Router::new()
                    .route(
                        "/links",
                        get(list_links_handler).post(create_link_handler),
                    )
                    .route("/analytics", get(analytics_handler)),
            )
            .route("/{short_code}", get(redirect_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
