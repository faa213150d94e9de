//! HTTP binding for the linkmint shortener.

pub mod app;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use state::AppState;
