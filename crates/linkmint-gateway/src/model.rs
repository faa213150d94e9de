use jiff::Timestamp;
use linkmint_core::Link;
use linkmint_shortener::AllocationOutcome;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateLinkRequest {
    pub original_url: String,
}

#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: u64,
    pub original_url: String,
    pub short_code: String,
    pub short_url: String,
    pub created_at: Timestamp,
}

impl LinkResponse {
    pub fn new(link: Link, base_url: &str) -> Self {
        Self {
            id: link.id,
            short_url: link.short_code.to_url(base_url),
            short_code: link.short_code.into(),
            original_url: link.original_url,
            created_at: link.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateLinkResponse {
    #[serde(flatten)]
    pub link: LinkResponse,
    pub status: AllocationOutcome,
}

#[derive(Debug, Deserialize)]
pub struct ListLinksQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ListLinksResponse {
    pub links: Vec<LinkResponse>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
