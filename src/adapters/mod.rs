// Adapters layer: concrete implementations of the domain ports over HTTP.

pub mod console;
pub mod gemini;
pub mod open_meteo;
pub mod rss;
pub mod telegram;

pub use console::ConsoleSender;
pub use gemini::GeminiClient;
pub use open_meteo::OpenMeteoClient;
pub use rss::RssFetcher;
pub use telegram::TelegramClient;

use crate::utils::error::{BriefError, Result};
use reqwest::{Client, Response};
use std::time::Duration;

const ERROR_BODY_EXCERPT_CHARS: usize = 300;

/// Client construction happens before anything is sent, so its failures are
/// reported as configuration errors.
pub(crate) fn build_client(timeout_seconds: u64, user_agent: Option<&str>) -> Result<Client> {
    let mut builder = Client::builder().timeout(Duration::from_secs(timeout_seconds));
    if let Some(agent) = user_agent {
        builder = builder.user_agent(agent.to_string());
    }
    builder.build().map_err(|e| BriefError::ConfigError {
        message: format!("failed to build HTTP client: {}", e),
    })
}

/// Turns a non-2xx response into an [`BriefError::UpstreamError`] with a body excerpt.
pub(crate) async fn ensure_success(service: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(BriefError::UpstreamError {
        service: service.to_string(),
        status: status.as_u16(),
        body: body.chars().take(ERROR_BODY_EXCERPT_CHARS).collect(),
    })
}
