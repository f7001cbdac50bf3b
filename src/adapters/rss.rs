use crate::adapters::{build_client, ensure_success};
use crate::config::FeedsConfig;
use crate::domain::model::FeedItem;
use crate::domain::ports::FeedFetcher;
use crate::utils::error::Result;
use async_trait::async_trait;
use feed_rs::model::Entry;
use reqwest::Client;

/// Fetches RSS/Atom documents over HTTP and parses them with `feed-rs`.
#[derive(Debug, Clone)]
pub struct RssFetcher {
    client: Client,
}

impl RssFetcher {
    pub fn new(config: &FeedsConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config.timeout_seconds, Some(&config.user_agent))?,
        })
    }
}

// RSS <description> 與 Atom <summary> 都落在 summary，否則退回 content
fn entry_to_item(source: &str, entry: Entry) -> FeedItem {
    let title = entry.title.map(|t| t.content).unwrap_or_default();
    let summary = entry
        .summary
        .map(|s| s.content)
        .or_else(|| entry.content.and_then(|c| c.body))
        .unwrap_or_default();

    FeedItem {
        source: source.to_string(),
        title,
        summary,
    }
}

#[async_trait]
impl FeedFetcher for RssFetcher {
    async fn fetch_feed(&self, name: &str, url: &str) -> Result<Vec<FeedItem>> {
        tracing::debug!("Fetching feed '{}' from {}", name, url);

        let response = self.client.get(url).send().await?;
        let response = ensure_success(name, response).await?;
        let bytes = response.bytes().await?;

        let feed = feed_rs::parser::parse(bytes.as_ref())?;
        tracing::debug!("Feed '{}' returned {} entries", name, feed.entries.len());

        Ok(feed
            .entries
            .into_iter()
            .map(|entry| entry_to_item(name, entry))
            .collect())
    }
}
