use crate::domain::model::{DailyForecast, Delivery, FeedItem, Gathered, StageOutput};
use crate::utils::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn fetch_forecast(&self) -> Result<DailyForecast>;
}

/// Reads one syndication feed and returns its entries in feed order.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch_feed(&self, name: &str, url: &str) -> Result<Vec<FeedItem>>;
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Sends one message and returns the id the service assigned to it.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_message(&self, text: &str) -> Result<i64>;
}

/// The three steps of one run. Extract and transform never fail; they fall
/// back to error text so that a brief always reaches the load step.
#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Gathered;
    async fn transform(&self, gathered: &Gathered) -> StageOutput;
    async fn load(&self, brief: &StageOutput) -> Result<Delivery>;
}
