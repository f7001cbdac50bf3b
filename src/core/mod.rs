pub mod brief;
pub mod engine;
pub mod feeds;
pub mod notify;
pub mod pipeline;
pub mod prompt;
pub mod weather;

pub use crate::domain::model::{Delivery, FeedDigest, FeedItem, Gathered, RunReport, StageOutput};
pub use crate::domain::ports::{
    FeedFetcher, ForecastProvider, LanguageModel, MessageSender, Pipeline,
};
pub use crate::utils::error::Result;
