use crate::adapters::{GeminiClient, OpenMeteoClient, RssFetcher};
use crate::config::{BriefSettings, Credentials};
use crate::core::{brief, feeds, notify, weather};
use crate::domain::model::{Delivery, Gathered, StageOutput};
use crate::domain::ports::{FeedFetcher, ForecastProvider, LanguageModel, MessageSender, Pipeline};
use crate::utils::error::Result;

/// Weather → feeds → generation → delivery over injected ports.
pub struct BriefPipeline<W, F, L, M> {
    settings: BriefSettings,
    forecast: W,
    feeds: F,
    model: L,
    sender: M,
}

/// Production wiring: Open-Meteo, RSS, Gemini and any sender.
pub type HttpPipeline<M> = BriefPipeline<OpenMeteoClient, RssFetcher, GeminiClient, M>;

impl<W, F, L, M> BriefPipeline<W, F, L, M>
where
    W: ForecastProvider,
    F: FeedFetcher,
    L: LanguageModel,
    M: MessageSender,
{
    pub fn new(settings: BriefSettings, forecast: W, feeds: F, model: L, sender: M) -> Self {
        Self {
            settings,
            forecast,
            feeds,
            model,
            sender,
        }
    }
}

impl<M: MessageSender> HttpPipeline<M> {
    pub fn over_http(settings: BriefSettings, credentials: &Credentials, sender: M) -> Result<Self> {
        let forecast = OpenMeteoClient::new(&settings.weather, &settings.location)?;
        let feeds = RssFetcher::new(&settings.feeds)?;
        let model = GeminiClient::new(&settings.gemini, &credentials.gemini_api_key)?;
        Ok(Self::new(settings, forecast, feeds, model, sender))
    }
}

#[async_trait::async_trait]
impl<W, F, L, M> Pipeline for BriefPipeline<W, F, L, M>
where
    W: ForecastProvider,
    F: FeedFetcher,
    L: LanguageModel,
    M: MessageSender,
{
    async fn extract(&self) -> Gathered {
        let weather = weather::fetch_weather(&self.forecast, &self.settings.location.name).await;
        let news = feeds::aggregate_feeds(&self.feeds, &self.settings.feeds).await;
        Gathered { weather, news }
    }

    async fn transform(&self, gathered: &Gathered) -> StageOutput {
        brief::generate_brief(
            &self.model,
            &self.settings.prompt,
            &self.settings.location.name,
            gathered.weather.text(),
            &gathered.news.render(),
        )
        .await
    }

    async fn load(&self, brief: &StageOutput) -> Result<Delivery> {
        notify::deliver(
            &self.sender,
            brief.text(),
            self.settings.telegram.max_message_chars,
            &self.settings.telegram.retry,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ConsoleSender;
    use crate::utils::error::{BriefError, ErrorSeverity};

    fn credentials() -> Credentials {
        Credentials::from_lookup(|name| Some(format!("{}:value", name))).unwrap()
    }

    #[test]
    fn test_over_http_builds_default_clients() {
        assert!(HttpPipeline::over_http(BriefSettings::default(), &credentials(), ConsoleSender).is_ok());
    }

    #[test]
    fn test_client_setup_failure_is_config_error() {
        let mut settings = BriefSettings::default();
        settings.feeds.user_agent = "morning\nbrief".to_string();

        let err = match HttpPipeline::over_http(settings, &credentials(), ConsoleSender) {
            Ok(_) => panic!("expected client setup to fail"),
            Err(e) => e,
        };
        assert!(matches!(err, BriefError::ConfigError { .. }));
        assert_eq!(err.severity(), ErrorSeverity::High);
    }
}
