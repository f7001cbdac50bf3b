use crate::adapters::{build_client, ensure_success};
use crate::config::{LocationConfig, WeatherConfig};
use crate::domain::model::{DailyForecast, ForecastResponse};
use crate::domain::ports::ForecastProvider;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;

const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,precipitation_probability_max";

/// Open-Meteo daily forecast for a single fixed location.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
    latitude: f64,
    longitude: f64,
}

impl OpenMeteoClient {
    pub fn new(weather: &WeatherConfig, location: &LocationConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(weather.timeout_seconds, None)?,
            base_url: weather.base_url.trim_end_matches('/').to_string(),
            latitude: location.latitude,
            longitude: location.longitude,
        })
    }
}

#[async_trait]
impl ForecastProvider for OpenMeteoClient {
    async fn fetch_forecast(&self) -> Result<DailyForecast> {
        let url = format!("{}/forecast", self.base_url);
        tracing::debug!("Requesting forecast from {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("latitude", self.latitude.to_string()),
                ("longitude", self.longitude.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await?;
        let response = ensure_success("open-meteo", response).await?;

        let body = response.text().await?;
        let forecast: ForecastResponse = serde_json::from_str(&body)?;
        Ok(forecast.daily)
    }
}
