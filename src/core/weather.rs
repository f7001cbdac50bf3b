use crate::domain::model::{DailyForecast, StageOutput};
use crate::domain::ports::ForecastProvider;
use crate::utils::error::{BriefError, Result};

pub const WEATHER_ERROR_LABEL: &str = "Weather Error";

fn day(values: &[f64], index: usize, field: &str) -> Result<f64> {
    values
        .get(index)
        .copied()
        .ok_or_else(|| BriefError::ResponseShapeError {
            service: "open-meteo".to_string(),
            message: format!(
                "daily.{} has {} value(s), expected at least 2",
                field,
                values.len()
            ),
        })
}

/// Header line plus today/tomorrow lines. `f64` display keeps `30` as `30`
/// and `23.4` as `23.4`.
pub fn format_summary(location: &str, daily: &DailyForecast) -> Result<String> {
    let max = |i| day(&daily.temperature_2m_max, i, "temperature_2m_max");
    let min = |i| day(&daily.temperature_2m_min, i, "temperature_2m_min");
    let rain = |i| {
        day(
            &daily.precipitation_probability_max,
            i,
            "precipitation_probability_max",
        )
    };

    let today = format!("Today: Max {}°C, Min {}°C. Rain: {}%", max(0)?, min(0)?, rain(0)?);
    let tomorrow = format!("Tomorrow: Max {}°C, Min {}°C", max(1)?, min(1)?);

    Ok(format!("🌤️ WEATHER ({}):\n{}\n{}", location, today, tomorrow))
}

/// Never fails: any error becomes `Weather Error: ...` text.
pub async fn fetch_weather(provider: &dyn ForecastProvider, location: &str) -> StageOutput {
    let result = match provider.fetch_forecast().await {
        Ok(daily) => format_summary(location, &daily),
        Err(e) => Err(e),
    };

    match result {
        Ok(summary) => StageOutput::Ready(summary),
        Err(e) => {
            tracing::warn!("⚠️ Weather fetch failed: {}", e);
            StageOutput::degraded(WEATHER_ERROR_LABEL, e)
        }
    }
}
