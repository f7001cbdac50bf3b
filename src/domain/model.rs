use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `daily` block of an Open-Meteo forecast; index 0 is today, 1 is tomorrow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub temperature_2m_max: Vec<f64>,
    pub temperature_2m_min: Vec<f64>,
    pub precipitation_probability_max: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub daily: DailyForecast,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    pub source: String,
    pub title: String,
    pub summary: String,
}

impl FeedItem {
    pub fn render(&self) -> String {
        format!(
            "SOURCE: {}\nTITLE: {}\nSUMMARY: {}\n\n",
            self.source, self.title, self.summary
        )
    }
}

/// News gathered in one run, in source order then entry order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedDigest {
    pub items: Vec<FeedItem>,
    pub failed_sources: Vec<String>,
}

impl FeedDigest {
    /// Aggregate text blob handed to the generator; empty when nothing was read.
    pub fn render(&self) -> String {
        self.items.iter().map(FeedItem::render).collect()
    }

    pub fn is_degraded(&self) -> bool {
        !self.failed_sources.is_empty()
    }
}

/// Text produced by a stage that never aborts the run.
///
/// A degraded output carries the error message in place of the data so that
/// downstream stages still receive something to work with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutput {
    Ready(String),
    Degraded { text: String, error: String },
}

/// Escapes the characters Telegram's HTML parse mode treats as markup.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

impl StageOutput {
    /// `text` is `"{label}: {error}"` with the error HTML-escaped; `error` keeps
    /// the raw message for logs.
    pub fn degraded(label: &str, error: impl std::fmt::Display) -> Self {
        let error = error.to_string();
        StageOutput::Degraded {
            text: format!("{}: {}", label, escape_html(&error)),
            error,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            StageOutput::Ready(text) => text,
            StageOutput::Degraded { text, .. } => text,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, StageOutput::Degraded { .. })
    }
}

/// Output of the extract step: weather text and the news digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gathered {
    pub weather: StageOutput,
    pub news: FeedDigest,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Ids assigned by the messaging service, one per chunk sent
    pub message_ids: Vec<i64>,
    pub attempts: u32,
}

impl Delivery {
    pub fn messages_sent(&self) -> usize {
        self.message_ids.len()
    }
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub weather_degraded: bool,
    pub failed_sources: Vec<String>,
    pub news_items: usize,
    pub brief_degraded: bool,
    pub delivery: Delivery,
}

impl RunReport {
    pub fn is_degraded(&self) -> bool {
        self.weather_degraded || !self.failed_sources.is_empty() || self.brief_degraded
    }

    /// 0 when every stage was clean, 2 when the brief went out degraded
    pub fn exit_code(&self) -> i32 {
        if self.is_degraded() {
            2
        } else {
            0
        }
    }
}
