use crate::core::prompt::PromptTemplate;
use crate::utils::error::{BriefError, Result};
use crate::utils::retry::RetryPolicy;
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BriefSettings {
    pub location: LocationConfig,
    pub weather: WeatherConfig,
    pub feeds: FeedsConfig,
    pub gemini: GeminiConfig,
    pub telegram: TelegramConfig,
    pub prompt: PromptTemplate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            name: "Salé".to_string(),
            latitude: 34.05,
            longitude: -6.82,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.open-meteo.com/v1".to_string(),
            timeout_seconds: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSourceConfig {
    pub name: String,
    pub url: String,
}

impl FeedSourceConfig {
    fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedsConfig {
    pub max_entries_per_source: usize,
    pub summary_max_chars: usize,
    pub timeout_seconds: u64,
    pub user_agent: String,
    pub sources: Vec<FeedSourceConfig>,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        Self {
            max_entries_per_source: 4,
            summary_max_chars: 200,
            timeout_seconds: 20,
            user_agent: format!("morning-brief/{}", env!("CARGO_PKG_VERSION")),
            sources: vec![
                FeedSourceConfig::new("BBC Arabic", "https://feeds.bbci.co.uk/arabic/rss.xml"),
                FeedSourceConfig::new("Sky News", "https://www.skynewsarabia.com/web/rss"),
                FeedSourceConfig::new("Hespress", "https://www.hespress.com/feed"),
                FeedSourceConfig::new("Asharq", "https://aawsat.com/feed"),
                FeedSourceConfig::new(
                    "Sports (Wydad/Real)",
                    "https://news.google.com/rss/search?q=Real+Madrid+OR+Wydad+Casablanca+OR+Equipe+Maroc+Football&hl=ar&gl=MA&ceid=MA:ar",
                ),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_seconds: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.0-flash".to_string(),
            timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    /// Longer briefs are split into several messages
    pub max_message_chars: usize,
    pub retry: RetryPolicy,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.telegram.org".to_string(),
            timeout_seconds: 15,
            max_message_chars: 4096,
            retry: RetryPolicy::default(),
        }
    }
}

impl BriefSettings {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析設定，缺少的欄位使用預設值
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BriefError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${FEED_URL})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BriefError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn validate_settings(&self) -> Result<()> {
        validate_non_empty_string("location.name", &self.location.name)?;
        validate_range("location.latitude", self.location.latitude, -90.0, 90.0)?;
        validate_range("location.longitude", self.location.longitude, -180.0, 180.0)?;

        validate_url("weather.base_url", &self.weather.base_url)?;
        validate_url("gemini.base_url", &self.gemini.base_url)?;
        validate_url("telegram.base_url", &self.telegram.base_url)?;
        validate_non_empty_string("gemini.model", &self.gemini.model)?;

        validate_positive_number(
            "feeds.max_entries_per_source",
            self.feeds.max_entries_per_source,
            1,
        )?;
        validate_positive_number("feeds.summary_max_chars", self.feeds.summary_max_chars, 1)?;
        validate_range(
            "telegram.max_message_chars",
            self.telegram.max_message_chars,
            1,
            4096,
        )?;

        for (index, source) in self.feeds.sources.iter().enumerate() {
            validate_non_empty_string(&format!("feeds.sources[{}].name", index), &source.name)?;
            validate_url(&format!("feeds.sources[{}].url", index), &source.url)?;
        }

        Ok(())
    }
}

impl Validate for BriefSettings {
    fn validate(&self) -> Result<()> {
        self.validate_settings()
    }
}
