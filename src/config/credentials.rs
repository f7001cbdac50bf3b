use crate::utils::error::{BriefError, Result};
use crate::utils::validation::Validate;
use std::fmt;

pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Secrets for the messaging and language-model APIs.
#[derive(Clone)]
pub struct Credentials {
    pub telegram_token: String,
    pub telegram_chat_id: String,
    pub gemini_api_key: String,
}

impl Credentials {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| -> Result<String> {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or_else(|| BriefError::MissingConfigError {
                    field: name.to_string(),
                })
        };

        Ok(Self {
            telegram_token: required(TELEGRAM_TOKEN_VAR)?,
            telegram_chat_id: required(TELEGRAM_CHAT_ID_VAR)?,
            gemini_api_key: required(GEMINI_API_KEY_VAR)?,
        })
    }
}

impl Validate for Credentials {
    fn validate(&self) -> Result<()> {
        // bot token 格式為 "<bot id>:<secret>"
        if !self.telegram_token.contains(':') {
            return Err(BriefError::InvalidConfigValueError {
                field: TELEGRAM_TOKEN_VAR.to_string(),
                value: "<redacted>".to_string(),
                reason: "Bot token must look like '<bot id>:<secret>'".to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("telegram_token", &"<redacted>")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("gemini_api_key", &"<redacted>")
            .finish()
    }
}
