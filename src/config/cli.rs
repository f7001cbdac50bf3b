use crate::config::settings::BriefSettings;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "morning-brief")]
#[command(about = "Sends a daily weather and news brief to Telegram")]
pub struct CliConfig {
    /// Optional TOML settings file; built-in defaults are used when omitted
    #[arg(short, long, env = "MORNING_BRIEF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the brief instead of sending it
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(long, help = "Log CPU and memory usage after each stage")]
    pub monitor: bool,
}

impl CliConfig {
    pub fn load_settings(&self) -> Result<BriefSettings> {
        match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading settings from: {}", path.display());
                BriefSettings::from_file(path)
            }
            None => Ok(BriefSettings::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_flags() {
        let config = CliConfig::parse_from([
            "morning-brief",
            "--config",
            "brief.toml",
            "--dry-run",
            "-v",
        ]);

        assert_eq!(config.config, Some(PathBuf::from("brief.toml")));
        assert!(config.dry_run);
        assert!(config.verbose);
        assert!(!config.monitor);
    }

    #[test]
    fn test_defaults_without_config_file() {
        let config = CliConfig {
            config: None,
            dry_run: false,
            verbose: false,
            log_json: false,
            monitor: false,
        };

        let settings = config.load_settings().unwrap();
        assert_eq!(settings.feeds.sources.len(), 5);
    }
}
