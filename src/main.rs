use clap::Parser;
use morning_brief::adapters::{ConsoleSender, TelegramClient};
use morning_brief::core::{MessageSender, RunReport};
use morning_brief::utils::error::{BriefError, ErrorSeverity};
use morning_brief::utils::{logger, validation::Validate};
use morning_brief::{BriefEngine, BriefSettings, CliConfig, Credentials, HttpPipeline};

/// 結束碼：0 成功、2 資料降級但已送出、1 設定錯誤、3 傳送失敗
fn exit_code_for(error: &BriefError) -> i32 {
    match error.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn fail(error: BriefError) -> ! {
    tracing::error!(
        "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
        error,
        error.category(),
        error.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", error.recovery_suggestion());
    eprintln!("❌ {}", error.user_friendly_message());
    eprintln!("💡 {}", error.recovery_suggestion());
    std::process::exit(exit_code_for(&error));
}

fn load_configuration(config: &CliConfig) -> morning_brief::Result<(BriefSettings, Credentials)> {
    let settings = config.load_settings()?;
    settings.validate()?;
    let credentials = Credentials::from_env()?;
    credentials.validate()?;
    Ok((settings, credentials))
}

async fn run_with<M: MessageSender>(
    settings: BriefSettings,
    credentials: &Credentials,
    sender: M,
    monitor: bool,
) -> morning_brief::Result<RunReport> {
    let pipeline = HttpPipeline::over_http(settings, credentials, sender)?;
    BriefEngine::new_with_monitoring(pipeline, monitor).run().await
}

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("🚀 Starting morning-brief");
    tracing::debug!("CLI config: {:?}", config);

    let (settings, credentials) = match load_configuration(&config) {
        Ok(loaded) => loaded,
        Err(e) => fail(e),
    };
    tracing::debug!("Credentials: {:?}", credentials);
    tracing::info!(
        "✅ Configuration loaded: {} feed source(s), model {}",
        settings.feeds.sources.len(),
        settings.gemini.model
    );

    let result = if config.dry_run {
        tracing::info!("🔍 DRY RUN MODE - the brief will be printed, not sent");
        run_with(settings, &credentials, ConsoleSender, config.monitor).await
    } else {
        let sender = match TelegramClient::new(
            &settings.telegram,
            &credentials.telegram_token,
            &credentials.telegram_chat_id,
        ) {
            Ok(sender) => sender,
            Err(e) => fail(e),
        };
        run_with(settings, &credentials, sender, config.monitor).await
    };

    match result {
        Ok(report) => {
            let elapsed = report.finished_at - report.started_at;
            if report.is_degraded() {
                tracing::warn!(
                    "⚠️ Brief sent with degraded data (weather: {}, failed feeds: {:?}, generation: {}) in {}ms",
                    if report.weather_degraded { "error" } else { "ok" },
                    report.failed_sources,
                    if report.brief_degraded { "error" } else { "ok" },
                    elapsed.num_milliseconds()
                );
            } else {
                tracing::info!(
                    "✅ Brief sent with {} news items in {}ms",
                    report.news_items,
                    elapsed.num_milliseconds()
                );
            }

            let exit_code = report.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
        Err(e) => fail(e),
    }
}
