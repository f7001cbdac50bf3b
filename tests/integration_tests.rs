use httpmock::prelude::*;
use morning_brief::adapters::TelegramClient;
use morning_brief::config::{FeedSourceConfig, GeminiConfig, TelegramConfig, WeatherConfig};
use morning_brief::utils::retry::RetryPolicy;
use morning_brief::{BriefEngine, BriefError, BriefSettings, Credentials, HttpPipeline};

const RSS_TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>{name}</title><link>https://example.com</link><description>d</description>
<item><title>{name} 1</title><description><![CDATA[<p>First<br>item</p>]]></description></item>
<item><title>{name} 2</title><description>Second item</description></item>
<item><title>{name} 3</title><description>Third item</description></item>
<item><title>{name} 4</title><description>Fourth item</description></item>
<item><title>{name} 5</title><description>Fifth item</description></item>
</channel></rss>"#;

fn credentials() -> Credentials {
    Credentials::from_lookup(|name| match name {
        "TELEGRAM_TOKEN" => Some("123:abc".to_string()),
        "TELEGRAM_CHAT_ID" => Some("-100777".to_string()),
        "GEMINI_API_KEY" => Some("gemini-key".to_string()),
        _ => None,
    })
    .unwrap()
}

fn settings_for(server: &MockServer, sources: &[&str]) -> BriefSettings {
    let mut settings = BriefSettings::default();
    settings.weather = WeatherConfig {
        base_url: server.base_url(),
        timeout_seconds: 5,
    };
    settings.gemini = GeminiConfig {
        base_url: server.base_url(),
        model: "gemini-test".to_string(),
        timeout_seconds: 5,
    };
    settings.telegram = TelegramConfig {
        base_url: server.base_url(),
        retry: RetryPolicy {
            max_retries: 2,
            initial_delay_ms: 1,
            max_delay_ms: 5,
        },
        ..TelegramConfig::default()
    };
    settings.feeds.timeout_seconds = 5;
    settings.feeds.sources = sources
        .iter()
        .map(|name| FeedSourceConfig {
            name: name.to_string(),
            url: server.url(format!("/feeds/{}", name)),
        })
        .collect();
    settings
}

fn mock_forecast(server: &MockServer) -> httpmock::Mock<'_> {
    server.mock(|when, then| {
        when.method(GET).path("/forecast");
        then.status(200).json_body(serde_json::json!({
            "daily": {
                "temperature_2m_max": [30, 28],
                "temperature_2m_min": [20, 19],
                "precipitation_probability_max": [10, 5]
            }
        }));
    })
}

fn mock_feed<'a>(server: &'a MockServer, name: &str) -> httpmock::Mock<'a> {
    let body = RSS_TEMPLATE.replace("{name}", name);
    let path = format!("/feeds/{}", name);
    server.mock(move |when, then| {
        when.method(GET).path(path);
        then.status(200)
            .header("Content-Type", "application/rss+xml")
            .body(body);
    })
}

fn gemini_reply(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{"content": {"parts": [{"text": text}]}, "finishReason": "STOP"}]
    })
}

fn engine_for(settings: BriefSettings) -> BriefEngine<HttpPipeline<TelegramClient>> {
    let credentials = credentials();
    let sender = TelegramClient::new(
        &settings.telegram,
        &credentials.telegram_token,
        &credentials.telegram_chat_id,
    )
    .unwrap();
    let pipeline = HttpPipeline::over_http(settings, &credentials, sender).unwrap();
    BriefEngine::new(pipeline)
}

#[tokio::test]
async fn test_end_to_end_brief_is_delivered() {
    let server = MockServer::start();
    let forecast_mock = mock_forecast(&server);
    let feed_a = mock_feed(&server, "alpha");
    let feed_b = mock_feed(&server, "beta");

    let gemini_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/models/gemini-test:generateContent")
            .header("x-goog-api-key", "gemini-key")
            .body_contains("Today: Max 30°C, Min 20°C. Rain: 10%")
            .body_contains("SOURCE: alpha")
            .body_contains("SUMMARY: First item")
            .body_contains("TITLE: beta 4");
        then.status(200)
            .json_body(gemini_reply("🌤️ <b>Weather (Salé)</b>\n⚽ <b>Sports</b>"));
    });

    let telegram_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/bot123:abc/sendMessage")
            .json_body(serde_json::json!({
                "chat_id": "-100777",
                "text": "🌤️ <b>Weather (Salé)</b>\n⚽ <b>Sports</b>",
                "parse_mode": "HTML"
            }));
        then.status(200)
            .json_body(serde_json::json!({"ok": true, "result": {"message_id": 9}}));
    });

    let report = engine_for(settings_for(&server, &["alpha", "beta"]))
        .run()
        .await
        .unwrap();

    forecast_mock.assert();
    feed_a.assert();
    feed_b.assert();
    gemini_mock.assert();
    telegram_mock.assert();

    assert_eq!(report.exit_code(), 0);
    assert_eq!(report.news_items, 8);
    assert_eq!(report.delivery.message_ids, vec![9]);
}

#[tokio::test]
async fn test_all_feeds_failing_still_generates_and_sends() {
    let server = MockServer::start();
    mock_forecast(&server);
    server.mock(|when, then| {
        when.method(GET).path_contains("/feeds/");
        then.status(503);
    });

    // 新聞區塊為空字串，提示詞以 "News Data:\n" 結尾
    let gemini_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/models/gemini-test:generateContent")
            .body_contains(r#"News Data:\n"}"#);
        then.status(200).json_body(gemini_reply("No major updates"));
    });
    let telegram_mock = server.mock(|when, then| {
        when.method(POST).path("/bot123:abc/sendMessage");
        then.status(200)
            .json_body(serde_json::json!({"ok": true, "result": {"message_id": 2}}));
    });

    let sources = ["bbc", "sky", "hespress", "asharq", "sports"];
    let report = engine_for(settings_for(&server, &sources))
        .run()
        .await
        .unwrap();

    gemini_mock.assert();
    telegram_mock.assert();
    assert_eq!(report.failed_sources.len(), 5);
    assert_eq!(report.news_items, 0);
    assert_eq!(report.exit_code(), 2);
}

#[tokio::test]
async fn test_upstream_failures_become_text_in_the_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/forecast");
        then.status(200).body("not json");
    });
    mock_feed(&server, "alpha");
    server.mock(|when, then| {
        when.method(POST).path("/models/gemini-test:generateContent");
        then.status(429).body("RESOURCE_EXHAUSTED");
    });
    let telegram_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/bot123:abc/sendMessage")
            .body_contains("AI Error: ")
            .body_contains("RESOURCE_EXHAUSTED")
            .json_body_partial(r#"{"chat_id": "-100777", "parse_mode": "HTML"}"#);
        then.status(200)
            .json_body(serde_json::json!({"ok": true, "result": {"message_id": 3}}));
    });

    let report = engine_for(settings_for(&server, &["alpha"]))
        .run()
        .await
        .unwrap();

    telegram_mock.assert();
    assert!(report.weather_degraded);
    assert!(report.brief_degraded);
    assert!(report.failed_sources.is_empty());
    assert_eq!(report.exit_code(), 2);
}

#[tokio::test]
async fn test_html_error_page_is_escaped_before_sending() {
    let server = MockServer::start();
    mock_forecast(&server);
    mock_feed(&server, "alpha");
    server.mock(|when, then| {
        when.method(POST).path("/models/gemini-test:generateContent");
        then.status(502)
            .header("Content-Type", "text/html")
            .body("<!DOCTYPE html><html lang=en><title>Error 502 (Server Error)</title></html>");
    });
    let telegram_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/bot123:abc/sendMessage")
            .body_contains("AI Error: ")
            .body_contains("&lt;!DOCTYPE html&gt;&lt;html lang=en&gt;")
            .json_body_partial(r#"{"parse_mode": "HTML"}"#);
        then.status(200)
            .json_body(serde_json::json!({"ok": true, "result": {"message_id": 4}}));
    });

    let report = engine_for(settings_for(&server, &["alpha"]))
        .run()
        .await
        .unwrap();

    telegram_mock.assert();
    assert!(report.brief_degraded);
    assert_eq!(report.exit_code(), 2);
}

#[tokio::test]
async fn test_send_failure_is_reported_after_retries() {
    let server = MockServer::start();
    mock_forecast(&server);
    mock_feed(&server, "alpha");
    server.mock(|when, then| {
        when.method(POST).path("/models/gemini-test:generateContent");
        then.status(200).json_body(gemini_reply("brief"));
    });
    let telegram_mock = server.mock(|when, then| {
        when.method(POST).path("/bot123:abc/sendMessage");
        then.status(502).body("Bad Gateway");
    });

    let err = engine_for(settings_for(&server, &["alpha"]))
        .run()
        .await
        .unwrap_err();

    // 1 次初始請求 + 2 次重試
    telegram_mock.assert_hits(3);
    match err {
        BriefError::DeliveryError { attempts, .. } => assert_eq!(attempts, 3),
        other => panic!("unexpected error: {other}"),
    }
}
