use crate::config::FeedsConfig;
use crate::domain::model::{FeedDigest, FeedItem};
use crate::domain::ports::FeedFetcher;

/// Tags replaced before truncation, in order. Everything else is left for
/// the model to read.
const TAG_REPLACEMENTS: &[(&str, &str)] = &[
    ("<br>", " "),
    ("<br/>", " "),
    ("<br />", " "),
    ("<p>", ""),
    ("</p>", ""),
];

/// Strips break/paragraph tags, then keeps at most `max_chars` characters.
pub fn clean_summary(raw: &str, max_chars: usize) -> String {
    let cleaned = TAG_REPLACEMENTS
        .iter()
        .fold(raw.to_string(), |text, (tag, replacement)| {
            text.replace(tag, replacement)
        });
    cleaned.chars().take(max_chars).collect()
}

/// Reads every source in order. A failing source is logged and skipped.
pub async fn aggregate_feeds(fetcher: &dyn FeedFetcher, config: &FeedsConfig) -> FeedDigest {
    let mut digest = FeedDigest::default();

    for source in &config.sources {
        match fetcher.fetch_feed(&source.name, &source.url).await {
            Ok(entries) => {
                let taken = entries.len().min(config.max_entries_per_source);
                digest.items.extend(
                    entries
                        .into_iter()
                        .take(config.max_entries_per_source)
                        .map(|entry| FeedItem {
                            summary: clean_summary(&entry.summary, config.summary_max_chars),
                            ..entry
                        }),
                );
                tracing::debug!("📰 {}: {} entries", source.name, taken);
            }
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", source.name, e);
                digest.failed_sources.push(source.name.clone());
            }
        }
    }

    tracing::info!(
        "Collected {} news items from {}/{} sources",
        digest.items.len(),
        config.sources.len() - digest.failed_sources.len(),
        config.sources.len()
    );
    digest
}
