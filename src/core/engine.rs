use crate::core::Pipeline;
use crate::domain::model::RunReport;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use chrono::Utc;

pub struct BriefEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> BriefEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Only a delivery error fails the run; upstream failures end up in the report.
    pub async fn run(&self) -> Result<RunReport> {
        let started_at = Utc::now();
        tracing::info!("Starting morning brief run");

        println!("Fetching data...");
        let gathered = self.pipeline.extract().await;
        if gathered.weather.is_degraded() {
            tracing::warn!("Weather stage degraded: {}", gathered.weather.text());
        }
        tracing::info!(
            "Gathered weather and {} news items ({} sources failed)",
            gathered.news.items.len(),
            gathered.news.failed_sources.len()
        );
        self.monitor.log_stage("Extract");

        println!("Thinking...");
        let brief = self.pipeline.transform(&gathered).await;
        self.monitor.log_stage("Generate");

        println!("Sending...");
        let delivery = self.pipeline.load(&brief).await?;
        tracing::info!(
            "✅ Delivered {} message(s) in {} attempt(s)",
            delivery.messages_sent(),
            delivery.attempts
        );
        self.monitor.log_stage("Deliver");
        self.monitor.log_final_stats();
        println!("Done!");

        Ok(RunReport {
            started_at,
            finished_at: Utc::now(),
            weather_degraded: gathered.weather.is_degraded(),
            news_items: gathered.news.items.len(),
            failed_sources: gathered.news.failed_sources,
            brief_degraded: brief.is_degraded(),
            delivery,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Delivery, FeedDigest, Gathered, StageOutput};
    use crate::utils::error::BriefError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ScriptedPipeline {
        gathered: Gathered,
        brief: StageOutput,
        fail_send: bool,
        loaded: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Pipeline for ScriptedPipeline {
        async fn extract(&self) -> Gathered {
            self.gathered.clone()
        }

        async fn transform(&self, _gathered: &Gathered) -> StageOutput {
            self.brief.clone()
        }

        async fn load(&self, brief: &StageOutput) -> Result<Delivery> {
            self.loaded.lock().unwrap().push(brief.text().to_string());
            if self.fail_send {
                return Err(BriefError::DeliveryError {
                    attempts: 4,
                    message: "connection refused".to_string(),
                });
            }
            Ok(Delivery {
                message_ids: vec![1],
                attempts: 1,
            })
        }
    }

    fn scripted(weather: StageOutput, brief: StageOutput, fail_send: bool) -> ScriptedPipeline {
        ScriptedPipeline {
            gathered: Gathered {
                weather,
                news: FeedDigest::default(),
            },
            brief,
            fail_send,
            loaded: Mutex::new(Vec::new()),
        }
    }

    #[tokio::test]
    async fn test_clean_run_reports_success() {
        let engine = BriefEngine::new(scripted(
            StageOutput::Ready("sunny".to_string()),
            StageOutput::Ready("<b>brief</b>".to_string()),
            false,
        ));

        let report = engine.run().await.unwrap();
        assert_eq!(report.exit_code(), 0);
        assert_eq!(report.delivery.messages_sent(), 1);
        assert_eq!(*engine.pipeline.loaded.lock().unwrap(), vec!["<b>brief</b>"]);
    }

    #[tokio::test]
    async fn test_degraded_brief_is_still_delivered() {
        let engine = BriefEngine::new(scripted(
            StageOutput::degraded("Weather Error", "timeout"),
            StageOutput::degraded("AI Error", "quota"),
            false,
        ));

        let report = engine.run().await.unwrap();
        assert!(report.weather_degraded);
        assert!(report.brief_degraded);
        assert_eq!(report.exit_code(), 2);
        assert_eq!(
            *engine.pipeline.loaded.lock().unwrap(),
            vec!["AI Error: quota"]
        );
    }

    #[tokio::test]
    async fn test_send_failure_propagates() {
        let engine = BriefEngine::new(scripted(
            StageOutput::Ready("sunny".to_string()),
            StageOutput::Ready("brief".to_string()),
            true,
        ));

        let err = engine.run().await.unwrap_err();
        assert!(matches!(err, BriefError::DeliveryError { .. }));
    }
}
