use crate::domain::ports::MessageSender;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Dry-run sender: prints the brief to stdout instead of delivering it.
#[derive(Debug, Default, Clone)]
pub struct ConsoleSender;

#[async_trait]
impl MessageSender for ConsoleSender {
    async fn send_message(&self, text: &str) -> Result<i64> {
        println!("----- brief (dry run) -----");
        println!("{}", text);
        println!("---------------------------");
        Ok(0)
    }
}
