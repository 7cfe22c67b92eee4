//! Classifier trait

use async_trait::async_trait;
use wordwarden_core::Verdict;

/// Anything that can classify a chat message
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify one message; never fails
    async fn classify(&self, message: &str) -> Verdict;

    /// Name of this classifier (tenant id for filter instances)
    fn name(&self) -> &str;

    /// Classify several messages in order
    async fn classify_all(&self, messages: &[String]) -> Vec<Verdict> {
        let mut verdicts = Vec::with_capacity(messages.len());
        for message in messages {
            verdicts.push(self.classify(message).await);
        }
        verdicts
    }
}
