use std::time::Duration;

use async_trait::async_trait;

/// Suspension between poll attempts.
#[async_trait]
pub trait Delay: Send + Sync {
    async fn wait(&self, duration: Duration);
}

/// Real timer backed by the tokio runtime.
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Returns immediately; lets tests run a full poll sequence without waiting.
pub struct NoDelay;

#[async_trait]
impl Delay for NoDelay {
    async fn wait(&self, _duration: Duration) {}
}
