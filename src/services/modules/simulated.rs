use crate::core::{FileTask, ModuleContract};
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// 処理時間だけを模擬するモジュール実装（常に成功）
#[derive(Clone, Debug)]
pub struct SimulatedModule {
    delay: Duration,
}

impl Default for SimulatedModule {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedModule {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);

    pub fn new() -> Self {
        Self::with_delay(Self::DEFAULT_DELAY)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl ModuleContract for SimulatedModule {
    async fn process(&self, task: &FileTask) -> Result<()> {
        debug!(
            module = %task.module_name,
            file = %task.source_path.display(),
            "simulated processing"
        );
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}
