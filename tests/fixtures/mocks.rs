use anyhow::{bail, Result};
use async_trait::async_trait;
use batch_tester::{FileTask, ModuleContract};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// 指定したファイル名でだけ失敗するモジュール
#[derive(Debug, Default)]
pub struct ScriptedModule {
    failing: HashSet<String>,
    delay: Duration,
    calls: AtomicUsize,
}

impl ScriptedModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(names: &[&str]) -> Self {
        Self {
            failing: names.iter().map(|n| n.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl ModuleContract for ScriptedModule {
    async fn process(&self, task: &FileTask) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.failing.contains(&task.file_name()) {
            bail!("scripted failure for {}", task.file_name());
        }
        std::fs::write(task.output_dir.join(format!("{}.out", task.file_name())), "ok")?;
        Ok(())
    }
}

/// 呼び出されるたびに失敗するモジュール
#[derive(Debug, Default)]
pub struct AlwaysFailing;

#[async_trait]
impl ModuleContract for AlwaysFailing {
    async fn process(&self, task: &FileTask) -> Result<()> {
        bail!("cannot process {}", task.source_path.display())
    }
}

/// ルート直下のファイルを処理するたびに `<input>/sub/` へファイルを足すモジュール
///
/// カウントパスの後でツリーが増えるケースを再現する。
#[derive(Debug)]
pub struct GrowingInput {
    input_root: PathBuf,
}

impl GrowingInput {
    pub fn new(input_root: &Path) -> Self {
        Self {
            input_root: input_root.to_path_buf(),
        }
    }
}

#[async_trait]
impl ModuleContract for GrowingInput {
    async fn process(&self, task: &FileTask) -> Result<()> {
        if task.relative_dir.as_os_str().is_empty() {
            let added = self
                .input_root
                .join("sub")
                .join(format!("added_{}", task.file_name()));
            std::fs::write(added, "late")?;
        }
        Ok(())
    }
}
