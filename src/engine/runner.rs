// ModuleRunner - 1モジュールを1つの入力ツリーに対して実行する

use super::context::RunContext;
use crate::core::{
    BatchError, BatchResult, FileResult, FileTask, ModuleContract, ProgressEvent, RunnerState,
};
use crate::services::enumeration::FileEnumerator;
use std::any::Any;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinError;
use tracing::debug;

/// 1モジュール分の実行結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleOutcome {
    pub processed: usize,
    pub failed: usize,
    /// カウントパスで数えた件数
    pub total: usize,
    pub cancelled: bool,
}

/// モジュール単位のランナー
///
/// `Idle → Running → Completed` の順にのみ遷移する。
/// ファイル単位の失敗では止まらず、列挙の失敗だけが `Err` になる。
pub struct ModuleRunner {
    name: String,
    module: Arc<dyn ModuleContract>,
    file_timeout: Option<Duration>,
    state: RunnerState,
}

impl ModuleRunner {
    pub fn new(name: impl Into<String>, module: Arc<dyn ModuleContract>) -> Self {
        Self {
            name: name.into(),
            module,
            file_timeout: None,
            state: RunnerState::Idle,
        }
    }

    pub fn with_file_timeout(mut self, file_timeout: Option<Duration>) -> Self {
        self.file_timeout = file_timeout;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    /// 入力ツリーの全ファイルを処理し、結果を `ctx` の集計に追加する
    pub async fn run(
        &mut self,
        input_root: &Path,
        ctx: &mut RunContext,
    ) -> BatchResult<ModuleOutcome> {
        if self.state != RunnerState::Idle {
            return Err(BatchError::configuration(format!(
                "{} のランナーは既に使用済みです",
                self.name
            )));
        }
        self.state = RunnerState::Running;

        ctx.log().info(format!("Starting module {}", self.name));

        let enumerator = match FileEnumerator::open(input_root, &self.name, ctx.output_root()) {
            Ok(enumerator) => enumerator,
            Err(e) => {
                ctx.log().error(format!("Module {} aborted: {e}", self.name));
                self.state = RunnerState::Completed;
                return Err(e);
            }
        };

        let total = enumerator.count();
        let mut outcome = ModuleOutcome {
            processed: 0,
            failed: 0,
            total,
            cancelled: false,
        };

        for task in enumerator.tasks() {
            if ctx.is_cancelled() {
                outcome.cancelled = true;
                break;
            }

            let task = match task {
                Ok(task) => task,
                Err(e) => {
                    // 走査途中で読めなくなったエントリはタスクにしない
                    ctx.log().error(format!("{e:#}"));
                    continue;
                }
            };

            let result = self.execute(&task).await;

            outcome.processed += 1;
            if result.is_failed() {
                outcome.failed += 1;
                ctx.log().error(format!(
                    "Error on {}: {}",
                    task.source_path.display(),
                    result.reason()
                ));
            } else {
                ctx.log().info(format!(
                    "{} processed {}",
                    self.name,
                    task.source_path.display()
                ));
            }
            ctx.summary_mut().record(result);

            ctx.progress(ProgressEvent {
                module_name: self.name.clone(),
                current_file: task.file_name(),
                processed_count: outcome.processed,
                total_count: total,
                failure_count: outcome.failed,
            });
        }

        self.state = RunnerState::Completed;
        if outcome.cancelled {
            ctx.log().info(format!(
                "Module {} cancelled after {} of {} files.",
                self.name, outcome.processed, total
            ));
        }
        ctx.log().info(format!(
            "Module {} done: {} files, {} failures.",
            self.name, outcome.processed, outcome.failed
        ));

        Ok(outcome)
    }

    /// 1タスクを隔離して実行し、どんな失敗も `Failed` の結果に変換する
    async fn execute(&self, task: &FileTask) -> FileResult {
        if let Err(e) = std::fs::create_dir_all(&task.output_dir) {
            return FileResult::failed(
                task,
                format!(
                    "cannot create output directory {}: {e}",
                    task.output_dir.display()
                ),
            );
        }

        debug!(module = %self.name, "Processing file: {}", task.source_path.display());

        // 本体がスレッドをブロックしても上限で打ち切れるよう専用スレッドで動かす
        let module = Arc::clone(&self.module);
        let owned = task.clone();
        let runtime = Handle::current();
        let handle =
            tokio::task::spawn_blocking(move || runtime.block_on(module.process(&owned)));

        let joined = match self.file_timeout {
            // 上限を超えたタスクは切り離し、結果は待たない
            Some(limit) => match tokio::time::timeout(limit, handle).await {
                Ok(joined) => joined,
                Err(_) => return FileResult::failed(task, format!("timed out after {limit:?}")),
            },
            None => handle.await,
        };

        match joined {
            Ok(Ok(())) => FileResult::success(task),
            Ok(Err(e)) => FileResult::failed(task, format!("{e:#}")),
            Err(join_error) => FileResult::failed(task, join_failure_reason(join_error)),
        }
    }
}

fn join_failure_reason(error: JoinError) -> String {
    if error.is_panic() {
        format!("module panicked: {}", panic_message(error.into_panic()))
    } else {
        format!("module task aborted: {error}")
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
