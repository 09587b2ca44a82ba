// RunCoordinator - 単一モジュールのランとバッチランのライフサイクル管理

use super::context::RunContext;
use super::control::{CancelToken, RunSlot};
use super::runner::ModuleRunner;
use crate::core::{
    BatchError, BatchResult, EngineConfig, ModuleSpec, RunEvent, RunKind, RunReport, RunRequest,
};
use crate::services::modules::ModuleRegistry;
use crate::services::monitoring::{progress_channel, EventReceiver, EventSender};
use crate::services::persistence::SummaryWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// ランの受付とバックグラウンド実行を担うコーディネーター
///
/// 入力検証と同時実行の拒否は呼び出し元へ同期的に返し、
/// 受理したランは専用のタスクで実行する。
/// 同時に進行できるランは1つだけ。
pub struct RunCoordinator<C> {
    config: Arc<C>,
    registry: Arc<ModuleRegistry>,
    slot: RunSlot,
}

impl<C> RunCoordinator<C>
where
    C: EngineConfig + 'static,
{
    pub fn new(config: C, registry: ModuleRegistry) -> Self {
        Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
            slot: RunSlot::new(),
        }
    }

    pub fn config(&self) -> &C {
        self.config.as_ref()
    }

    pub fn registry(&self) -> &ModuleRegistry {
        self.registry.as_ref()
    }

    /// 実行中のランの名前
    pub fn active_run(&self) -> Option<String> {
        self.slot.active()
    }

    pub fn is_running(&self) -> bool {
        self.slot.is_busy()
    }

    /// 1モジュールのランを開始する
    ///
    /// 未登録のモジュール、入力パス・出力先の未設定、実行中のランがある場合は
    /// バックグラウンドの処理を始めずにエラーを返す。
    pub fn start_single(&self, request: RunRequest, module_name: &str) -> BatchResult<RunHandle> {
        let module = self.registry.resolve(module_name)?;
        let input_root = request
            .module(module_name)
            .and_then(ModuleSpec::input)
            .map(Path::to_path_buf)
            .ok_or_else(|| {
                BatchError::configuration(format!("{module_name} の入力パスが設定されていません"))
            })?;
        let output_root = require_output_root(&request)?;

        let guard = self.slot.acquire(module_name)?;
        info!(module = module_name, "single run accepted");

        let runner = ModuleRunner::new(module_name, module)
            .with_file_timeout(self.config.file_timeout());
        let timestamp = request.timestamp();

        Ok(RunHandle::spawn(move |events, cancel| async move {
            let _guard = guard;
            run_single(runner, input_root, output_root, timestamp, events, cancel).await
        }))
    }

    /// 入力パスが設定された全モジュールを順番に実行する
    pub fn start_batch(&self, request: RunRequest) -> BatchResult<RunHandle> {
        let output_root = require_output_root(&request)?;

        let mut selected = Vec::new();
        for spec in request.modules() {
            if let Some(input_root) = spec.input() {
                let module = self.registry.resolve(&spec.name)?;
                let runner = ModuleRunner::new(&spec.name, module)
                    .with_file_timeout(self.config.file_timeout());
                selected.push((runner, input_root.to_path_buf()));
            }
        }

        let guard = self.slot.acquire(RunKind::Batch.to_string())?;
        info!(modules = selected.len(), "batch run accepted");

        let timestamp = request.timestamp();

        Ok(RunHandle::spawn(move |events, cancel| async move {
            let _guard = guard;
            run_batch(selected, output_root, timestamp, events, cancel).await
        }))
    }
}

fn require_output_root(request: &RunRequest) -> BatchResult<PathBuf> {
    request
        .output_root()
        .map(Path::to_path_buf)
        .ok_or_else(|| BatchError::configuration("出力先が設定されていません"))
}

async fn run_single(
    mut runner: ModuleRunner,
    input_root: PathBuf,
    output_root: PathBuf,
    timestamp: String,
    events: EventSender,
    cancel: CancelToken,
) -> BatchResult<RunReport> {
    let mut ctx = RunContext::open(&output_root, &timestamp, events, cancel)?;
    let kind = RunKind::Single(runner.name().to_string());

    match runner.run(&input_root, &mut ctx).await {
        Ok(outcome) => {
            let writer = SummaryWriter::for_module(&output_root, runner.name(), &timestamp);
            finish(ctx, kind, Some(writer), outcome.cancelled)
        }
        // 列挙の失敗はランナーがログ済み。サマリーは作らない
        Err(BatchError::EnumerationError { .. }) => finish(ctx, kind, None, false),
        Err(e) => Err(e),
    }
}

async fn run_batch(
    selected: Vec<(ModuleRunner, PathBuf)>,
    output_root: PathBuf,
    timestamp: String,
    events: EventSender,
    cancel: CancelToken,
) -> BatchResult<RunReport> {
    let mut ctx = RunContext::open(&output_root, &timestamp, events, cancel)?;

    if selected.is_empty() {
        ctx.log().info("No modules selected.");
        return finish(ctx, RunKind::Batch, None, false);
    }

    let mut enumerated_any = false;
    let mut cancelled = false;
    for (mut runner, input_root) in selected {
        if ctx.is_cancelled() {
            cancelled = true;
            break;
        }
        match runner.run(&input_root, &mut ctx).await {
            Ok(outcome) => {
                enumerated_any = true;
                if outcome.cancelled {
                    cancelled = true;
                    break;
                }
            }
            // このモジュールだけを中断し、次へ進む
            Err(BatchError::EnumerationError { .. }) => continue,
            Err(e) => return Err(e),
        }
    }

    let processed = ctx.summary().processed_count();
    let failed = ctx.summary().failed_count();
    ctx.log()
        .info(format!("Batch done: {processed} files, {failed} failures."));

    let writer = enumerated_any.then(|| SummaryWriter::for_batch(&output_root, &timestamp));
    finish(ctx, RunKind::Batch, writer, cancelled)
}

/// サマリーを書き出して完了レポートを作る
fn finish(
    mut ctx: RunContext,
    kind: RunKind,
    writer: Option<SummaryWriter>,
    cancelled: bool,
) -> BatchResult<RunReport> {
    if cancelled {
        ctx.log().info("Run cancelled.");
    }

    let summary_path = match writer {
        Some(writer) => match writer.write(ctx.summary()) {
            Ok(path) => {
                ctx.log()
                    .info(format!("Summary written to {}", path.display()));
                Some(path)
            }
            Err(e) => {
                ctx.log().error(format!("{e}"));
                return Err(e);
            }
        },
        None => None,
    };

    Ok(RunReport {
        kind,
        timestamp: ctx.timestamp().to_string(),
        processed_count: ctx.summary().processed_count(),
        failed_count: ctx.summary().failed_count(),
        summary_path,
        log_path: ctx.log_path().to_path_buf(),
        cancelled,
    })
}

/// 受理されたランへのハンドル
///
/// コンソールはイベントの取り出しとキャンセル要求だけを行い、
/// ランの内部状態には触れない。
#[derive(Debug)]
pub struct RunHandle {
    events: EventReceiver,
    cancel: CancelToken,
    join: JoinHandle<BatchResult<RunReport>>,
}

impl RunHandle {
    fn spawn<F, Fut>(run: F) -> Self
    where
        F: FnOnce(EventSender, CancelToken) -> Fut,
        Fut: std::future::Future<Output = BatchResult<RunReport>> + Send + 'static,
    {
        let (tx, events) = progress_channel();
        let cancel = CancelToken::new();
        let future = run(tx.clone(), cancel.clone());

        let join = tokio::spawn(async move {
            let result = future.await;
            if let Ok(report) = &result {
                tx.finished(report.clone());
            }
            result
        });

        Self {
            events,
            cancel,
            join,
        }
    }

    /// 溜まっているイベントをノンブロッキングで取り出す
    pub fn drain(&mut self) -> Vec<RunEvent> {
        self.events.drain()
    }

    pub async fn recv(&mut self) -> Option<RunEvent> {
        self.events.recv().await
    }

    /// 次のタスク境界で止めるよう要求する
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// ランの終了を待つ（未取得のイベントは破棄される）
    pub async fn wait(self) -> BatchResult<RunReport> {
        self.join.await?
    }

    /// ランの終了を待ち、結果と未取得のイベントを返す
    pub async fn finish(mut self) -> (BatchResult<RunReport>, Vec<RunEvent>) {
        let result = match (&mut self.join).await {
            Ok(result) => result,
            Err(e) => Err(e.into()),
        };
        let events = self.events.drain();
        (result, events)
    }
}
