// RunContext - 1回のランが所有する可変状態

use super::control::CancelToken;
use crate::core::{BatchResult, ProgressEvent, RunSummary};
use crate::services::logging::RunLog;
use crate::services::monitoring::EventSender;
use std::path::{Path, PathBuf};

/// ランの間だけ存在し、バックグラウンドのタスクだけが触る
///
/// 結果の集計とログファイルをここにまとめ、ランナーへ明示的に渡す。
#[derive(Debug)]
pub struct RunContext {
    output_root: PathBuf,
    summary: RunSummary,
    log: RunLog,
    cancel: CancelToken,
}

impl RunContext {
    /// ログファイルを確保してコンテキストを作成
    pub fn open(
        output_root: &Path,
        timestamp: &str,
        events: EventSender,
        cancel: CancelToken,
    ) -> BatchResult<Self> {
        let log = RunLog::bind(output_root, timestamp, events)?;
        Ok(Self {
            output_root: output_root.to_path_buf(),
            summary: RunSummary::new(timestamp),
            log,
            cancel,
        })
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn timestamp(&self) -> &str {
        self.summary.timestamp()
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    pub fn summary_mut(&mut self) -> &mut RunSummary {
        &mut self.summary
    }

    pub fn log(&mut self) -> &mut RunLog {
        &mut self.log
    }

    pub fn log_path(&self) -> &Path {
        self.log.path()
    }

    pub fn progress(&self, event: ProgressEvent) {
        self.log.sender().progress(event);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
