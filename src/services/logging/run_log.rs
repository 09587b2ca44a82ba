// ラン単位のログ出力（ファイル + ライブ通知）

use crate::core::{BatchError, BatchResult, LogEvent, LogLevel};
use crate::services::monitoring::EventSender;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// 1つのランが所有するログ
///
/// 各行を `run_<timestamp>.log` に追記し、同じ内容を `RunEvent::Log` として
/// コンソールへ送り、tracing にも debug で流す。
#[derive(Debug)]
pub struct RunLog {
    path: PathBuf,
    file: File,
    events: EventSender,
}

impl RunLog {
    /// 出力ルートを作成し、ログファイルを追記モードで開く
    pub fn bind(output_root: &Path, timestamp: &str, events: EventSender) -> BatchResult<Self> {
        std::fs::create_dir_all(output_root).map_err(|e| BatchError::log(output_root, e))?;

        let path = output_root.join(format!("run_{timestamp}.log"));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| BatchError::log(&path, e))?;

        Ok(Self { path, file, events })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 同じ経路へ進捗イベントを送るための送信側
    pub fn sender(&self) -> &EventSender {
        &self.events
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        let event = LogEvent::new(level, message);

        debug!(target: "run_log", level = %event.level, "{}", event.message);

        // ファイルへの書き込み失敗でランは止めない
        let written = writeln!(self.file, "{}", event.format_line()).and_then(|_| self.file.flush());
        if let Err(e) = written {
            warn!(path = %self.path.display(), "failed to write run log: {e}");
        }

        self.events.log(event);
    }
}
