// コンソール側が保持する最新状態のスナップショット

use crate::core::{LogEvent, ProgressEvent, RunEvent, RunReport};

/// 受信したイベントから組み立てる表示用の状態
///
/// エンジン側の状態への参照は持たず、イベントのコピーだけで更新する。
#[derive(Debug, Clone, Default)]
pub struct StatusBoard {
    current_module: Option<String>,
    current_file: Option<String>,
    processed: usize,
    total: usize,
    failures: usize,
    last_log: Option<LogEvent>,
    log_count: usize,
    report: Option<RunReport>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: &RunEvent) {
        match event {
            RunEvent::Progress(progress) => self.apply_progress(progress),
            RunEvent::Log(log) => {
                self.last_log = Some(log.clone());
                self.log_count += 1;
            }
            RunEvent::Finished(report) => self.report = Some(report.clone()),
        }
    }

    fn apply_progress(&mut self, progress: &ProgressEvent) {
        self.current_module = Some(progress.module_name.clone());
        self.current_file = Some(progress.current_file.clone());
        self.processed = progress.processed_count;
        self.total = progress.total_count;
        self.failures = progress.failure_count;
    }

    pub fn current_module(&self) -> Option<&str> {
        self.current_module.as_deref()
    }

    pub fn current_file(&self) -> Option<&str> {
        self.current_file.as_deref()
    }

    /// `<processed> of <total>`
    pub fn progress_text(&self) -> String {
        format!("{} of {}", self.processed, self.total)
    }

    pub fn failures(&self) -> usize {
        self.failures
    }

    pub fn last_log(&self) -> Option<&LogEvent> {
        self.last_log.as_ref()
    }

    pub fn log_count(&self) -> usize {
        self.log_count
    }

    pub fn report(&self) -> Option<&RunReport> {
        self.report.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.report.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogLevel, RunKind};
    use std::path::PathBuf;

    fn progress(module: &str, processed: usize, failures: usize) -> RunEvent {
        RunEvent::Progress(ProgressEvent {
            module_name: module.to_string(),
            current_file: format!("file{processed}.txt"),
            processed_count: processed,
            total_count: 3,
            failure_count: failures,
        })
    }

    #[test]
    fn test_board_keeps_latest_progress() {
        let mut board = StatusBoard::new();
        board.apply(&progress("A", 1, 0));
        board.apply(&progress("A", 2, 1));

        assert_eq!(board.current_module(), Some("A"));
        assert_eq!(board.current_file(), Some("file2.txt"));
        assert_eq!(board.progress_text(), "2 of 3");
        assert_eq!(board.failures(), 1);
        assert!(!board.is_finished());
    }

    #[test]
    fn test_board_resets_with_next_module() {
        let mut board = StatusBoard::new();
        board.apply(&progress("A", 3, 1));
        board.apply(&progress("B", 1, 0));

        assert_eq!(board.current_module(), Some("B"));
        assert_eq!(board.progress_text(), "1 of 3");
        assert_eq!(board.failures(), 0);
    }

    #[test]
    fn test_board_records_logs_and_report() {
        let mut board = StatusBoard::new();
        board.apply(&RunEvent::Log(LogEvent::new(LogLevel::Info, "one")));
        board.apply(&RunEvent::Log(LogEvent::new(LogLevel::Error, "two")));
        board.apply(&RunEvent::Finished(RunReport {
            kind: RunKind::Batch,
            timestamp: "20240101_000000".to_string(),
            processed_count: 5,
            failed_count: 1,
            summary_path: Some(PathBuf::from("/out/summary_20240101_000000.csv")),
            log_path: PathBuf::from("/out/run_20240101_000000.log"),
            cancelled: false,
        }));

        assert_eq!(board.log_count(), 2);
        assert_eq!(board.last_log().map(|l| l.message.as_str()), Some("two"));
        assert!(board.is_finished());
        assert_eq!(board.report().map(|r| r.processed_count), Some(5));
    }
}
