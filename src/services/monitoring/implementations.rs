// 進捗表示の具象実装

use super::status::StatusBoard;
use crate::core::{LogEvent, LogLevel, RunReport};

/// コンソール出力によるステータス表示
#[derive(Debug, Default, Clone)]
pub struct ConsoleStatusReporter {
    quiet: bool,
}

impl ConsoleStatusReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quiet() -> Self {
        Self { quiet: true }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// ステータス行（モジュール / ファイル / 進捗 / 失敗数）
    pub fn status_line(board: &StatusBoard) -> String {
        format!(
            "Module: {} | File: {} | Progress: {} | Failures: {}",
            board.current_module().unwrap_or("-"),
            board.current_file().unwrap_or("-"),
            board.progress_text(),
            board.failures()
        )
    }

    pub fn render_status(&self, board: &StatusBoard) {
        if !self.quiet {
            println!("📊 {}", Self::status_line(board));
        }
    }

    pub fn render_log(&self, event: &LogEvent) {
        if self.quiet {
            return;
        }
        match event.level {
            LogLevel::Info => println!("{}", event.format_line()),
            LogLevel::Error => eprintln!("{}", event.format_line()),
        }
    }

    /// 完了レポートの行（見出し / サマリー / ログ）
    pub fn finished_lines(report: &RunReport) -> Vec<String> {
        let headline = if report.cancelled {
            "⚠️  Run cancelled"
        } else {
            "✅ Completed"
        };
        let summary = match &report.summary_path {
            Some(path) => path.display().to_string(),
            None => "(not written)".to_string(),
        };
        vec![
            format!(
                "{headline} ({}): {} files, {} failures.",
                report.kind, report.processed_count, report.failed_count
            ),
            format!("📄 Summary: {summary}"),
            format!("📝 Log: {}", report.log_path.display()),
        ]
    }

    pub fn render_finished(&self, report: &RunReport) {
        if self.quiet {
            return;
        }
        for line in Self::finished_lines(report) {
            println!("{line}");
        }
    }
}
