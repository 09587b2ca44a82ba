use crate::cli::Cli;
use crate::core::{BatchError, EngineConfig, RunEvent, RunReport};
use crate::engine::{RunCoordinator, RunHandle};
use crate::services::{ConsoleStatusReporter, StatusBoard};
use anyhow::Result;
use std::time::Duration;

/// 実行対象
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunTarget {
    Single(String),
    All,
}

/// ランを開始し、完了まで進捗を表示する
pub async fn execute_run(cli: &Cli, target: RunTarget) -> Result<RunReport> {
    let registry = cli.registry();
    let profile = cli.profile(&registry)?;
    let coordinator = RunCoordinator::new(cli.engine_config(), registry);
    let reporter = if cli.quiet {
        ConsoleStatusReporter::quiet()
    } else {
        ConsoleStatusReporter::new()
    };

    let request = profile.into_request();
    if !cli.quiet {
        println!("🚀 バッチ実行開始 ({})", request.timestamp());
        if let Some(output_root) = request.output_root() {
            println!("📂 出力先: {}", output_root.display());
        }
    }

    let started = match &target {
        RunTarget::Single(name) => coordinator.start_single(request, name),
        RunTarget::All => coordinator.start_batch(request),
    };
    let handle = started?;

    let poll_interval = coordinator.config().poll_interval();
    monitor(handle, poll_interval, &reporter).await
}

/// 終了時にコンソールへ出す1行。開始前に拒否されたランは警告として扱う
pub fn error_line(error: &anyhow::Error) -> String {
    let rejected = error
        .downcast_ref::<BatchError>()
        .is_some_and(BatchError::is_synchronous);
    if rejected {
        format!("⚠️  ランを開始できません: {error:#}")
    } else {
        format!("❌ エラー: {error:#}")
    }
}

/// Ctrl-C を受けたときの動作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptAction {
    /// 処理中のファイルの完了後に停止する
    Cancel,
    /// 待たずにプロセスを終了する
    Abort,
}

/// 何回目の Ctrl-C かで動作を決める
pub fn interrupt_action(presses: usize) -> InterruptAction {
    if presses <= 1 {
        InterruptAction::Cancel
    } else {
        InterruptAction::Abort
    }
}

/// SIGINT で終了したときの終了コード
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// 一定間隔でイベントを取り出して表示する。
/// 1回目の Ctrl-C でキャンセルを要求し、2回目でプロセスを終了する
pub async fn monitor(
    mut handle: RunHandle,
    poll_interval: Duration,
    reporter: &ConsoleStatusReporter,
) -> Result<RunReport> {
    let mut board = StatusBoard::new();
    let mut ticker = tokio::time::interval(poll_interval);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut presses = 0;
    let mut signals_available = true;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let events = handle.drain();
                if apply_events(&mut board, &events, reporter) {
                    reporter.render_status(&board);
                }
                if handle.is_finished() {
                    break;
                }
            }
            signal = &mut ctrl_c, if signals_available => {
                if signal.is_err() {
                    signals_available = false;
                    continue;
                }
                // 次の Ctrl-C を受け取れるよう待ち受けを作り直す
                ctrl_c.set(tokio::signal::ctrl_c());
                presses += 1;
                match interrupt_action(presses) {
                    InterruptAction::Cancel => {
                        println!("⏹️  キャンセルを要求しました（処理中のファイルの完了後に停止します。もう一度押すと強制終了）");
                        handle.cancel();
                    }
                    InterruptAction::Abort => {
                        eprintln!("🛑 強制終了します");
                        std::process::exit(INTERRUPTED_EXIT_CODE);
                    }
                }
            }
        }
    }

    let (result, remaining) = handle.finish().await;
    apply_events(&mut board, &remaining, reporter);

    let report = result?;
    reporter.render_finished(&report);
    Ok(report)
}

/// 進捗イベントを含んでいたかを返す
fn apply_events(
    board: &mut StatusBoard,
    events: &[RunEvent],
    reporter: &ConsoleStatusReporter,
) -> bool {
    let mut progressed = false;
    for event in events {
        board.apply(event);
        match event {
            RunEvent::Log(log) => reporter.render_log(log),
            RunEvent::Progress(_) => progressed = true,
            RunEvent::Finished(_) => {}
        }
    }
    progressed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Commands;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("batch_tester").chain(args.iter().copied()))
    }

    #[tokio::test]
    async fn test_execute_single_run() {
        let input = TempDir::new().unwrap();
        fs::write(input.path().join("a.txt"), "a").unwrap();
        fs::write(input.path().join("b.txt"), "b").unwrap();
        let output = TempDir::new().unwrap();

        let module_arg = format!("Test Data Extraction={}", input.path().display());
        let cli = cli(&[
            "--quiet",
            "--delay-ms",
            "1",
            "--poll-ms",
            "5",
            "--output",
            output.path().to_str().unwrap(),
            "-m",
            module_arg.as_str(),
            "run",
            "Test Data Extraction",
        ]);
        assert!(matches!(cli.command, Commands::Run { .. }));

        let report = execute_run(&cli, RunTarget::Single("Test Data Extraction".to_string()))
            .await
            .unwrap();

        assert_eq!(report.processed_count, 2);
        assert_eq!(report.failed_count, 0);
        assert!(report.summary_path.unwrap().exists());
    }

    #[tokio::test]
    async fn test_execute_run_without_input_is_rejected() {
        let output = TempDir::new().unwrap();
        let cli = cli(&[
            "--quiet",
            "--output",
            output.path().to_str().unwrap(),
            "run",
            "Test Automatic Drawing",
        ]);

        let result = execute_run(&cli, RunTarget::Single("Test Automatic Drawing".to_string())).await;
        let error = result.unwrap_err();
        assert!(matches!(
            error.downcast_ref::<BatchError>(),
            Some(BatchError::ConfigurationError { .. })
        ));

        // 開始前の拒否は警告1行だけで報告する
        let line = error_line(&error);
        assert!(line.starts_with("⚠️"));
        assert_eq!(line.lines().count(), 1);
    }

    #[test]
    fn test_error_line_for_run_failure() {
        let error: anyhow::Error =
            BatchError::summary("/out/summary.csv", anyhow::anyhow!("disk full")).into();
        let line = error_line(&error);
        assert!(line.starts_with("❌ エラー: "));
        assert!(line.contains("disk full"));
    }

    #[test]
    fn test_second_interrupt_aborts() {
        assert_eq!(interrupt_action(1), InterruptAction::Cancel);
        assert_eq!(interrupt_action(2), InterruptAction::Abort);
        assert_eq!(interrupt_action(3), InterruptAction::Abort);
    }
}
