// ログ機能
// プロセス全体の診断ログ（tracing）と、ラン単位のログファイル

pub mod run_log;

pub use run_log::RunLog;

use tracing_subscriber::EnvFilter;

/// tracing の購読者を初期化する
///
/// `RUST_LOG` が未設定なら `info`。二重初期化は無視する。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
