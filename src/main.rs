use anyhow::Result;
use batch_tester::cli::{
    error_line, execute_modules, execute_run, execute_show_summary, Cli, Commands, RunTarget,
};
use batch_tester::init_tracing;
use clap::Parser;
use std::time::Duration;

/// 終了時にブロッキングスレッドを待つ上限
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(dispatch(&cli));
    // 時間上限で切り離したモジュール呼び出しの終了は待たない
    runtime.shutdown_timeout(SHUTDOWN_GRACE);

    if let Err(error) = result {
        eprintln!("{}", error_line(&error));
        std::process::exit(1);
    }

    Ok(())
}

async fn dispatch(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Run { module } => execute_run(cli, RunTarget::Single(module.clone()))
            .await
            .map(|_| ()),
        Commands::RunAll => execute_run(cli, RunTarget::All).await.map(|_| ()),
        Commands::Modules => execute_modules(cli),
        Commands::ShowSummary { summary } => execute_show_summary(summary),
    }
}
