// バッチテスター - 名前付きの処理モジュールをディレクトリツリー全体に適用し、
// ファイルごとの成否をログとサマリーCSVに残す

pub mod cli;
pub mod core;
pub mod engine;
pub mod services;

// 公開API
pub use crate::core::{
    BatchError, BatchResult, EngineConfig, FileResult, FileStatus, FileTask, LogEvent, LogLevel,
    ModuleContract, ModuleSpec, ProgressEvent, RunEvent, RunKind, RunReport, RunRequest,
    RunSummary,
};
pub use engine::{CancelToken, ModuleRunner, RunCoordinator, RunHandle};
pub use services::{
    init_tracing, read_summary, DefaultEngineConfig, ModuleRegistry, RunProfile, SimulatedModule,
    SummaryWriter,
};
