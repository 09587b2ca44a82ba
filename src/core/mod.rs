// コアレイヤー - 基盤となるトレイト、型、エラー定義
// 他のレイヤーから参照される基本的な抽象化を提供

pub mod error;
pub mod traits;
pub mod types;

// 公開API
pub use error::{BatchError, BatchResult, ErrorSeverity};
pub use traits::{EngineConfig, ModuleContract};
pub use traits::{MockEngineConfig, MockModuleContract};
pub use types::{
    FileResult, FileStatus, FileTask, LogEvent, LogLevel, ModuleSpec, ProgressEvent, RunEvent,
    RunKind, RunReport, RunRequest, RunSummary, RunnerState,
};
