// サービス層 - 機能別のビジネスロジック
// 各サービスは特定の責任を持ち、疎結合で設計されている

pub mod config;
pub mod enumeration;
pub mod logging;
pub mod modules;
pub mod monitoring;
pub mod persistence;

// 公開API - 各サービスの主要機能を明示的にエクスポート
pub use config::{DefaultEngineConfig, RunProfile};
pub use enumeration::FileEnumerator;
pub use logging::{init_tracing, RunLog};
pub use modules::{ModuleRegistry, SimulatedModule, BUILTIN_MODULES};
pub use monitoring::{progress_channel, ConsoleStatusReporter, EventReceiver, EventSender, StatusBoard};
pub use persistence::{read_summary, SummaryRow, SummaryWriter};
