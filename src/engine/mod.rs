// エンジン層 - ランの実行とオーケストレーション
// サービス層を組み合わせて、バックグラウンドでのラン実行を提供

pub mod context;
pub mod control;
pub mod coordinator;
pub mod runner;

// 公開API
pub use context::RunContext;
pub use control::{CancelToken, RunGuard, RunSlot};
pub use coordinator::{RunCoordinator, RunHandle};
pub use runner::{ModuleOutcome, ModuleRunner};
