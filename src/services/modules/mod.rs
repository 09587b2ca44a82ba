// 処理モジュール
// 名前で引けるモジュール実装の登録と、組み込みの模擬実装

pub mod registry;
pub mod simulated;

pub use registry::{ModuleRegistry, BUILTIN_MODULES};
pub use simulated::SimulatedModule;
