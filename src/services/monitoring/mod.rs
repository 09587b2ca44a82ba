// 進捗監視機能
// ランからのイベント経路と、コンソール側の状態表示

pub mod channel;
pub mod implementations;
pub mod status;

// 公開API
pub use channel::{progress_channel, EventReceiver, EventSender};
pub use implementations::ConsoleStatusReporter;
pub use status::StatusBoard;
