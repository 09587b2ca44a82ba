// データ永続化機能
// ランの結果サマリーをCSVとして保存・読み込み

pub mod summary_writer;

// 公開API
pub use summary_writer::{read_summary, SummaryRow, SummaryWriter};
