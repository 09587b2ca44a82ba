// ファイル列挙機能
// 入力ルートの走査と出力ディレクトリのミラーリング先の計算

pub mod file_enumerator;

// 公開API
pub use file_enumerator::{module_dir_name, FileEnumerator, FileTasks};
