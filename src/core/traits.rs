// バッチ実行エンジンのトレイト定義
// モジュール実装と設定の抽象化インターフェース

use super::types::FileTask;
use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use std::time::Duration;

/// 全モジュールが満たすファイル単位の処理契約
///
/// 失敗は `Err` で返す。ランナーはエラー・パニック・タイムアウトを
/// いずれも `FileResult` の `Failed` に変換するため、実装側で
/// 呼び出し元を巻き込んで落ちることはない。
/// 1回の呼び出しは任意の（有限の）時間ブロックしてよい。
/// ランナーは専用のブロッキングスレッドから呼び出すため、
/// ブロック中でもファイル単位の時間上限は効く。
#[automock]
#[async_trait]
pub trait ModuleContract: Send + Sync {
    /// 単一ファイルを処理し、成果物を `task.output_dir` に書き出す
    async fn process(&self, task: &FileTask) -> Result<()>;
}

/// エンジン設定を抽象化するトレイト
#[automock]
pub trait EngineConfig: Send + Sync {
    /// コンソールがイベントを取り出す間隔
    fn poll_interval(&self) -> Duration;

    /// 1ファイルあたりの処理上限。`None` なら無制限
    fn file_timeout(&self) -> Option<Duration>;
}
