// バッチ実行エンジンのエラー型定義

use std::path::{Path, PathBuf};
use thiserror::Error;

/// バッチ実行固有のエラー型
///
/// ファイル単位の処理失敗はここに含まれない。
/// それらは `FileResult` の `Failed` として記録され、実行は継続する。
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("設定エラー: {message}")]
    ConfigurationError { message: String },

    #[error("ファイル列挙エラー: {} - {source}", .path.display())]
    EnumerationError {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("未登録のモジュール: {name}")]
    UnknownModule { name: String },

    #[error("実行中のランがあります: {active}")]
    RunInProgress { active: String },

    #[error("サマリー書き込みエラー: {} - {source}", .path.display())]
    SummaryError {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("ログファイルエラー: {} - {source}", .path.display())]
    LogError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("タスクエラー: {source}")]
    TaskError {
        #[source]
        source: tokio::task::JoinError,
    },
}

impl BatchError {
    /// 設定エラーの作成
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// ファイル列挙エラーの作成
    pub fn enumeration(path: impl AsRef<Path>, source: impl Into<anyhow::Error>) -> Self {
        Self::EnumerationError {
            path: path.as_ref().to_path_buf(),
            source: source.into(),
        }
    }

    pub fn unknown_module(name: impl Into<String>) -> Self {
        Self::UnknownModule { name: name.into() }
    }

    /// 再入エラーの作成
    pub fn run_in_progress(active: impl Into<String>) -> Self {
        Self::RunInProgress {
            active: active.into(),
        }
    }

    /// サマリー書き込みエラーの作成
    pub fn summary(path: impl AsRef<Path>, source: impl Into<anyhow::Error>) -> Self {
        Self::SummaryError {
            path: path.as_ref().to_path_buf(),
            source: source.into(),
        }
    }

    pub fn log(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::LogError {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// エラーの重要度を取得
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ConfigurationError { .. } | Self::UnknownModule { .. } => ErrorSeverity::High,
            Self::RunInProgress { .. } => ErrorSeverity::Low,
            Self::EnumerationError { .. } => ErrorSeverity::Medium,
            Self::SummaryError { .. } | Self::LogError { .. } => ErrorSeverity::High,
            Self::TaskError { .. } => ErrorSeverity::Critical,
        }
    }

    /// ランが開始される前にオペレーターへ同期的に返すべきエラーかどうか
    pub fn is_synchronous(&self) -> bool {
        matches!(
            self,
            Self::ConfigurationError { .. } | Self::UnknownModule { .. } | Self::RunInProgress { .. }
        )
    }
}

/// エラーの重要度レベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// 低重要度 - 操作のやり直しで解決
    Low,
    /// 中重要度 - 対象モジュールのみ中断
    Medium,
    /// 高重要度 - 要対応
    High,
    /// 致命的
    Critical,
}

impl ErrorSeverity {
    /// 重要度の文字列表現を取得
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

/// バッチ実行の結果型
pub type BatchResult<T> = std::result::Result<T, BatchError>;

impl From<tokio::task::JoinError> for BatchError {
    fn from(error: tokio::task::JoinError) -> Self {
        BatchError::TaskError { source: error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_batch_error_creation() {
        let config_error = BatchError::configuration("出力フォルダが未設定です");
        assert!(config_error.to_string().contains("設定エラー"));
        assert!(config_error.to_string().contains("出力フォルダが未設定です"));

        let enum_error =
            BatchError::enumeration("/missing/root", anyhow::anyhow!("No such file or directory"));
        assert!(enum_error.to_string().contains("ファイル列挙エラー"));
        assert!(enum_error.to_string().contains("/missing/root"));

        let busy = BatchError::run_in_progress("Test Data Extraction");
        assert!(busy.to_string().contains("Test Data Extraction"));

        let unknown = BatchError::unknown_module("Nope");
        assert!(unknown.to_string().contains("Nope"));
    }

    #[test]
    fn test_error_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = BatchError::log("/out/run_20240101_000000.log", io);

        assert!(error.source().is_some());
        assert!(error.to_string().contains("run_20240101_000000.log"));
    }

    #[test]
    fn test_synchronous_classification() {
        assert!(BatchError::configuration("x").is_synchronous());
        assert!(BatchError::unknown_module("x").is_synchronous());
        assert!(BatchError::run_in_progress("x").is_synchronous());
        assert!(!BatchError::enumeration("/x", anyhow::anyhow!("gone")).is_synchronous());
        assert!(!BatchError::summary("/x.csv", anyhow::anyhow!("disk full")).is_synchronous());
    }

    #[test]
    fn test_error_severity() {
        assert_eq!(
            BatchError::configuration("x").severity(),
            ErrorSeverity::High
        );
        assert_eq!(
            BatchError::enumeration("/x", anyhow::anyhow!("gone")).severity(),
            ErrorSeverity::Medium
        );
        assert!(ErrorSeverity::Critical > ErrorSeverity::High);
        assert!(ErrorSeverity::Medium > ErrorSeverity::Low);
        assert_eq!(ErrorSeverity::Low.as_str(), "LOW");
    }

    #[tokio::test]
    async fn test_task_error() {
        let task = tokio::spawn(async {
            std::future::pending::<()>().await;
        });
        task.abort();

        let join_error = task.await.expect_err("タスクエラーが期待されます");
        let error: BatchError = join_error.into();

        assert!(error.to_string().contains("タスクエラー"));
        assert_eq!(error.severity(), ErrorSeverity::Critical);
    }
}
