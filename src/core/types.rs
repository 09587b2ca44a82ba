// バッチ実行に関連するデータ型定義

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// ラン識別子・ファイル名に使うタイムスタンプ書式
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// ログ行のタイムスタンプ書式
pub const LOG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// モジュール名と入力パスの組
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSpec {
    pub name: String,
    /// ディレクトリ、またはネイティブライブラリ等の単一ファイル
    #[serde(default, rename = "input")]
    pub input_root: Option<PathBuf>,
}

impl ModuleSpec {
    pub fn new(name: impl Into<String>, input_root: Option<PathBuf>) -> Self {
        Self {
            name: name.into(),
            input_root,
        }
    }

    /// 空文字列のパスは未設定として扱う
    pub fn input(&self) -> Option<&Path> {
        self.input_root
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }
}

/// オペレーターが発行する実行要求
///
/// 受理後は変更されない。コーディネーターは値として受け取り、
/// ランの間だけ所有する。
#[derive(Debug, Clone)]
pub struct RunRequest {
    modules: Vec<ModuleSpec>,
    output_root: Option<PathBuf>,
    started_at: DateTime<Local>,
}

impl RunRequest {
    pub fn new(modules: Vec<ModuleSpec>, output_root: Option<PathBuf>) -> Self {
        Self {
            modules,
            output_root,
            started_at: Local::now(),
        }
    }

    /// 開始時刻を固定して作成（テスト用）
    pub fn with_started_at(mut self, started_at: DateTime<Local>) -> Self {
        self.started_at = started_at;
        self
    }

    pub fn modules(&self) -> &[ModuleSpec] {
        &self.modules
    }

    pub fn module(&self, name: &str) -> Option<&ModuleSpec> {
        self.modules.iter().find(|m| m.name == name)
    }

    pub fn output_root(&self) -> Option<&Path> {
        self.output_root
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// `20240131_235959` 形式のラン識別子
    pub fn timestamp(&self) -> String {
        self.started_at.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// 列挙中に生成される単一ファイルのタスク
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    pub source_path: PathBuf,
    /// 入力ルートからの、ファイルを含むディレクトリの相対パス（ルート直下は空）
    pub relative_dir: PathBuf,
    pub module_name: String,
    /// `output_root/<module>/<relative_dir>` のミラー先
    pub output_dir: PathBuf,
}

impl FileTask {
    /// 進捗表示用のファイル名
    pub fn file_name(&self) -> String {
        self.source_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source_path.to_string_lossy().into_owned())
    }
}

/// ファイル単位の処理結果ステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileStatus {
    Success,
    Failed,
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileStatus::Success => write!(f, "Success"),
            FileStatus::Failed => write!(f, "Failed"),
        }
    }
}

/// 個別ファイルの処理結果
///
/// `Failed` なら理由は空でなく、`Success` なら理由は空。
/// コンストラクタ経由でのみ作成できる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileResult {
    module_name: String,
    source_path: PathBuf,
    status: FileStatus,
    reason: String,
}

impl FileResult {
    pub fn success(task: &FileTask) -> Self {
        Self {
            module_name: task.module_name.clone(),
            source_path: task.source_path.clone(),
            status: FileStatus::Success,
            reason: String::new(),
        }
    }

    pub fn failed(task: &FileTask, reason: impl AsRef<str>) -> Self {
        let reason = reason.as_ref().trim();
        let reason = if reason.is_empty() {
            "unknown failure".to_string()
        } else {
            reason.to_string()
        };
        Self {
            module_name: task.module_name.clone(),
            source_path: task.source_path.clone(),
            status: FileStatus::Failed,
            reason,
        }
    }

    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn status(&self) -> FileStatus {
        self.status
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn is_failed(&self) -> bool {
        self.status == FileStatus::Failed
    }
}

/// ラン全体（単一モジュールまたはバッチ）の結果集計
///
/// バックグラウンドのランだけが所有・更新し、終了時にCSVへ書き出される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    results: Vec<FileResult>,
    processed_count: usize,
    failed_count: usize,
    timestamp: String,
}

impl RunSummary {
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self {
            results: Vec::new(),
            processed_count: 0,
            failed_count: 0,
            timestamp: timestamp.into(),
        }
    }

    /// 完了順に結果を追加
    pub fn record(&mut self, result: FileResult) {
        self.processed_count += 1;
        if result.is_failed() {
            self.failed_count += 1;
        }
        self.results.push(result);
    }

    pub fn results(&self) -> &[FileResult] {
        &self.results
    }

    pub fn processed_count(&self) -> usize {
        self.processed_count
    }

    pub fn failed_count(&self) -> usize {
        self.failed_count
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// 1タスク完了ごとに送出される進捗
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub module_name: String,
    pub current_file: String,
    pub processed_count: usize,
    pub total_count: usize,
    pub failure_count: usize,
}

impl ProgressEvent {
    /// `3 of 10` 形式。列挙の差分で processed が total を超えることもある
    pub fn progress_text(&self) -> String {
        format!("{} of {}", self.processed_count, self.total_count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
}

impl LogEvent {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            message: message.into(),
        }
    }

    /// `2024-01-31 23:59:59,123 - INFO - message`
    pub fn format_line(&self) -> String {
        format!(
            "{} - {} - {}",
            self.timestamp.format(LOG_TIME_FORMAT),
            self.level,
            self.message
        )
    }
}

/// ランの種類
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunKind {
    Single(String),
    Batch,
}

impl fmt::Display for RunKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunKind::Single(name) => write!(f, "{name}"),
            RunKind::Batch => write!(f, "all modules"),
        }
    }
}

/// ラン完了時にオペレーターへ通知される集計
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub kind: RunKind,
    pub timestamp: String,
    pub processed_count: usize,
    pub failed_count: usize,
    /// 列挙失敗や対象モジュールなしの場合は `None`
    pub summary_path: Option<PathBuf>,
    pub log_path: PathBuf,
    pub cancelled: bool,
}

/// バックグラウンドのランからコンソールへ流れるイベント
#[derive(Debug, Clone)]
pub enum RunEvent {
    Progress(ProgressEvent),
    Log(LogEvent),
    Finished(RunReport),
}

/// モジュール単位のランナー状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    Idle,
    Running,
    Completed,
}
