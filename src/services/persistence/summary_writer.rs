// サマリーCSVの書き出しと読み込み

use crate::core::{BatchError, BatchResult, FileResult, RunSummary};
use crate::services::enumeration::module_dir_name;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// CSVの1行。列順は `module,file,status,reason` で固定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub module: String,
    pub file: String,
    pub status: String,
    pub reason: String,
}

impl From<&FileResult> for SummaryRow {
    fn from(result: &FileResult) -> Self {
        Self {
            module: result.module_name().to_string(),
            file: result.source_path().to_string_lossy().into_owned(),
            status: result.status().to_string(),
            reason: result.reason().to_string(),
        }
    }
}

/// `RunSummary` をUTF-8のCSVとして書き出す
///
/// 同名ファイルがあれば上書きする。
#[derive(Debug, Clone)]
pub struct SummaryWriter {
    path: PathBuf,
}

impl SummaryWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 単一モジュールのラン: `summary_<module>_<timestamp>.csv`
    pub fn for_module(output_root: &Path, module_name: &str, timestamp: &str) -> Self {
        Self::new(output_root.join(format!(
            "summary_{}_{}.csv",
            module_dir_name(module_name),
            timestamp
        )))
    }

    /// バッチラン: `summary_<timestamp>.csv`
    pub fn for_batch(output_root: &Path, timestamp: &str) -> Self {
        Self::new(output_root.join(format!("summary_{timestamp}.csv")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, summary: &RunSummary) -> BatchResult<PathBuf> {
        let mut writer =
            csv::Writer::from_path(&self.path).map_err(|e| BatchError::summary(&self.path, e))?;

        // 結果が0件でもヘッダー行は出力する
        if summary.is_empty() {
            writer
                .write_record(["module", "file", "status", "reason"])
                .map_err(|e| BatchError::summary(&self.path, e))?;
        }

        for result in summary.results() {
            writer
                .serialize(SummaryRow::from(result))
                .map_err(|e| BatchError::summary(&self.path, e))?;
        }
        writer
            .flush()
            .map_err(|e| BatchError::summary(&self.path, e))?;

        debug!(
            path = %self.path.display(),
            rows = summary.results().len(),
            "summary written"
        );
        Ok(self.path.clone())
    }
}

/// 書き出したサマリーを行単位で読み戻す
pub fn read_summary(path: &Path) -> BatchResult<Vec<SummaryRow>> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| BatchError::summary(path, e))?;
    reader
        .deserialize()
        .collect::<Result<Vec<SummaryRow>, csv::Error>>()
        .map_err(|e| BatchError::summary(path, e))
}
