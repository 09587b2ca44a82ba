// JSONで保存するランの設定（出力先とモジュールごとの入力パス）

use crate::core::{BatchError, BatchResult, ModuleSpec, RunRequest};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// `{ "output_root": "...", "modules": [{ "name": "...", "input": "..." }] }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunProfile {
    #[serde(default)]
    pub output_root: Option<PathBuf>,
    #[serde(default)]
    pub modules: Vec<ModuleSpec>,
}

impl RunProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> BatchResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BatchError::configuration(format!("{} を読み込めません: {e}", path.display()))
        })?;
        Self::from_json(&content).map_err(|e| match e {
            BatchError::ConfigurationError { message } => {
                BatchError::configuration(format!("{}: {message}", path.display()))
            }
            other => other,
        })
    }

    pub fn from_json(content: &str) -> BatchResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| BatchError::configuration(format!("設定ファイルの形式が不正です: {e}")))
    }

    pub fn to_json(&self) -> BatchResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| BatchError::configuration(format!("設定を書き出せません: {e}")))
    }

    pub fn with_output_root(mut self, output_root: impl Into<PathBuf>) -> Self {
        self.output_root = Some(output_root.into());
        self
    }

    /// 既存のモジュールなら入力パスを上書きし、なければ末尾に追加
    pub fn with_module_input(mut self, name: &str, input: impl Into<PathBuf>) -> Self {
        let input = Some(input.into());
        match self.modules.iter_mut().find(|m| m.name == name) {
            Some(spec) => spec.input_root = input,
            None => self.modules.push(ModuleSpec::new(name, input)),
        }
        self
    }

    /// 登録済みモジュールのうち未記載のものを入力なしで追加（表示順を揃える）
    pub fn include_modules<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        for name in names {
            if !self.modules.iter().any(|m| m.name == name) {
                self.modules.push(ModuleSpec::new(name, None));
            }
        }
        self
    }

    pub fn into_request(self) -> RunRequest {
        RunRequest::new(self.modules, self.output_root)
    }
}
