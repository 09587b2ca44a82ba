use crate::core::BatchResult;
use crate::services::{DefaultEngineConfig, ModuleRegistry, RunProfile};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "batch_tester")]
#[command(about = "Run file-processing modules over directory trees and report every outcome")]
#[command(version)]
pub struct Cli {
    /// JSON run profile with output root and module inputs
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output root for mirrored outputs, run logs and summaries
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Module input path, repeatable
    #[arg(
        short,
        long = "module",
        value_name = "NAME=PATH",
        value_parser = parse_module_input,
        global = true
    )]
    pub modules: Vec<ModuleInput>,

    /// Per-file delay of the built-in simulated modules
    #[arg(long, default_value = "100", global = true)]
    pub delay_ms: u64,

    /// Per-file time limit; slower files are recorded as failures
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Console poll interval
    #[arg(long, default_value = "100", global = true)]
    pub poll_ms: u64,

    /// Print only the completion report
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a single module over its input
    Run {
        /// Registered module name
        module: String,
    },

    /// Run every module that has an input path, one after another
    RunAll,

    /// List registered modules and their configured inputs
    Modules,

    /// Print per-module counts from a summary CSV
    ShowSummary {
        /// Summary file written by a previous run
        summary: PathBuf,
    },
}

/// `--module NAME=PATH` の値
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInput {
    pub name: String,
    pub path: PathBuf,
}

pub fn parse_module_input(value: &str) -> Result<ModuleInput, String> {
    let (name, path) = value
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=PATH, got '{value}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("module name is empty in '{value}'"));
    }
    if path.trim().is_empty() {
        return Err(format!("path is empty for module '{name}'"));
    }
    Ok(ModuleInput {
        name: name.to_string(),
        path: PathBuf::from(path.trim()),
    })
}

impl Cli {
    /// 設定ファイルを読み込み、コマンドライン指定で上書きする
    pub fn profile(&self, registry: &ModuleRegistry) -> BatchResult<RunProfile> {
        let mut profile = match &self.config {
            Some(path) => RunProfile::load(path)?,
            None => RunProfile::new(),
        };
        if let Some(output) = &self.output {
            profile = profile.with_output_root(output);
        }
        for input in &self.modules {
            profile = profile.with_module_input(&input.name, &input.path);
        }
        Ok(profile.include_modules(registry.names()))
    }

    pub fn engine_config(&self) -> DefaultEngineConfig {
        DefaultEngineConfig::new()
            .with_poll_interval(Duration::from_millis(self.poll_ms.max(1)))
            .with_file_timeout(self.timeout_secs.map(Duration::from_secs))
    }

    pub fn registry(&self) -> ModuleRegistry {
        ModuleRegistry::with_simulated_delay(Duration::from_millis(self.delay_ms))
    }
}
