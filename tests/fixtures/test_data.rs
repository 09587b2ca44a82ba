use batch_tester::{
    DefaultEngineConfig, LogEvent, LogLevel, ModuleRegistry, ModuleSpec, ProgressEvent,
    RunCoordinator, RunEvent, RunRequest,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// 相対パスの一覧からファイルツリーを作成
pub fn create_tree(files: &[&str]) -> TempDir {
    let temp = TempDir::new().expect("temp dir");
    for file in files {
        let path = temp.path().join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(&path, file.as_bytes()).expect("write file");
    }
    temp
}

pub fn coordinator(registry: ModuleRegistry) -> RunCoordinator<DefaultEngineConfig> {
    RunCoordinator::new(DefaultEngineConfig::new(), registry)
}

pub fn request(modules: &[(&str, Option<&Path>)], output_root: &Path) -> RunRequest {
    RunRequest::new(
        modules
            .iter()
            .map(|(name, input)| ModuleSpec::new(*name, input.map(Path::to_path_buf)))
            .collect(),
        Some(output_root.to_path_buf()),
    )
}

pub fn log_events(events: &[RunEvent]) -> Vec<&LogEvent> {
    events
        .iter()
        .filter_map(|event| match event {
            RunEvent::Log(log) => Some(log),
            _ => None,
        })
        .collect()
}

pub fn error_logs(events: &[RunEvent]) -> Vec<&LogEvent> {
    log_events(events)
        .into_iter()
        .filter(|log| log.level == LogLevel::Error)
        .collect()
}

pub fn progress_events(events: &[RunEvent]) -> Vec<&ProgressEvent> {
    events
        .iter()
        .filter_map(|event| match event {
            RunEvent::Progress(progress) => Some(progress),
            _ => None,
        })
        .collect()
}

/// 出力ルート直下の `summary_*.csv`
pub fn summary_files(output_root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(output_root)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|path| {
                    path.file_name()
                        .map(|n| n.to_string_lossy().starts_with("summary_"))
                        .unwrap_or(false)
                })
                .collect()
        })
        .unwrap_or_default();
    files.sort();
    files
}
