use crate::core::{BatchError, BatchResult, FileTask};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// 入力ルート配下の全ファイルを `FileTask` として列挙する
///
/// 走査順は「各ディレクトリでファイルが先、次にサブディレクトリ、
/// それぞれ名前順」で固定。件数カウントと処理の2パスで同じ順序になる。
#[derive(Debug, Clone)]
pub struct FileEnumerator {
    root: PathBuf,
    module_name: String,
    module_output: PathBuf,
}

impl FileEnumerator {
    /// ルートが存在し読み取り可能であることを確認して作成
    pub fn open(
        root: impl Into<PathBuf>,
        module_name: impl Into<String>,
        output_root: &Path,
    ) -> BatchResult<Self> {
        let root = root.into();
        let module_name = module_name.into();

        let metadata = std::fs::metadata(&root).map_err(|e| BatchError::enumeration(&root, e))?;
        if metadata.is_dir() {
            std::fs::read_dir(&root).map_err(|e| BatchError::enumeration(&root, e))?;
        }

        let module_output = output_root.join(module_dir_name(&module_name));
        Ok(Self {
            root,
            module_name,
            module_output,
        })
    }

    /// カウントパス。走査中に読めなかったエントリは数えない
    pub fn count(&self) -> usize {
        self.tasks().filter(|task| task.is_ok()).count()
    }

    /// 処理パス。呼ぶたびに先頭から走査し直す
    pub fn tasks(&self) -> FileTasks<'_> {
        let walker = WalkDir::new(&self.root)
            .sort_by(files_before_dirs)
            .into_iter();
        FileTasks {
            enumerator: self,
            walker,
        }
    }

    fn task_for(&self, path: &Path) -> FileTask {
        let relative_dir = path
            .parent()
            .and_then(|parent| parent.strip_prefix(&self.root).ok())
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let output_dir = if relative_dir.as_os_str().is_empty() {
            self.module_output.clone()
        } else {
            self.module_output.join(&relative_dir)
        };

        FileTask {
            source_path: path.to_path_buf(),
            relative_dir,
            module_name: self.module_name.clone(),
            output_dir,
        }
    }
}

/// 遅延評価されるタスク列
pub struct FileTasks<'a> {
    enumerator: &'a FileEnumerator,
    walker: walkdir::IntoIter,
}

impl Iterator for FileTasks<'_> {
    type Item = BatchResult<FileTask>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.enumerator.root.clone());
                    return Some(Err(BatchError::enumeration(path, e)));
                }
            };

            if is_regular_file(&entry) {
                return Some(Ok(self.enumerator.task_for(entry.path())));
            }
        }
    }
}

/// 出力ディレクトリ名として使えるようにモジュール名を整える
pub fn module_dir_name(module_name: &str) -> String {
    module_name
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect()
}

fn is_regular_file(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    if file_type.is_file() {
        return true;
    }
    // シンボリックリンクはリンク先がファイルなら対象
    file_type.is_symlink() && entry.path().is_file()
}

fn files_before_dirs(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}
