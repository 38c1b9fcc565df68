use crate::error::{MontageError, Result};
use crate::tools::ensure_directory_exists;
use log::{debug, warn};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

/// 標籤後影格的暫存檔名前綴
pub const LABELED_PREFIX: &str = "labeled";

/// 暫存檔命名規則：`<prefix>_<n>.png`
const TRANSIENT_FILE_PATTERN: &str = r"^(original_frame|frame|labeled)_[0-9]+\.png$";

/// 暫存檔名（1 起算）
#[must_use]
pub fn transient_file_name(prefix: &str, sequence: usize) -> String {
    format!("{prefix}_{sequence}.png")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceState {
    Created,
    Active,
    Completed,
    Failed,
    Cleaned,
}

/// 清理結果
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanupReport {
    pub removed: usize,
    pub failed: usize,
}

/// 單次執行的暫存工作區
///
/// 每次執行都在自己的子資料夾工作（系統暫存區或呼叫端指定的資料夾底下），
/// 呼叫端資料夾裡原有的檔案不會被覆寫或刪除。
///
/// 離開作用域時一定會清理：已登記的暫存檔逐一刪除，失敗只記錄不中斷；
/// 最後整個子資料夾一併刪除。
#[derive(Debug)]
pub struct Workspace {
    state: WorkspaceState,
    requested_dir: Option<PathBuf>,
    temp_dir: Option<TempDir>,
    root: Option<PathBuf>,
    artifacts: Vec<PathBuf>,
}

impl Workspace {
    #[must_use]
    pub const fn new(requested_dir: Option<PathBuf>) -> Self {
        Self {
            state: WorkspaceState::Created,
            requested_dir,
            temp_dir: None,
            root: None,
            artifacts: Vec::new(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> WorkspaceState {
        self.state
    }

    /// 建立本次執行的子資料夾，進入 Active 狀態
    pub fn activate(&mut self) -> Result<&Path> {
        if self.state != WorkspaceState::Created {
            return Err(MontageError::Workspace(format!(
                "無法從 {:?} 狀態啟用工作區",
                self.state
            )));
        }

        let mut builder = tempfile::Builder::new();
        builder.prefix("video_grid_overview_");
        let temp_dir = match &self.requested_dir {
            Some(parent) => {
                ensure_directory_exists(parent).map_err(|e| {
                    MontageError::Workspace(format!("無法建立 {}: {e}", parent.display()))
                })?;
                builder.tempdir_in(parent)
            }
            None => builder.tempdir(),
        }
        .map_err(|e| MontageError::Workspace(format!("無法建立暫存資料夾: {e}")))?;
        let root = temp_dir.path().to_path_buf();
        self.temp_dir = Some(temp_dir);

        debug!("工作區: {}", root.display());
        self.state = WorkspaceState::Active;
        Ok(self.root.insert(root).as_path())
    }

    pub fn path(&self) -> Result<&Path> {
        match (&self.root, self.state) {
            (Some(root), WorkspaceState::Active) => Ok(root),
            _ => Err(MontageError::Workspace(format!(
                "工作區不在使用中 ({:?})",
                self.state
            ))),
        }
    }

    /// 取得暫存檔路徑並登記，供清理時刪除
    pub fn artifact_path(&mut self, prefix: &str, sequence: usize) -> Result<PathBuf> {
        let path = self.path()?.join(transient_file_name(prefix, sequence));
        if !self.artifacts.contains(&path) {
            self.artifacts.push(path.clone());
        }
        Ok(path)
    }

    #[must_use]
    pub fn artifacts(&self) -> &[PathBuf] {
        &self.artifacts
    }

    /// 依流程結果進入 Completed 或 Failed
    pub fn finish<T>(&mut self, outcome: &Result<T>) {
        if self.state != WorkspaceState::Active {
            return;
        }
        self.state = if outcome.is_ok() {
            WorkspaceState::Completed
        } else {
            WorkspaceState::Failed
        };
    }

    /// 盡力清理所有暫存檔，任何單一失敗都不會中斷其餘的清理
    pub fn cleanup(&mut self) -> CleanupReport {
        let mut report = CleanupReport::default();
        if self.state == WorkspaceState::Cleaned {
            return report;
        }

        for path in self.artifacts.drain(..) {
            remove_if_exists(&path, &mut report);
        }

        if let Some(temp_dir) = self.temp_dir.take() {
            sweep_transient_files(temp_dir.path(), &mut report);
            let dir = temp_dir.path().to_path_buf();
            if let Err(e) = temp_dir.close() {
                warn!("無法刪除暫存資料夾 {}: {e}", dir.display());
                report.failed += 1;
            }
        }

        debug!(
            "工作區清理完成: 刪除 {}, 失敗 {}",
            report.removed, report.failed
        );
        self.state = WorkspaceState::Cleaned;
        report
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn remove_if_exists(path: &Path, report: &mut CleanupReport) {
    if !path.exists() {
        return;
    }
    match fs::remove_file(path) {
        Ok(()) => report.removed += 1,
        Err(e) => {
            warn!("無法刪除暫存檔 {}: {e}", path.display());
            report.failed += 1;
        }
    }
}

/// 刪除未登記但符合暫存命名規則的檔案
fn sweep_transient_files(root: &Path, report: &mut CleanupReport) {
    let Ok(pattern) = Regex::new(TRANSIENT_FILE_PATTERN) else {
        return;
    };

    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
    {
        let is_transient = entry
            .file_name()
            .to_str()
            .is_some_and(|name| pattern.is_match(name));
        if is_transient {
            remove_if_exists(entry.path(), report);
        }
    }
}
