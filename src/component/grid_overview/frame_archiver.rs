use super::sampling_planner::SampledFrame;
use crate::error::{MontageError, Result};
use crate::tools::ensure_directory_exists;
use log::info;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// 封存檔名的命名空間，避免多次執行寫入同一資料夾時互相覆蓋
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveNaming {
    video_stem: String,
    run_id: String,
}

impl ArchiveNaming {
    #[must_use]
    pub fn new(video_path: &Path) -> Self {
        let video_stem = video_path
            .file_stem()
            .map_or_else(|| "video".to_string(), |s| s.to_string_lossy().to_string());
        let run_id = Uuid::new_v4().simple().to_string()[..8].to_string();
        Self { video_stem, run_id }
    }

    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// 例如 `clip_1a2b3c4d_frame_000030.png`
    #[must_use]
    pub fn file_name(&self, source_frame_index: u64) -> String {
        format!(
            "{}_{}_frame_{source_frame_index:06}.png",
            self.video_stem, self.run_id
        )
    }
}

/// 把原始解析度影格複製到封存資料夾（不存在時建立）
///
/// 每個不重複的影格只複製一次，任何複製失敗都是致命錯誤
pub fn archive_frames(
    frames: &[SampledFrame],
    originals: &BTreeMap<u32, PathBuf>,
    archive_dir: &Path,
    naming: &ArchiveNaming,
) -> Result<Vec<PathBuf>> {
    ensure_directory_exists(archive_dir).map_err(|source| MontageError::Archival {
        path: archive_dir.to_path_buf(),
        source,
    })?;

    let mut copied_indices = HashSet::new();
    let mut archived = Vec::new();

    for frame in frames {
        if !copied_indices.insert(frame.source_frame_index) {
            continue;
        }
        let Some(source) = originals.get(&frame.grid_position) else {
            continue;
        };

        let destination = archive_dir.join(naming.file_name(frame.source_frame_index));
        fs::copy(source, &destination).map_err(|source| MontageError::Archival {
            path: destination.clone(),
            source,
        })?;
        archived.push(destination);
    }

    info!(
        "已封存 {} 張原始影格至 {}",
        archived.len(),
        archive_dir.display()
    );

    Ok(archived)
}
