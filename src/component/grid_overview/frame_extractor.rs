use super::sampling_planner::SampledFrame;
use super::workspace::Workspace;
use crate::config::SHARPEN_FILTER;
use crate::error::{FrameVariant, MontageError, Result};
use crate::tools::run_command;
use log::{debug, info};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;

/// 擷取輸出設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSpec {
    pub variant: FrameVariant,
    /// 縮放寬度，只用於 `Resized`
    pub frame_width: u32,
}

impl OutputSpec {
    #[must_use]
    pub const fn original() -> Self {
        Self {
            variant: FrameVariant::Original,
            frame_width: 0,
        }
    }

    #[must_use]
    pub const fn resized(frame_width: u32) -> Self {
        Self {
            variant: FrameVariant::Resized,
            frame_width,
        }
    }
}

/// 取出不重複且遞增的影格編號
///
/// select 濾鏡依解碼順序輸出影格，同一幀只會輸出一次，
/// 所以第 k 個輸出檔對應第 k 個不重複的編號
#[must_use]
pub fn distinct_indices(frames: &[SampledFrame]) -> Vec<u64> {
    let mut indices: Vec<u64> = frames.iter().map(|f| f.source_frame_index).collect();
    indices.sort_unstable();
    indices.dedup();
    indices
}

/// 建立 select 濾鏡表達式，任一條件成立即選取該幀
#[must_use]
pub fn build_select_expression(indices: &[u64]) -> String {
    let conditions: Vec<String> = indices
        .iter()
        .map(|index| format!("eq(n\\,{index})"))
        .collect();

    format!("select='{}'", conditions.join("+"))
}

/// 完整的濾鏡鏈；縮放版本另外加上等比縮放與銳化
#[must_use]
pub fn build_filter_chain(indices: &[u64], spec: &OutputSpec) -> String {
    let select = build_select_expression(indices);
    match spec.variant {
        FrameVariant::Original => select,
        FrameVariant::Resized => {
            format!("{select},scale={}:-1,{SHARPEN_FILTER}", spec.frame_width)
        }
    }
}

/// 以單一 ffmpeg 程序擷取所有指定影格
///
/// 回傳格位到影格檔的對應；同一幀被多個格位使用時共用同一個檔案
pub fn extract_frames(
    ffmpeg: &Path,
    video_path: &Path,
    frames: &[SampledFrame],
    spec: &OutputSpec,
    workspace: &mut Workspace,
) -> Result<BTreeMap<u32, PathBuf>> {
    let indices = distinct_indices(frames);
    let prefix = spec.variant.file_prefix();

    let outputs = (1..=indices.len())
        .map(|sequence| workspace.artifact_path(prefix, sequence))
        .collect::<Result<Vec<_>>>()?;
    let output_pattern = workspace.path()?.join(format!("{prefix}_%d.png"));

    let filter = build_filter_chain(&indices, spec);
    debug!("擷取 {} 張影格 ({}): {filter}", indices.len(), spec.variant);

    let mut command = Command::new(ffmpeg);
    command
        .args(["-hide_banner", "-nostdin", "-loglevel", "error", "-i"])
        .arg(video_path)
        .args(["-vf", filter.as_str(), "-fps_mode", "passthrough", "-y"])
        .arg(&output_pattern);

    run_command(&mut command).map_err(|e| MontageError::Extraction {
        variant: spec.variant,
        reason: e.to_string(),
    })?;

    if let Some(missing) = outputs.iter().find(|path| !path.exists()) {
        return Err(MontageError::Extraction {
            variant: spec.variant,
            reason: format!("影格檔未建立: {}", missing.display()),
        });
    }

    info!("已擷取 {} 張影格 ({})", outputs.len(), spec.variant);

    Ok(map_to_grid(frames, &indices, &outputs))
}

/// 依影格編號把輸出檔對應回格位
fn map_to_grid(
    frames: &[SampledFrame],
    indices: &[u64],
    outputs: &[PathBuf],
) -> BTreeMap<u32, PathBuf> {
    frames
        .iter()
        .filter_map(|frame| {
            let slot = indices.binary_search(&frame.source_frame_index).ok()?;
            outputs
                .get(slot)
                .map(|path| (frame.grid_position, path.clone()))
        })
        .collect()
}
