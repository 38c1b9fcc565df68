use super::sampling_planner::SampledFrame;
use super::workspace::{LABELED_PREFIX, Workspace};
use crate::error::{MontageError, Result};
use crate::tools::{CommandFailure, run_command};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;

/// 跳脫 ImageMagick `label:` 的特殊字元
///
/// `%` 會被當成格式代碼，開頭的 `@` 會被當成檔案路徑
#[must_use]
pub fn escape_label_text(text: &str) -> String {
    let escaped = text.replace('\\', "\\\\").replace('%', "%%");
    match escaped.strip_prefix('@') {
        Some(rest) => format!("\\@{rest}"),
        None => escaped,
    }
}

/// 在影格下方加上黑底白字標籤
pub fn label_frame(
    convert: &Path,
    image: &Path,
    text: &str,
    font_size: u32,
    output: &Path,
) -> std::result::Result<(), CommandFailure> {
    let point_size = font_size.to_string();
    let mut command = Command::new(convert);
    command
        .arg(image)
        .args([
            "-background",
            "black",
            "-fill",
            "white",
            "-pointsize",
            point_size.as_str(),
        ])
        .arg(format!("label:{}", escape_label_text(text)))
        .args(["-gravity", "center", "-append"])
        .arg(output);

    run_command(&mut command).map(|_| ())
}

/// 逐張加上標籤，輸出 `labeled_<k>.png`（k 依格位順序 1 起算）
pub fn label_frames(
    convert: &Path,
    frames: &[SampledFrame],
    resized: &BTreeMap<u32, PathBuf>,
    font_size: u32,
    workspace: &mut Workspace,
) -> Result<BTreeMap<u32, PathBuf>> {
    let progress_bar = ProgressBar::new(frames.len() as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        progress_bar.set_style(style.progress_chars("#>-"));
    }
    progress_bar.set_message("加上標籤中...");

    let mut labeled = BTreeMap::new();

    for (i, frame) in frames.iter().enumerate() {
        let Some(image) = resized.get(&frame.grid_position) else {
            progress_bar.abandon_with_message("標籤失敗");
            return Err(MontageError::Labeling {
                grid_position: frame.grid_position,
                reason: "找不到對應的工作副本".to_string(),
            });
        };

        let output = workspace.artifact_path(LABELED_PREFIX, i + 1)?;

        if let Err(e) = label_frame(convert, image, &frame.label_text, font_size, &output) {
            error!("影格標籤失敗 [{}]: {e}", frame.grid_position);
            progress_bar.abandon_with_message("標籤失敗");
            return Err(MontageError::Labeling {
                grid_position: frame.grid_position,
                reason: e.to_string(),
            });
        }

        labeled.insert(frame.grid_position, output);
        progress_bar.inc(1);
    }

    progress_bar.finish_and_clear();
    info!("已加上 {} 張標籤", labeled.len());

    Ok(labeled)
}
