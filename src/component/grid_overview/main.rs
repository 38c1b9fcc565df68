use super::frame_archiver::{ArchiveNaming, archive_frames};
use super::frame_extractor::{OutputSpec, extract_frames};
use super::frame_labeler::label_frames;
use super::montage_composer::compose;
use super::sampling_planner::{SampledFrame, plan};
use super::workspace::{CleanupReport, Workspace};
use crate::config::{GridSpec, MontageConfig};
use crate::error::{MontageError, Result};
use crate::tools::{VideoMetadata, check_tools, probe_video};
use console::style;
use log::{info, warn};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 取樣計畫（`--plan-only` 以 JSON 輸出）
#[derive(Debug, Clone, Serialize)]
pub struct SamplingPlan {
    pub metadata: VideoMetadata,
    pub grid: GridSpec,
    pub offset: u64,
    pub frames: Vec<SampledFrame>,
}

/// 總覽圖生成結果
#[derive(Debug)]
pub struct GenerationReport {
    pub metadata: VideoMetadata,
    pub frames: Vec<SampledFrame>,
    pub output_path: PathBuf,
    pub archived: Vec<PathBuf>,
    pub cleanup: CleanupReport,
}

/// 各階段產出
struct StageOutput {
    output_path: PathBuf,
    archived: Vec<PathBuf>,
}

/// 影片總覽圖生成器
///
/// 流程：
/// A. 取得影片資訊（ffprobe）
/// B. 計算取樣影格
/// C. 擷取原始解析度影格（選擇性封存）
/// D. 擷取縮放並銳化的工作副本
/// E. 加上標籤（可停用）
/// F. 合併為總覽圖
///
/// 任一階段失敗即中止，暫存檔一律清理。
pub struct GridOverviewGenerator {
    config: MontageConfig,
    shutdown_signal: Arc<AtomicBool>,
}

impl GridOverviewGenerator {
    pub const fn new(config: MontageConfig, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &MontageConfig {
        &self.config
    }

    /// 只讀取影片資訊並計算取樣計畫，不擷取任何影格
    pub fn plan_only(&self) -> Result<SamplingPlan> {
        let metadata = probe_video(&self.config.tools.ffprobe, &self.config.input)?;
        let frames = plan(&metadata, &self.config.grid, self.config.offset);

        Ok(SamplingPlan {
            metadata,
            grid: self.config.grid,
            offset: self.config.offset,
            frames,
        })
    }

    pub fn run(&self) -> Result<GenerationReport> {
        check_tools(&self.config.tools, self.config.labels_enabled)?;

        // Stage A: 取得影片資訊
        print!("  {} 讀取影片資訊...", style("A").dim());
        let metadata = probe_video(&self.config.tools.ffprobe, &self.config.input)?;
        println!(
            " {} 幀, {}fps, 約 {} 分鐘",
            metadata.total_frames, metadata.frame_rate, metadata.duration_minutes
        );

        // Stage B: 計算取樣影格
        print!("  {} 計算取樣影格...", style("B").dim());
        let mut frames = plan(&metadata, &self.config.grid, self.config.offset);
        println!(
            " {} 網格共 {} 格，取樣 {} 張",
            self.config.grid.tile_geometry(),
            self.config.grid.total_cells(),
            frames.len()
        );

        if frames.is_empty() {
            return Err(MontageError::NothingToSample {
                total_frames: metadata.total_frames,
                offset: self.config.offset,
            });
        }

        let mut workspace = Workspace::new(self.config.work_dir.clone());
        let outcome = self.run_stages(&mut frames, &mut workspace);
        workspace.finish(&outcome);

        println!("  {} 移除暫存檔...", style("*").dim());
        let cleanup = workspace.cleanup();
        if cleanup.failed > 0 {
            warn!("有 {} 個暫存檔無法刪除", cleanup.failed);
        }

        let stages = outcome?;
        info!("總覽圖已建立: {}", stages.output_path.display());

        Ok(GenerationReport {
            metadata,
            frames,
            output_path: stages.output_path,
            archived: stages.archived,
            cleanup,
        })
    }

    fn run_stages(
        &self,
        frames: &mut [SampledFrame],
        workspace: &mut Workspace,
    ) -> Result<StageOutput> {
        let config = &self.config;
        workspace.activate()?;

        // Stage C: 原始解析度影格
        self.ensure_not_cancelled()?;
        println!("  {} 擷取原始解析度影格...", style("C").dim());
        let originals = extract_frames(
            &config.tools.ffmpeg,
            &config.input,
            frames,
            &OutputSpec::original(),
            workspace,
        )?;

        let mut archived = Vec::new();
        if let Some(archive_dir) = &config.keep_frames_dir {
            println!(
                "  {} 封存原始影格至 `{}`...",
                style("C").dim(),
                archive_dir.display()
            );
            let naming = ArchiveNaming::new(&config.input);
            archived = archive_frames(frames, &originals, archive_dir, &naming)?;
        }

        // Stage D: 縮放並銳化的工作副本
        self.ensure_not_cancelled()?;
        println!("  {} 擷取縮放影格...", style("D").dim());
        let resized = extract_frames(
            &config.tools.ffmpeg,
            &config.input,
            frames,
            &OutputSpec::resized(config.frame_width),
            workspace,
        )?;
        for frame in frames.iter_mut() {
            frame.extracted = resized.contains_key(&frame.grid_position);
        }

        // Stage E: 標籤
        self.ensure_not_cancelled()?;
        let tiles = if config.labels_enabled {
            println!("  {} 加上影格標籤...", style("E").dim());
            label_frames(
                &config.tools.convert,
                frames,
                &resized,
                config.label_font_size,
                workspace,
            )?
        } else {
            resized
        };

        // Stage F: 合併總覽圖
        self.ensure_not_cancelled()?;
        println!(
            "  {} 合併總覽圖至 `{}`...",
            style("F").dim(),
            config.output.display()
        );
        let ordered: Vec<PathBuf> = tiles.into_values().collect();
        let output_path = compose(
            &config.tools.montage,
            &ordered,
            &config.grid,
            config.frame_width,
            &config.output,
        )?;

        Ok(StageOutput {
            output_path,
            archived,
        })
    }

    fn ensure_not_cancelled(&self) -> Result<()> {
        if self.shutdown_signal.load(Ordering::SeqCst) {
            warn!("收到中斷訊號，停止處理");
            return Err(MontageError::Cancelled);
        }
        Ok(())
    }
}
