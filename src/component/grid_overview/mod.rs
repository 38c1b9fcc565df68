//! 影片總覽圖生成元件
//!
//! 六階段流程：
//! A. 取得影片資訊（ffprobe）
//! B. 計算取樣影格
//! C. 擷取原始解析度影格，選擇性封存
//! D. 擷取縮放並銳化的工作副本
//! E. 加上標籤
//! F. 合併為總覽圖（montage）

mod frame_archiver;
mod frame_extractor;
mod frame_labeler;
mod main;
mod montage_composer;
mod sampling_planner;
mod workspace;

pub use frame_archiver::{ArchiveNaming, archive_frames};
pub use frame_extractor::{
    OutputSpec, build_filter_chain, build_select_expression, distinct_indices, extract_frames,
};
pub use frame_labeler::{escape_label_text, label_frame, label_frames};
pub use main::{GenerationReport, GridOverviewGenerator, SamplingPlan};
pub use montage_composer::{build_montage_command, compose};
pub use sampling_planner::{SampledFrame, build_label, plan, sample_indices, sampling_stride};
pub use workspace::{
    CleanupReport, LABELED_PREFIX, Workspace, WorkspaceState, transient_file_name,
};
