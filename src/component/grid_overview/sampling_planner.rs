use crate::config::GridSpec;
use crate::tools::VideoMetadata;
use crate::tools::rounding::format_rounded;
use serde::Serialize;

/// 網格中的一格對應到的來源影格
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampledFrame {
    pub grid_position: u32,
    pub source_frame_index: u64,
    pub label_text: String,
    /// 工作副本是否已擷取完成
    pub extracted: bool,
}

impl SampledFrame {
    #[must_use]
    pub const fn row(&self, grid: &GridSpec) -> u32 {
        self.grid_position / grid.columns()
    }

    #[must_use]
    pub const fn column(&self, grid: &GridSpec) -> u32 {
        self.grid_position % grid.columns()
    }
}

/// 取樣間距：`round(total_frames / total_cells)`，採用銀行家捨入
#[must_use]
pub fn sampling_stride(total_frames: u64, grid: &GridSpec) -> u64 {
    (total_frames as f64 / f64::from(grid.total_cells())).round_ties_even() as u64
}

/// 計算每一格要取的影格編號
///
/// 超出影片長度的格位直接捨棄，不補空白格
#[must_use]
pub fn sample_indices(total_frames: u64, grid: &GridSpec, offset: u64) -> Vec<(u32, u64)> {
    let stride = sampling_stride(total_frames, grid);

    (0..grid.total_cells())
        .filter_map(|grid_position| {
            let candidate = stride
                .saturating_mul(u64::from(grid_position))
                .saturating_add(offset);
            (candidate < total_frames).then_some((grid_position, candidate))
        })
        .collect()
}

/// 影格標籤，例如 `Frame 30 @ 0.02 min (1.0%)`
#[must_use]
pub fn build_label(frame_index: u64, total_frames: u64, duration_minutes: f64) -> String {
    let percent_done = frame_index as f64 / total_frames as f64;
    let minutes_offset = duration_minutes * percent_done;

    format!(
        "Frame {frame_index} @ {} min ({}%)",
        format_rounded(minutes_offset, 2),
        format_rounded(percent_done * 100.0, 2)
    )
}

/// 建立取樣計畫，依 `grid_position` 由左至右、由上至下排列
#[must_use]
pub fn plan(metadata: &VideoMetadata, grid: &GridSpec, offset: u64) -> Vec<SampledFrame> {
    sample_indices(metadata.total_frames, grid, offset)
        .into_iter()
        .map(|(grid_position, source_frame_index)| SampledFrame {
            grid_position,
            source_frame_index,
            label_text: build_label(
                source_frame_index,
                metadata.total_frames,
                metadata.duration_minutes,
            ),
            extracted: false,
        })
        .collect()
}
