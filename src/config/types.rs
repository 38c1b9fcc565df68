use crate::error::{MontageError, Result};
use serde::Serialize;
use std::path::PathBuf;

/// 預設網格配置：8 欄 x 8 列 = 64 張影格
pub const DEFAULT_COLS: u32 = 8;
pub const DEFAULT_ROWS: u32 = 8;

/// 避開開頭黑畫面的影格偏移量
pub const INTERFRAME_OFFSET: u64 = 30;

/// 工作副本寬度（像素）
///
/// montage 會把每張影格載入記憶體，太大會耗盡記憶體
pub const EXTRACTED_FRAME_WIDTH: u32 = 256;

pub const LABEL_FONTSIZE: u32 = 10;

pub const SHARPEN_FILTER: &str = "unsharp=lx=5:ly=5:la=0.5";

/// 網格尺寸
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridSpec {
    columns: u32,
    rows: u32,
}

impl GridSpec {
    /// 欄列都必須 >= 1，且總格數不可超過 `u32::MAX`
    pub fn new(columns: u32, rows: u32) -> Result<Self> {
        if columns == 0 || rows == 0 || columns.checked_mul(rows).is_none() {
            return Err(MontageError::InvalidGrid { columns, rows });
        }
        Ok(Self { columns, rows })
    }

    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    #[must_use]
    pub const fn total_cells(&self) -> u32 {
        self.columns * self.rows
    }

    /// montage `-tile` 參數格式，例如 `8x8`
    #[must_use]
    pub fn tile_geometry(&self) -> String {
        format!("{}x{}", self.columns, self.rows)
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
        }
    }
}

/// 外部工具的執行檔路徑
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub ffprobe: PathBuf,
    pub ffmpeg: PathBuf,
    pub convert: PathBuf,
    pub montage: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            ffprobe: PathBuf::from("ffprobe"),
            ffmpeg: PathBuf::from("ffmpeg"),
            convert: PathBuf::from("convert"),
            montage: PathBuf::from("montage"),
        }
    }
}

/// 單次執行的完整設定，明確傳入每個階段
#[derive(Debug, Clone)]
pub struct MontageConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub grid: GridSpec,
    pub offset: u64,
    pub frame_width: u32,
    pub labels_enabled: bool,
    pub label_font_size: u32,
    /// 原始解析度影格的封存資料夾（呼叫端擁有，不會被刪除）
    pub keep_frames_dir: Option<PathBuf>,
    /// 呼叫端指定的暫存資料夾；未指定時使用系統暫存目錄
    pub work_dir: Option<PathBuf>,
    pub tools: ToolPaths,
}

impl MontageConfig {
    #[must_use]
    pub fn new(input: PathBuf, output: PathBuf) -> Self {
        Self {
            input,
            output,
            grid: GridSpec::default(),
            offset: INTERFRAME_OFFSET,
            frame_width: EXTRACTED_FRAME_WIDTH,
            labels_enabled: true,
            label_font_size: LABEL_FONTSIZE,
            keep_frames_dir: None,
            work_dir: None,
            tools: ToolPaths::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_spec_rejects_zero() {
        assert!(GridSpec::new(0, 8).is_err());
        assert!(GridSpec::new(8, 0).is_err());
        assert!(GridSpec::new(1, 1).is_ok());
    }

    #[test]
    fn test_grid_spec_rejects_cell_overflow() {
        assert!(matches!(
            GridSpec::new(65_536, 65_536),
            Err(MontageError::InvalidGrid {
                columns: 65_536,
                rows: 65_536
            })
        ));
        assert!(GridSpec::new(u32::MAX, 2).is_err());

        let widest = GridSpec::new(u32::MAX, 1).unwrap();
        assert_eq!(widest.total_cells(), u32::MAX);
    }

    #[test]
    fn test_grid_spec_geometry() {
        let grid = GridSpec::new(4, 3).unwrap();
        assert_eq!(grid.total_cells(), 12);
        assert_eq!(grid.tile_geometry(), "4x3");
    }

    #[test]
    fn test_default_config() {
        let config = MontageConfig::new(PathBuf::from("in.mp4"), PathBuf::from("out.png"));
        assert_eq!(config.grid.total_cells(), 64);
        assert_eq!(config.offset, 30);
        assert_eq!(config.frame_width, 256);
        assert!(config.labels_enabled);
        assert!(config.keep_frames_dir.is_none());
    }
}
