//! 影片總覽圖流程的錯誤類型
//!
//! 所有外部工具失敗都視為致命錯誤，不重試、不輸出部分結果。

use std::io::Error as IoError;
use std::path::PathBuf;

use thiserror::Error;

/// 擷取的影格種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameVariant {
    /// 原始解析度（供封存使用）
    Original,
    /// 縮放並銳化後的工作副本
    Resized,
}

impl FrameVariant {
    /// 暫存檔名前綴
    #[must_use]
    pub const fn file_prefix(self) -> &'static str {
        match self {
            Self::Original => "original_frame",
            Self::Resized => "frame",
        }
    }
}

impl std::fmt::Display for FrameVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Original => write!(f, "original"),
            Self::Resized => write!(f, "resized"),
        }
    }
}

#[derive(Debug, Error)]
pub enum MontageError {
    /// 找不到外部工具或無法執行
    #[error("外部工具 `{tool}` 無法使用: {reason}")]
    MissingTool { tool: String, reason: String },

    #[error("網格尺寸無效: {columns}x{rows}（欄與列都必須 >= 1，總格數不可超過 {max}）", max = u32::MAX)]
    InvalidGrid { columns: u32, rows: u32 },

    /// ffprobe 執行失敗、輸出無法解析，或幀率為零
    #[error("影片資訊讀取失敗: {0}")]
    Probe(String),

    /// 起始偏移已超出影片長度，沒有任何影格可取
    #[error("沒有可擷取的影格: 影片共 {total_frames} 幀，偏移 {offset}")]
    NothingToSample { total_frames: u64, offset: u64 },

    #[error("影格擷取失敗 ({variant}): {reason}")]
    Extraction {
        variant: FrameVariant,
        reason: String,
    },

    #[error("無法封存影格至 {}: {source}", .path.display())]
    Archival {
        path: PathBuf,
        #[source]
        source: IoError,
    },

    #[error("影格標籤失敗 [格位 {grid_position}]: {reason}")]
    Labeling { grid_position: u32, reason: String },

    #[error("合併總覽圖失敗: {0}")]
    Composition(String),

    #[error("暫存工作區錯誤: {0}")]
    Workspace(String),

    #[error("操作已取消")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, MontageError>;
