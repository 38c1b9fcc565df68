pub mod types;

pub use types::{
    DEFAULT_COLS, DEFAULT_ROWS, EXTRACTED_FRAME_WIDTH, GridSpec, INTERFRAME_OFFSET,
    LABEL_FONTSIZE, MontageConfig, SHARPEN_FILTER, ToolPaths,
};
