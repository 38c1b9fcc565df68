use crate::config::{
    DEFAULT_COLS, DEFAULT_ROWS, EXTRACTED_FRAME_WIDTH, GridSpec, INTERFRAME_OFFSET,
    LABEL_FONTSIZE, MontageConfig, ToolPaths,
};
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

const CLI_AFTER_HELP: &str = "Examples:\n  video-grid-overview movie.mkv overview.png\n  video-grid-overview movie.mkv overview.png --cols 6 --rows 4 --no-labels\n  video-grid-overview movie.mkv overview.png --keep-frames frames/\n  video-grid-overview movie.mkv --plan-only";

#[derive(Debug, Parser)]
#[command(
    name = "video-grid-overview",
    version,
    about = "Create a labeled grid of evenly spaced frames from a video",
    after_help = CLI_AFTER_HELP
)]
pub struct Cli {
    /// Input video file (any ffmpeg compatible format).
    pub input: PathBuf,

    /// Output image file.
    #[arg(required_unless_present = "plan_only")]
    pub output: Option<PathBuf>,

    /// How many columns of frames.
    #[arg(short = 'c', long, default_value_t = DEFAULT_COLS, value_parser = clap::value_parser!(u32).range(1..))]
    pub cols: u32,

    /// How many rows of frames.
    #[arg(short = 'r', long, default_value_t = DEFAULT_ROWS, value_parser = clap::value_parser!(u32).range(1..))]
    pub rows: u32,

    /// Disable rendering of frame labels (replaces the old single-dash `-nl`).
    #[arg(long)]
    pub no_labels: bool,

    /// Directory to save full-resolution extracted frames (created if missing).
    #[arg(long, value_name = "DIR")]
    pub keep_frames: Option<PathBuf>,

    /// Frame offset added to every sampled index, skips leading black frames.
    #[arg(long, default_value_t = INTERFRAME_OFFSET)]
    pub offset: u64,

    /// Width in pixels of each tile.
    #[arg(long, default_value_t = EXTRACTED_FRAME_WIDTH, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Parent directory for intermediate files instead of the system temp dir.
    /// Each run works in its own subdirectory, removed afterwards; the directory itself is kept.
    #[arg(long, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    /// Probe the video and print the sampling plan as JSON without extracting anything.
    #[arg(long)]
    pub plan_only: bool,

    /// Show debug logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// ffprobe executable.
    #[arg(long, env = "VGO_FFPROBE", default_value = "ffprobe")]
    pub ffprobe: PathBuf,

    /// ffmpeg executable.
    #[arg(long, env = "VGO_FFMPEG", default_value = "ffmpeg")]
    pub ffmpeg: PathBuf,

    /// ImageMagick `convert` executable.
    #[arg(long, env = "VGO_CONVERT", default_value = "convert")]
    pub convert: PathBuf,

    /// ImageMagick `montage` executable.
    #[arg(long, env = "VGO_MONTAGE", default_value = "montage")]
    pub montage: PathBuf,
}

impl Cli {
    pub fn into_config(self) -> Result<MontageConfig> {
        Ok(MontageConfig {
            input: self.input,
            output: self.output.unwrap_or_default(),
            grid: GridSpec::new(self.cols, self.rows)?,
            offset: self.offset,
            frame_width: self.width,
            labels_enabled: !self.no_labels,
            label_font_size: LABEL_FONTSIZE,
            keep_frames_dir: self.keep_frames,
            work_dir: self.work_dir,
            tools: ToolPaths {
                ffprobe: self.ffprobe,
                ffmpeg: self.ffmpeg,
                convert: self.convert,
                montage: self.montage,
            },
        })
    }
}
