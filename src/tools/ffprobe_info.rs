use crate::error::{MontageError, Result};
use crate::tools::external_command::run_command;
use crate::tools::rounding::round_to;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Command;

/// 影片基本資訊，每次執行只讀取一次
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VideoMetadata {
    pub total_frames: u64,
    pub frame_rate: f64,
    pub duration_minutes: f64,
}

impl VideoMetadata {
    /// 由幀數與幀率推算長度（分鐘，取三位小數）
    pub fn new(total_frames: u64, frame_rate: f64) -> Result<Self> {
        if !frame_rate.is_finite() || frame_rate <= 0.0 {
            return Err(MontageError::Probe(format!("幀率無效: {frame_rate}")));
        }

        let duration_minutes = round_to(total_frames as f64 / frame_rate / 60.0, 3);

        Ok(Self {
            total_frames,
            frame_rate,
            duration_minutes,
        })
    }
}

#[derive(Deserialize)]
struct FfprobeOutput {
    streams: Option<Vec<StreamInfo>>,
}

#[derive(Deserialize)]
struct StreamInfo {
    r_frame_rate: Option<String>,
    nb_read_packets: Option<String>,
    nb_frames: Option<String>,
}

/// 使用 ffprobe 取得影片幀數與幀率
///
/// 以 `-count_packets` 實際計數第一條視訊串流的封包數
pub fn probe_video(ffprobe: &Path, path: &Path) -> Result<VideoMetadata> {
    let mut command = Command::new(ffprobe);
    command
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-count_packets",
            "-show_entries",
            "stream=nb_read_packets,nb_frames,r_frame_rate",
            "-of",
            "json",
        ])
        .arg(path);

    let output = run_command(&mut command).map_err(|e| MontageError::Probe(e.to_string()))?;
    let stdout = String::from_utf8_lossy(&output.stdout);

    parse_probe_output(&stdout)
}

/// 解析 ffprobe JSON 輸出
pub fn parse_probe_output(stdout: &str) -> Result<VideoMetadata> {
    let probe: FfprobeOutput = serde_json::from_str(stdout)
        .map_err(|e| MontageError::Probe(format!("無法解析 ffprobe 輸出: {e}")))?;

    let stream = probe
        .streams
        .as_ref()
        .and_then(|streams| streams.first())
        .ok_or_else(|| MontageError::Probe("找不到視訊串流".to_string()))?;

    let frame_count_text = stream
        .nb_read_packets
        .as_deref()
        .or(stream.nb_frames.as_deref())
        .ok_or_else(|| MontageError::Probe("ffprobe 未回報幀數".to_string()))?;
    let total_frames = parse_frame_count(frame_count_text)
        .ok_or_else(|| MontageError::Probe(format!("幀數格式錯誤: {frame_count_text:?}")))?;

    let rate_text = stream
        .r_frame_rate
        .as_deref()
        .ok_or_else(|| MontageError::Probe("ffprobe 未回報幀率".to_string()))?;
    let frame_rate = parse_frame_rate(rate_text)
        .ok_or_else(|| MontageError::Probe(format!("幀率格式錯誤: {rate_text:?}")))?;

    debug!("ffprobe: {total_frames} 幀, 幀率 {rate_text} -> {frame_rate}");

    VideoMetadata::new(total_frames, round_to(frame_rate, 3))
}

/// 解析幀數（容許 csv 輸出的結尾逗號）
fn parse_frame_count(text: &str) -> Option<u64> {
    text.trim().trim_end_matches(',').trim().parse().ok()
}

/// 解析幀率字串（例如 "30/1" 或 "30000/1001"）
///
/// 只接受十進位數字與單一除號，不做任何運算式求值
pub fn parse_frame_rate(rate: &str) -> Option<f64> {
    let pattern = Regex::new(r"^\s*([0-9]+(?:\.[0-9]+)?)\s*(?:/\s*([0-9]+(?:\.[0-9]+)?))?\s*,?\s*$")
        .ok()?;
    let caps = pattern.captures(rate)?;

    let num: f64 = caps.get(1)?.as_str().parse().ok()?;
    let value = match caps.get(2) {
        Some(den) => {
            let den: f64 = den.as_str().parse().ok()?;
            if den <= 0.0 {
                return None;
            }
            num / den
        }
        None => num,
    };

    (value > 0.0).then_some(value)
}
