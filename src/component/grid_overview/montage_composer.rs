use crate::config::GridSpec;
use crate::error::{MontageError, Result};
use crate::tools::{ensure_directory_exists, run_command};
use log::debug;
use std::path::{Path, PathBuf};
use std::process::Command;

/// 建立 montage 命令
///
/// 輸入依格位順序排列；數量少於格數時，後面的格子留空
#[must_use]
pub fn build_montage_command(
    montage: &Path,
    images: &[impl AsRef<Path>],
    grid: &GridSpec,
    tile_density: u32,
    output_path: &Path,
) -> Command {
    let density = tile_density.to_string();
    let tile = grid.tile_geometry();
    let mut command = Command::new(montage);
    command
        .args(["-density", density.as_str()])
        .args(["-tile", tile.as_str()])
        .args(["-geometry", "+0+0", "-border", "0"]);
    for image in images {
        command.arg(image.as_ref());
    }
    command.arg(output_path);
    command
}

/// 以單次 montage 呼叫合併所有影格為總覽圖
pub fn compose(
    montage: &Path,
    images: &[impl AsRef<Path>],
    grid: &GridSpec,
    tile_density: u32,
    output_path: &Path,
) -> Result<PathBuf> {
    if images.is_empty() {
        return Err(MontageError::Composition("沒有任何影格可合併".to_string()));
    }

    debug!(
        "合併 {} 張影格為 {} 總覽圖",
        images.len(),
        grid.tile_geometry()
    );

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_directory_exists(parent).map_err(|e| {
            MontageError::Composition(format!("無法建立輸出資料夾 {}: {e}", parent.display()))
        })?;
    }

    let mut command = build_montage_command(montage, images, grid, tile_density, output_path);
    run_command(&mut command).map_err(|e| MontageError::Composition(e.to_string()))?;

    if !output_path.exists() {
        return Err(MontageError::Composition(format!(
            "總覽圖未建立: {}",
            output_path.display()
        )));
    }

    debug!("總覽圖已建立: {}", output_path.display());
    Ok(output_path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;

    #[test]
    fn test_build_montage_command_args() {
        let grid = GridSpec::new(3, 2).unwrap();
        let images = [PathBuf::from("/tmp/w/labeled_1.png"), PathBuf::from("/tmp/w/labeled_2.png")];
        let command = build_montage_command(
            Path::new("montage"),
            &images,
            &grid,
            256,
            Path::new("out.png"),
        );

        let args: Vec<&OsStr> = command.get_args().collect();
        assert_eq!(
            args,
            [
                "-density",
                "256",
                "-tile",
                "3x2",
                "-geometry",
                "+0+0",
                "-border",
                "0",
                "/tmp/w/labeled_1.png",
                "/tmp/w/labeled_2.png",
                "out.png",
            ]
            .map(OsStr::new)
        );
    }

    #[test]
    fn test_compose_rejects_empty_input() {
        let grid = GridSpec::new(2, 2).unwrap();
        let images: [PathBuf; 0] = [];
        let err = compose(Path::new("montage"), &images, &grid, 256, Path::new("out.png"))
            .unwrap_err();
        assert!(matches!(err, MontageError::Composition(_)));
    }

    #[test]
    fn test_compose_tool_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let grid = GridSpec::new(1, 1).unwrap();
        let output = dir.path().join("nested").join("out.png");

        let err = compose(
            Path::new("no-such-montage-6e0a"),
            &[dir.path().join("labeled_1.png")],
            &grid,
            256,
            &output,
        )
        .unwrap_err();

        assert!(matches!(err, MontageError::Composition(_)));
        assert!(!output.exists());
    }
}
