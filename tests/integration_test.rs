//! 整合測試 - 透過公開 API 驗證取樣計畫、ffprobe 解析與暫存清理
//!
//! 不需要任何外部工具

use std::fs;
use std::path::PathBuf;

use video_grid_overview::component::grid_overview::{
    ArchiveNaming, LABELED_PREFIX, Workspace, WorkspaceState, build_label, plan, sample_indices,
};
use video_grid_overview::config::{GridSpec, INTERFRAME_OFFSET};
use video_grid_overview::tools::{VideoMetadata, parse_frame_rate, parse_probe_output};
use video_grid_overview::MontageError;

/// 測試 1: 單格標籤
#[test]
fn test_single_frame_label() {
    let metadata = VideoMetadata::new(3000, 30.0).unwrap();
    let grid = GridSpec::new(1, 1).unwrap();

    assert!((metadata.duration_minutes - 1.667).abs() < 1e-9);

    let frames = plan(&metadata, &grid, INTERFRAME_OFFSET);
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].source_frame_index, 30);
    assert_eq!(frames[0].label_text, "Frame 30 @ 0.02 min (1.0%)");
}

/// 測試 2: 短影片只填前 10 格
#[test]
fn test_short_video_populates_ten_cells() {
    let metadata = VideoMetadata::new(40, 25.0).unwrap();
    let grid = GridSpec::new(8, 8).unwrap();

    let frames = plan(&metadata, &grid, 30);
    let positions: Vec<u32> = frames.iter().map(|f| f.grid_position).collect();

    assert_eq!(positions, (0..10).collect::<Vec<_>>());
    assert!(frames.iter().all(|f| f.source_frame_index < 40));
    assert_eq!(frames.last().unwrap().source_frame_index, 39);
}

/// 測試 3: 空計畫
#[test]
fn test_empty_plans() {
    let grid = GridSpec::new(8, 8).unwrap();
    assert!(sample_indices(0, &grid, 30).is_empty());
    assert!(sample_indices(30, &grid, 30).is_empty());
    assert!(sample_indices(29, &grid, 30).is_empty());
}

/// 測試 4: 計畫性質（格數上限、遞增格位、決定性）
#[test]
fn test_plan_properties() {
    for total_frames in [1_u64, 45, 64, 65, 500, 1799, 86_400] {
        for (cols, rows) in [(1, 1), (2, 5), (8, 8), (12, 3)] {
            let grid = GridSpec::new(cols, rows).unwrap();
            let metadata = VideoMetadata::new(total_frames, 29.97).unwrap();

            let frames = plan(&metadata, &grid, 30);
            assert_eq!(frames, plan(&metadata, &grid, 30));
            assert!(frames.len() <= grid.total_cells() as usize);

            for frame in &frames {
                assert!(frame.source_frame_index < total_frames);
                assert!(frame.grid_position < grid.total_cells());
                assert_eq!(
                    frame.row(&grid) * cols + frame.column(&grid),
                    frame.grid_position
                );
            }
            assert!(frames.windows(2).all(|w| w[0].grid_position < w[1].grid_position));
        }
    }
}

/// 測試 5: 標籤格式
#[test]
fn test_label_format() {
    assert_eq!(build_label(0, 100, 1.0), "Frame 0 @ 0.0 min (0.0%)");
    assert_eq!(build_label(75, 100, 2.0), "Frame 75 @ 1.5 min (75.0%)");
}

/// 測試 6: ffprobe 輸出解析
#[test]
fn test_probe_parsing() {
    let rate = parse_frame_rate("30000/1001").unwrap();
    assert!((rate - 29.970_03).abs() < 1e-4);

    let metadata = parse_probe_output(
        r#"{"programs":[],"streams":[{"r_frame_rate":"30000/1001","nb_read_packets":"3000"}]}"#,
    )
    .unwrap();
    assert!((metadata.frame_rate - 29.97).abs() < 1e-9);
    assert_eq!(metadata.total_frames, 3000);

    assert!(matches!(
        parse_probe_output(r#"{"streams":[{"r_frame_rate":"1+1","nb_read_packets":"3000"}]}"#),
        Err(MontageError::Probe(_))
    ));
}

/// 測試 7: 成功或失敗後都不留下暫存檔
#[test]
fn test_workspace_cleanup_totality() {
    for succeeded in [true, false] {
        let dir = tempfile::tempdir().unwrap();
        let mut workspace = Workspace::new(Some(dir.path().to_path_buf()));
        workspace.activate().unwrap();

        let mut created = Vec::new();
        for sequence in 1..=4 {
            for prefix in ["original_frame", "frame", LABELED_PREFIX] {
                let path = workspace.artifact_path(prefix, sequence).unwrap();
                fs::write(&path, b"png").unwrap();
                created.push(path);
            }
        }

        let outcome: Result<(), MontageError> = if succeeded {
            Ok(())
        } else {
            Err(MontageError::Composition("boom".to_string()))
        };
        workspace.finish(&outcome);
        let expected = if succeeded {
            WorkspaceState::Completed
        } else {
            WorkspaceState::Failed
        };
        assert_eq!(workspace.state(), expected);

        let report = workspace.cleanup();
        assert_eq!(report.removed, created.len());
        assert_eq!(report.failed, 0);

        let remaining: Vec<PathBuf> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert!(remaining.is_empty(), "殘留暫存檔: {remaining:?}");
    }
}

/// 測試 8: 封存檔名依執行區分
#[test]
fn test_archive_names_are_namespaced() {
    let video = PathBuf::from("/videos/talk.webm");
    let first = ArchiveNaming::new(&video);
    let second = ArchiveNaming::new(&video);

    assert!(first.file_name(1234).starts_with("talk_"));
    assert!(first.file_name(1234).ends_with("_frame_001234.png"));
    assert_ne!(first.run_id(), second.run_id());
}
