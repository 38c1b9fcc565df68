use super::args::Cli;
use crate::component::GridOverviewGenerator;
use crate::component::grid_overview::GenerationReport;
use crate::error::MontageError;
use crate::tools::validate_file_exists;
use anyhow::{Context, Result};
use console::style;
use log::{debug, info};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// 依命令列參數執行一次總覽圖生成
pub fn run_grid_overview(cli: Cli, shutdown_signal: &Arc<AtomicBool>) -> Result<()> {
    let plan_only = cli.plan_only;
    let config = cli.into_config()?;
    validate_file_exists(&config.input)?;

    let generator = GridOverviewGenerator::new(config, Arc::clone(shutdown_signal));

    if plan_only {
        let plan = generator.plan_only().context("無法建立取樣計畫")?;
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    println!("{}", style("=== 影片總覽圖生成 ===").cyan().bold());
    println!(
        "{} {}",
        style("來源:").dim(),
        generator.config().input.display()
    );

    let report = generator.run().with_context(|| {
        format!(
            "無法建立總覽圖: {}",
            generator.config().input.display()
        )
    })?;

    print_summary(&report);
    Ok(())
}

/// 取消時的結束碼（128 + SIGINT）
pub const EXIT_CANCELLED: u8 = 130;

/// 輸出一次錯誤訊息，回傳對應的結束碼
pub fn report_error(err: &anyhow::Error) -> u8 {
    debug!("Program error: {err:?}");
    eprintln!("{} {:#}", style("錯誤:").red().bold(), err);
    exit_status(err)
}

fn exit_status(err: &anyhow::Error) -> u8 {
    if matches!(err.downcast_ref::<MontageError>(), Some(MontageError::Cancelled)) {
        EXIT_CANCELLED
    } else {
        1
    }
}

fn print_summary(report: &GenerationReport) {
    let extracted = report.frames.iter().filter(|f| f.extracted).count();

    println!();
    println!("{}", style("=== 總覽圖生成摘要 ===").cyan().bold());
    println!(
        "  影片: {} 幀 @ {}fps（約 {} 分鐘）",
        report.metadata.total_frames, report.metadata.frame_rate, report.metadata.duration_minutes
    );
    println!("  影格: {} 張", style(extracted).green());
    if !report.archived.is_empty() {
        println!("  封存: {} 張", report.archived.len());
    }
    if report.cleanup.failed > 0 {
        println!(
            "  未清除暫存檔: {} 個",
            style(report.cleanup.failed).yellow()
        );
    }
    println!(
        "  {} {}",
        style("✓").green(),
        report.output_path.display()
    );

    info!(
        "總覽圖生成完成 - 影格: {}, 封存: {}",
        extracted,
        report.archived.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_status_for_cancellation() {
        let err = anyhow::Error::new(MontageError::Cancelled).context("無法建立總覽圖: clip.mp4");
        assert_eq!(exit_status(&err), EXIT_CANCELLED);
        assert_eq!(report_error(&err), EXIT_CANCELLED);
    }

    #[test]
    fn test_exit_status_for_other_errors() {
        let err = anyhow::Error::new(MontageError::Composition("boom".to_string()));
        assert_eq!(exit_status(&err), 1);
        assert_eq!(exit_status(&anyhow::anyhow!("找不到檔案")), 1);
    }
}
