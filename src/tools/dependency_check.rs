use crate::config::ToolPaths;
use crate::error::{MontageError, Result};
use crate::tools::external_command::run_command;
use log::debug;
use std::path::Path;
use std::process::Command;

/// 執行前確認所需的外部工具都能啟動
///
/// 停用標籤時不檢查 `convert`
pub fn check_tools(tools: &ToolPaths, labels_enabled: bool) -> Result<()> {
    check_tool(&tools.ffprobe, "-version")?;
    check_tool(&tools.ffmpeg, "-version")?;
    if labels_enabled {
        check_tool(&tools.convert, "-version")?;
    }
    check_tool(&tools.montage, "-version")?;
    Ok(())
}

fn check_tool(program: &Path, version_flag: &str) -> Result<()> {
    let mut command = Command::new(program);
    command.arg(version_flag);

    let output = run_command(&mut command).map_err(|e| MontageError::MissingTool {
        tool: program.display().to_string(),
        reason: e.to_string(),
    })?;

    let first_line = String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .unwrap_or_default()
        .to_string();
    debug!("{}: {first_line}", program.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_check_tools_reports_missing_binary() {
        let tools = ToolPaths {
            ffprobe: PathBuf::from("no-such-ffprobe-9c1e"),
            ..ToolPaths::default()
        };

        let err = check_tools(&tools, true).unwrap_err();
        match err {
            MontageError::MissingTool { tool, .. } => assert_eq!(tool, "no-such-ffprobe-9c1e"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
