use log::debug;
use std::process::{Command, ExitStatus, Output};
use thiserror::Error;

/// 外部程序執行失敗的原因
#[derive(Debug, Error)]
pub enum CommandFailure {
    #[error("無法執行 {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} 結束狀態 {status}: {stderr}")]
    Status {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
}

/// 執行外部程序並等待結束，非零結束狀態視為失敗
///
/// 沒有逾時，子程序卡住時整個流程會跟著卡住
pub fn run_command(command: &mut Command) -> Result<Output, CommandFailure> {
    let program = command.get_program().to_string_lossy().to_string();
    debug!("執行: {}", describe_command(command));

    let output = command
        .output()
        .map_err(|source| CommandFailure::Spawn {
            program: program.clone(),
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(CommandFailure::Status {
            program,
            status: output.status,
            stderr,
        });
    }

    Ok(output)
}

/// 組出可讀的命令列（僅供日誌使用）
#[must_use]
pub fn describe_command(command: &Command) -> String {
    let mut parts = vec![command.get_program().to_string_lossy().to_string()];
    parts.extend(command.get_args().map(|arg| arg.to_string_lossy().to_string()));
    parts.join(" ")
}
