mod dependency_check;
mod external_command;
mod ffprobe_info;
mod path_validator;
pub mod rounding;

pub use dependency_check::check_tools;
pub use external_command::{CommandFailure, describe_command, run_command};
pub use ffprobe_info::{VideoMetadata, parse_frame_rate, parse_probe_output, probe_video};
pub use path_validator::{ensure_directory_exists, validate_file_exists};
