use env_logger::Env;
use log::LevelFilter;

/// 初始化日誌；`RUST_LOG` 優先，`verbose` 時強制 debug
pub fn init(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    if verbose {
        builder.filter_module("video_grid_overview", LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}
