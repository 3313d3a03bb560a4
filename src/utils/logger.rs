use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn default_filter(verbose: bool, level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| match level {
        Some(level) => EnvFilter::new(format!("upbit_rest={}", level)),
        None if verbose => EnvFilter::new("upbit_rest=debug,info"),
        None => EnvFilter::new("upbit_rest=warn"),
    })
}

/// `level` 來自設定檔，RUST_LOG 優先
pub fn init_cli_logger(verbose: bool, level: Option<&str>) {
    let filter = default_filter(verbose, level);

    // stdout 保留給回應內容，日誌一律寫到 stderr
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

pub fn init_json_logger(level: Option<&str>) {
    let filter = default_filter(false, level.or(Some("info")));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(), // for log collectors
        )
        .init();
}
