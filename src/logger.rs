use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 初始化日志系统
///
/// 默认级别 info，可通过 `RUST_LOG` 覆盖
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stdout)
                .with_file(false)
                .with_line_number(false)
                .with_target(false),
        )
        .init();
}

/// 测试用日志，可重复调用
pub fn init_test() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with(
            fmt::layer()
                .with_test_writer()
                .with_file(true)
                .with_line_number(true)
                .with_target(false),
        )
        .try_init();
}
