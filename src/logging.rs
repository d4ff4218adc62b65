use tracing_subscriber::EnvFilter;

/// 初始化 tracing 输出。
///
/// 级别来自 `MYNOTES_LOG`，其次 `RUST_LOG`（支持 env-filter 语法）；
/// 缺省时 debug 构建 info、release 构建 warn。
pub fn init() {
    let filter = std::env::var("MYNOTES_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                "info".to_string()
            } else {
                "warn".to_string()
            }
        });

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(true)
        .init();
}
