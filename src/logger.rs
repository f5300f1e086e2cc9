//! 日志初始化

use tracing_subscriber::{fmt, EnvFilter};

/// 安装全局 tracing 订阅者
///
/// 日志级别取自 `RUST_LOG`，未设置时为 `info`。重复调用不会报错。
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
