//! 日志工具模块
//!
//! 提供 tracing 订阅器初始化

use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 默认 info 级别，可通过 RUST_LOG 环境变量覆盖
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
