//! # 诊断日志初始化
//!
//! 使用 `tracing-subscriber` 输出到 stderr。`SECURETRANS_LOG` 优先，
//! 否则按 `-v` 次数选择级别。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用

use tracing_subscriber::EnvFilter;

/// 日志过滤环境变量
pub const LOG_ENV: &str = "SECURETRANS_LOG";

/// `-v` 次数对应的默认过滤级别
pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "securetrans=debug",
        _ => "securetrans=trace",
    }
}

/// 初始化全局订阅者
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(default_directive(0), "warn");
        assert_eq!(default_directive(1), "securetrans=debug");
        assert_eq!(default_directive(5), "securetrans=trace");
    }
}
