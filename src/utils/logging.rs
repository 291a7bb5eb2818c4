//! # 日志初始化
//!
//! `tracing` 诊断日志写到 stderr，与命令的标准输出分开。
//! 级别由 `RUST_LOG` 控制，默认 `warn`；`-v` 为 debug，`-vv` 及以上为 trace。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `tracing-subscriber`

use tracing_subscriber::EnvFilter;

/// 根据 -v 次数选择默认过滤级别
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

/// 安装全局 subscriber，重复调用时忽略
pub fn init(verbosity: u8) {
    let filter = if verbosity == 0 {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(0)))
    } else {
        EnvFilter::new(default_directive(verbosity))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(default_directive(0), "warn");
        assert_eq!(default_directive(1), "debug");
        assert_eq!(default_directive(3), "trace");
    }
}
