//! # 进程级配置
//!
//! 启动时由命令行参数（可来自环境变量）构造一次，
//! 以引用方式传给需要它的组件，不使用全局状态。
//!
//! ## 依赖关系
//! - 被 `main.rs` 构造
//! - 被 `commands/` 和 `jobs/` 使用

use crate::cli::GlobalArgs;
use std::path::PathBuf;
use std::time::Duration;

/// 默认运行超时（秒）
pub const DEFAULT_TIMEOUT_SECS: u64 = 1200;

/// 外部引擎调用方式
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// 可执行文件
    pub program: String,
    /// 附加参数
    pub args: Vec<String>,
    /// 墙钟超时
    pub timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            program: "dftb+".to_string(),
            args: Vec::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl EngineConfig {
    /// 用于日志与错误信息的命令行文本
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// dftbkit 配置
#[derive(Debug, Clone)]
pub struct Settings {
    /// 参数根目录（只读共享）
    pub param_root: PathBuf,
    /// 作业目录的上级目录
    pub jobs_root: PathBuf,
    /// 调用方未指定时使用的参数集
    pub default_param_set: String,
    pub engine: EngineConfig,
}

impl Settings {
    pub fn from_args(args: &GlobalArgs) -> Self {
        Settings {
            param_root: args.param_root.clone(),
            jobs_root: args.jobs_root.clone(),
            default_param_set: args.default_param_set.clone(),
            engine: EngineConfig {
                program: args.engine.clone(),
                args: args.engine_arg.clone(),
                ..EngineConfig::default()
            },
        }
    }

    /// 覆盖运行超时
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.engine.timeout = timeout;
        self
    }
}
