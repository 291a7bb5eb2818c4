//! # run 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/run.rs`

use crate::config::DEFAULT_TIMEOUT_SECS;
use clap::Args;

/// run 子命令参数
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Job ids to run
    #[arg(required = true)]
    pub job_ids: Vec<String>,

    /// Wall-clock limit per job in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Number of jobs run in parallel (0 = number of CPUs)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Print outcomes as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}
