//! # results 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/results.rs`

use clap::Args;

/// results 子命令参数
#[derive(Args, Debug)]
pub struct ResultsArgs {
    /// Job id
    pub job_id: String,

    /// Print the result as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}
