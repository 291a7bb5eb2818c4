//! # show 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/show.rs`

use clap::Args;

/// show 子命令参数
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Job id
    pub job_id: String,

    /// File name inside the job directory (e.g. out.log, dftb_in.hsd)
    pub file: String,
}
