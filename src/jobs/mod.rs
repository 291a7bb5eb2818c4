//! # 作业生命周期
//!
//! 准备 -> 运行 -> 结果查询。每个作业对应作业根目录下的一个目录。
//!
//! ## 依赖关系
//! - 被 `commands/` 和 `batch/` 使用
//! - 子模块: workspace, lock, prepare, runner, results

pub mod lock;
pub mod prepare;
pub mod results;
pub mod runner;
pub mod workspace;

pub use prepare::{prepare_job, InputKind};
pub use results::extract_results;
pub use runner::{RunOutcome, SimulationRunner};
pub use workspace::WorkspaceManager;
