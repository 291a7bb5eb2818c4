//! # 批量执行模块
//!
//! 多个作业并行运行。不同作业互不阻塞，同一作业由运行锁互斥。
//!
//! ## 依赖关系
//! - 被 `commands/run.rs` 使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod runner;

pub use runner::{BatchResult, BatchRunner, ProcessResult};
