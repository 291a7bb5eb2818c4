//! # 数据模型模块
//!
//! 定义统一的几何表示与作业相关数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`、`dftb/`、`jobs/` 和 `commands/` 使用
//! - 子模块: geometry, job

pub mod geometry;
pub mod job;

pub use geometry::{CoordinateMode, GeomAtom, Geometry, Lattice};
pub use job::{DetectedInput, JobMeta, JobState, PrepareOutcome, RunRecord, SimulationResult};
