//! # DFTB+ 引擎约定
//!
//! 参数集、物种角动量与输入文件生成，以及引擎使用的固定文件名。
//!
//! ## 依赖关系
//! - 被 `jobs/` 和 `commands/` 使用
//! - 使用 `models/`, `parsers/genformat.rs`
//! - 子模块: params, species, deck

pub mod deck;
pub mod params;
pub mod species;

pub use deck::build_input_deck;
pub use params::{available_param_sets, ParameterSet};
pub use species::resolve_species;

/// 引擎输入文件
pub const INPUT_DECK: &str = "dftb_in.hsd";
/// 引擎详细报告，存在即视为完成
pub const DETAILED_OUT: &str = "detailed.out";
/// 引擎标准输出与错误输出
pub const RUN_LOG: &str = "out.log";
/// 作业目录内指向参数根目录的链接
pub const PARAM_LINK: &str = "parameters";
/// 规范 GenFormat 几何
pub const CANONICAL_GEOMETRY: &str = "GENFORMAT.txt";
/// 去围栏的原始输入
pub const RAW_INPUT: &str = "INPUT_RAW.txt";
