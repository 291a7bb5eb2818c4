//! # prepare 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/prepare.rs`

use crate::jobs::InputKind;
use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 输入类型选择
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum InputKindArg {
    /// GenFormat, HSD-wrapped GenFormat, or POSCAR (auto-detected)
    Genformat,
    /// VASP POSCAR only
    Poscar,
}

impl From<InputKindArg> for InputKind {
    fn from(kind: InputKindArg) -> Self {
        match kind {
            InputKindArg::Genformat => InputKind::Genformat,
            InputKindArg::Poscar => InputKind::Poscar,
        }
    }
}

/// prepare 子命令参数
#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Geometry file, or '-' to read stdin
    pub input: PathBuf,

    /// Parameter set (defaults to --default-param-set)
    #[arg(long)]
    pub param_set: Option<String>,

    /// How to interpret the input
    #[arg(long, value_enum, default_value = "genformat")]
    pub kind: InputKindArg,

    /// Print the outcome as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}
