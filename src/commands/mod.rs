//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `jobs/`, `dftb/`, `batch/`, `utils/`
//! - 子模块: prepare, run, results, show, params, list

pub mod list;
pub mod params;
pub mod prepare;
pub mod results;
pub mod run;
pub mod show;

use crate::cli::Commands;
use crate::config::Settings;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands, settings: &Settings) -> Result<()> {
    match cmd {
        Commands::Prepare(args) => prepare::execute(args, settings),
        Commands::Run(args) => run::execute(args, settings),
        Commands::Results(args) => results::execute(args, settings),
        Commands::Show(args) => show::execute(args, settings),
        Commands::ParamSets => params::execute(settings),
        Commands::List(args) => list::execute(args, settings),
    }
}
