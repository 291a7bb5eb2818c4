//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `prepare`: 校验几何输入并生成作业目录
//! - `run`: 运行一个或多个作业
//! - `results`: 查询作业结果
//! - `show`: 查看作业目录中的文件
//! - `param-sets`: 列出可用参数集
//! - `list`: 列出所有作业及其状态
//!
//! 全局参数都可以由环境变量给出。
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: prepare, run, results, show, list

pub mod list;
pub mod prepare;
pub mod results;
pub mod run;
pub mod show;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// dftbkit - DFTB+ 作业准备与运行工具
#[derive(Parser)]
#[command(name = "dftbkit")]
#[command(version)]
#[command(about = "Prepare, run and inspect DFTB+ jobs", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// 所有子命令共享的配置
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Root directory of Slater-Koster parameter sets
    #[arg(long, global = true, env = "DFTB_PREFIX", default_value = "parameters")]
    pub param_root: PathBuf,

    /// Directory holding one sub-directory per job
    #[arg(long, global = true, env = "DFTBKIT_JOBS_ROOT", default_value = "data/jobs")]
    pub jobs_root: PathBuf,

    /// Parameter set used when none is given
    #[arg(long, global = true, env = "DFTBKIT_PARAM_SET", default_value = "mio-1-1")]
    pub default_param_set: String,

    /// DFTB+ executable
    #[arg(long, global = true, env = "DFTBKIT_ENGINE", default_value = "dftb+")]
    pub engine: String,

    /// Extra argument passed to the engine (repeatable)
    #[arg(long, global = true, allow_hyphen_values = true)]
    pub engine_arg: Vec<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Validate a geometry and create a prepared job
    Prepare(prepare::PrepareArgs),

    /// Run one or more prepared jobs
    Run(run::RunArgs),

    /// Show the results of a job
    Results(results::ResultsArgs),

    /// Print a file from a job directory
    Show(show::ShowArgs),

    /// List available parameter sets
    ParamSets,

    /// List all jobs with their state
    List(list::ListArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_accepts_many_jobs() {
        let cli = Cli::parse_from(["dftbkit", "run", "a", "b", "--jobs", "2", "--timeout", "5"]);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.job_ids, vec!["a", "b"]);
                assert_eq!(args.jobs, 2);
                assert_eq!(args.timeout, 5);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_prepare_kind() {
        let cli = Cli::parse_from(["dftbkit", "prepare", "-", "--kind", "poscar"]);
        match cli.command {
            Commands::Prepare(args) => {
                assert_eq!(args.input, PathBuf::from("-"));
                assert_eq!(args.kind, prepare::InputKindArg::Poscar);
                assert!(args.param_set.is_none());
            }
            _ => panic!("expected prepare"),
        }
    }
}
