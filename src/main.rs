//! # dftbkit - DFTB+ 作业准备与运行工具
//!
//! 接收几何结构（GenFormat、HSD 包装的 GenFormat 或 VASP POSCAR），
//! 校验并规范化后生成 DFTB+ 输入，在独立的作业目录中运行引擎并提取结果。
//!
//! ## 子命令
//! - `prepare`    - 校验几何并创建作业
//! - `run`        - 运行一个或多个作业（并行）
//! - `results`    - 查询作业状态与总能量
//! - `show`       - 查看作业目录中的文件
//! - `param-sets` - 列出可用参数集
//! - `list`       - 列出所有作业
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── config.rs   (进程级配置)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── jobs/      (作业目录、准备、运行、结果)
//!   │     ├── dftb/      (参数集、物种、输入文件)
//!   │     ├── parsers/   (几何识别与解析、detailed.out)
//!   │     ├── batch/     (并行执行)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (输出、进度条、日志)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod config;
mod dftb;
mod error;
mod jobs;
mod models;
mod parsers;
mod utils;

use clap::Parser;
use cli::Cli;
use config::Settings;
use std::error::Error as _;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();
    utils::logging::init(cli.global.verbose);

    let settings = Settings::from_args(&cli.global);
    tracing::debug!(?settings, "settings");

    if let Err(e) = commands::run(cli.command, &settings) {
        let mut msg = e.to_string();
        let mut source = e.source();
        while let Some(cause) = source {
            msg.push_str(&format!(": {}", cause));
            source = cause.source();
        }
        utils::output::print_error(&msg);
        std::process::exit(1);
    }
}
