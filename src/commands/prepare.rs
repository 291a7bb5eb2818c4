//! # prepare 命令实现
//!
//! 读取几何输入（文件或 stdin），创建已准备好的作业。
//!
//! ## 依赖关系
//! - 使用 `cli/prepare.rs` 定义的参数
//! - 使用 `jobs/prepare.rs`, `utils/output.rs`

use crate::cli::prepare::PrepareArgs;
use crate::config::Settings;
use crate::error::{DftbkitError, Result};
use crate::jobs::prepare_job;
use crate::utils::output;

use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// 执行 prepare 命令
pub fn execute(args: PrepareArgs, settings: &Settings) -> Result<()> {
    let text = read_input(&args.input)?;
    let outcome = prepare_job(settings, &text, args.kind.into(), args.param_set.as_deref())
        .map_err(|e| {
            tracing::debug!(kind = ?e.validation_kind(), status = e.http_status(), "prepare rejected");
            e
        })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    output::print_job_card(
        &format!("Prepared job {}", outcome.job_id),
        &[
            ("Detected input", outcome.detected_input.to_string()),
            ("Parameter set", outcome.param_set.clone()),
            ("Elements", outcome.elements.join(" ")),
            ("Species order", outcome.species_order.join(" ")),
            (
                "Directory",
                settings.jobs_root.join(&outcome.job_id).display().to_string(),
            ),
        ],
    );
    Ok(())
}

/// `-` 表示 stdin
fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| DftbkitError::FileReadError {
                path: "<stdin>".to_string(),
                source: e,
            })?;
        Ok(text)
    } else {
        fs::read_to_string(path).map_err(|e| DftbkitError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })
    }
}
