//! # list 命令实现
//!
//! 扫描作业根目录，按文件证据给出每个作业的状态，表格显示，可导出 CSV。
//!
//! ## 依赖关系
//! - 使用 `cli/list.rs` 定义的参数
//! - 使用 `jobs/`, `utils/output.rs`
//! - 使用 `tabled`, `csv`

use crate::cli::list::ListArgs;
use crate::config::Settings;
use crate::error::{DftbkitError, Result};
use crate::jobs::{extract_results, WorkspaceManager};
use crate::utils::output;

use std::path::Path;
use tabled::{Table, Tabled};

/// 列表中的一行
#[derive(Debug, Clone, Tabled)]
struct JobRow {
    #[tabled(rename = "Job")]
    job_id: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Param set")]
    param_set: String,
    #[tabled(rename = "Energy (H)")]
    energy: String,
    #[tabled(rename = "Exit")]
    rc: String,
}

/// 执行 list 命令
pub fn execute(args: ListArgs, settings: &Settings) -> Result<()> {
    let workspace = WorkspaceManager::new(settings);
    let rows = collect_rows(&workspace);

    if rows.is_empty() {
        output::print_warning(&format!(
            "No jobs under '{}'",
            workspace.jobs_root().display()
        ));
    } else {
        println!("{}", Table::new(&rows));
    }

    if let Some(path) = &args.csv {
        save_rows_csv(&rows, path)?;
        output::print_saved("Job list", path);
    }
    Ok(())
}

fn collect_rows(workspace: &WorkspaceManager) -> Vec<JobRow> {
    workspace
        .list_jobs()
        .into_iter()
        .filter_map(|job_id| {
            let result = match extract_results(workspace, &job_id) {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!(job_id = %job_id, error = %e, "skipping job");
                    return None;
                }
            };
            let param_set = workspace
                .resolve(&job_id)
                .ok()
                .and_then(|dir| workspace.read_meta(&dir))
                .map(|meta| meta.param_set)
                .unwrap_or_default();
            Some(JobRow {
                job_id,
                state: result.state.to_string(),
                param_set,
                energy: result
                    .total_energy_hartree
                    .map(|h| format!("{:.10}", h))
                    .unwrap_or_default(),
                rc: result.rc.map(|rc| rc.to_string()).unwrap_or_default(),
            })
        })
        .collect()
}

fn save_rows_csv(rows: &[JobRow], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;
    wtr.write_record(["job_id", "state", "param_set", "total_energy_hartree", "rc"])?;
    for row in rows {
        wtr.write_record([
            &row.job_id,
            &row.state,
            &row.param_set,
            &row.energy,
            &row.rc,
        ])?;
    }
    wtr.flush().map_err(|e| DftbkitError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;
    Ok(())
}
