//! # 结果提取
//!
//! 每次查询都从作业目录重新计算，不做缓存：
//! 文件列表、推断状态、总能量，以及最近一次运行的退出码。
//!
//! ## 依赖关系
//! - 被 `commands/results.rs`, `commands/list.rs` 调用
//! - 使用 `jobs/workspace.rs`, `parsers/detailed.rs`

use super::workspace::{job_state, list_entries, WorkspaceManager};
use crate::dftb::DETAILED_OUT;
use crate::error::Result;
use crate::models::SimulationResult;
use crate::parsers::detailed::parse_detailed_out;

/// 汇总一个作业的结果
pub fn extract_results(workspace: &WorkspaceManager, job_id: &str) -> Result<SimulationResult> {
    let dir = workspace.resolve(job_id)?;
    let files = list_entries(&dir);
    let state = job_state(&dir);

    let report = dir.join(DETAILED_OUT);
    let energy = if report.is_file() {
        match parse_detailed_out(&report) {
            Ok(energy) => energy,
            Err(e) => {
                tracing::warn!(job_id, error = %e, "could not read detailed.out");
                None
            }
        }
    } else {
        None
    };

    let rc = workspace
        .read_meta(&dir)
        .and_then(|meta| meta.last_run)
        .and_then(|run| run.rc);

    Ok(SimulationResult {
        job_id: job_id.to_string(),
        state,
        files,
        total_energy_hartree: energy.map(|e| e.hartree),
        total_energy_ev: energy.and_then(|e| e.ev),
        rc,
        ok: report.is_file(),
    })
}
