//! # results 命令实现
//!
//! 每次都从作业目录重新计算结果。
//!
//! ## 依赖关系
//! - 使用 `cli/results.rs` 定义的参数
//! - 使用 `jobs/results.rs`, `utils/output.rs`

use crate::cli::results::ResultsArgs;
use crate::config::Settings;
use crate::error::Result;
use crate::jobs::{extract_results, WorkspaceManager};
use crate::models::SimulationResult;
use crate::utils::output;

/// 执行 results 命令
pub fn execute(args: ResultsArgs, settings: &Settings) -> Result<()> {
    let workspace = WorkspaceManager::new(settings);
    let result = extract_results(&workspace, &args.job_id)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }
    Ok(())
}

fn print_result(result: &SimulationResult) {
    output::print_job_card(
        &format!("Job {}", result.job_id),
        &[
            ("State", output::state_label(result.state).to_string()),
            ("Files", result.files.join(", ")),
            ("Exit code", format_rc(result.rc)),
            ("Total energy", format_energy(result)),
        ],
    );
}

fn format_rc(rc: Option<i32>) -> String {
    rc.map(|rc| rc.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Hartree 与 eV 一起显示
pub fn format_energy(result: &SimulationResult) -> String {
    match (result.total_energy_hartree, result.total_energy_ev) {
        (Some(h), Some(ev)) => format!("{:.10} H ({:.4} eV)", h, ev),
        (Some(h), None) => format!("{:.10} H", h),
        _ => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobState;

    fn result(h: Option<f64>, ev: Option<f64>) -> SimulationResult {
        SimulationResult {
            job_id: "j".into(),
            state: JobState::Completed,
            files: vec![],
            total_energy_hartree: h,
            total_energy_ev: ev,
            rc: Some(0),
            ok: true,
        }
    }

    #[test]
    fn test_format_energy() {
        assert_eq!(
            format_energy(&result(Some(-4.0779379326), Some(-110.9666))),
            "-4.0779379326 H (-110.9666 eV)"
        );
        assert_eq!(format_energy(&result(Some(-1.5), None)), "-1.5000000000 H");
        assert_eq!(format_energy(&result(None, None)), "-");
        assert_eq!(format_rc(None), "-");
    }
}
