//! # run 命令实现
//!
//! 并行运行多个作业，逐个报告结果。某个作业失败不影响其余作业；
//! 只要有一个没有成功，命令整体以非零状态退出。
//!
//! ## 依赖关系
//! - 使用 `cli/run.rs` 定义的参数
//! - 使用 `jobs/runner.rs`, `batch/runner.rs`, `utils/output.rs`

use crate::batch::{BatchResult, BatchRunner, ProcessResult};
use crate::cli::run::RunArgs;
use crate::config::Settings;
use crate::error::{DftbkitError, Result};
use crate::jobs::{RunOutcome, SimulationRunner, WorkspaceManager};
use crate::utils::output::{self, Verdict};

use serde::Serialize;
use std::time::Duration;

/// JSON 输出中的单个作业
#[derive(Serialize)]
#[serde(untagged)]
enum RunReport {
    Outcome(RunOutcome),
    Error { job_id: String, error: String, status: u16 },
}

/// 执行 run 命令
pub fn execute(args: RunArgs, settings: &Settings) -> Result<()> {
    let settings = settings.clone().with_timeout(Duration::from_secs(args.timeout));
    let workspace = WorkspaceManager::new(&settings);
    let runner = SimulationRunner::new(&settings.engine, &workspace);
    let batch = BatchRunner::new(args.jobs);

    if !args.json {
        output::print_note(&format!(
            "Running {} job(s) with `{}` ({} parallel, timeout {}s)",
            args.job_ids.len(),
            settings.engine.command_line(),
            batch.jobs().min(args.job_ids.len()),
            args.timeout
        ));
    }

    let results: Vec<Result<RunOutcome>> =
        batch.run(&args.job_ids, "Running DFTB+", |id| runner.run(id));

    let mut summary = BatchResult::default();
    let mut reports = Vec::with_capacity(results.len());
    for (job_id, result) in args.job_ids.iter().zip(results) {
        let process = classify(job_id, &result);
        if !args.json {
            print_result(&process, &result);
        }
        summary.merge(process);
        reports.push(match result {
            Ok(outcome) => RunReport::Outcome(outcome),
            Err(e) => RunReport::Error {
                job_id: job_id.clone(),
                status: e.http_status(),
                error: e.to_string(),
            },
        });
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        output::print_batch_summary(&summary);
    }

    if summary.all_ok() {
        Ok(())
    } else {
        Err(DftbkitError::BatchFailed {
            failed: summary.failed + summary.errors,
            total: summary.total(),
        })
    }
}

fn classify(job_id: &str, result: &Result<RunOutcome>) -> ProcessResult {
    match result {
        Ok(outcome) => match outcome.failure_reason() {
            None => ProcessResult::Success(job_id.to_string()),
            Some(reason) => ProcessResult::Failed(job_id.to_string(), reason),
        },
        Err(e) => ProcessResult::Error(job_id.to_string(), e.to_string()),
    }
}

fn print_result(process: &ProcessResult, result: &Result<RunOutcome>) {
    match (process, result) {
        (ProcessResult::Success(id), Ok(outcome)) => output::print_job(
            Verdict::Finished,
            id,
            &format!("in {:.1}s (log: {})", outcome.elapsed_secs, outcome.log),
        ),
        (ProcessResult::Failed(id, reason), Ok(outcome)) => output::print_job(
            Verdict::Failed,
            id,
            &format!("{} (log: {})", reason, outcome.log),
        ),
        (ProcessResult::Error(id, err), _) => output::print_job(Verdict::NotRun, id, err),
        _ => {}
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::jobs::testutil::settings_with_params;
    use crate::jobs::{extract_results, prepare_job, InputKind};
    use crate::models::JobState;

    const GEN: &str = "1 C\nH\n1 1 0.0 0.0 0.0\n";

    #[test]
    fn test_one_failure_does_not_stop_others() {
        let tmp = tempfile::tempdir().unwrap();
        let mut settings = settings_with_params(tmp.path(), "mio-1-1", &["H"]);
        settings.engine = EngineConfig {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), "echo 'Total energy: -0.5 H' > detailed.out".to_string()],
            ..EngineConfig::default()
        };
        let a = prepare_job(&settings, GEN, InputKind::Genformat, None).unwrap().job_id;
        let b = prepare_job(&settings, GEN, InputKind::Genformat, None).unwrap().job_id;

        let args = RunArgs {
            job_ids: vec![a.clone(), "missing".to_string(), b.clone()],
            timeout: 30,
            jobs: 2,
            json: true,
        };
        let err = execute(args, &settings).unwrap_err();
        assert!(matches!(err, DftbkitError::BatchFailed { failed: 1, total: 3 }));

        let ws = WorkspaceManager::new(&settings);
        for id in [&a, &b] {
            let result = extract_results(&ws, id).unwrap();
            assert_eq!(result.state, JobState::Completed);
            assert_eq!(result.total_energy_hartree, Some(-0.5));
        }
    }
}
