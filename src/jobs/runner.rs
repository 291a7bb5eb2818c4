//! # 引擎执行器
//!
//! 在作业目录中运行 DFTB+，标准输出与错误输出合并写入 `out.log`，
//! 受墙钟超时约束。是否成功以 `detailed.out` 是否生成为准，
//! 同时返回原始退出码。超时后终止进程，不自动提取结果。
//!
//! ## 依赖关系
//! - 被 `commands/run.rs` 调用（经由 `batch/runner.rs` 并行）
//! - 使用 `jobs/workspace.rs`, `jobs/lock.rs`

use super::lock::RunLock;
use super::workspace::{job_state, WorkspaceManager};
use crate::config::EngineConfig;
use crate::dftb::{DETAILED_OUT, INPUT_DECK, RUN_LOG};
use crate::error::{DftbkitError, Result};
use crate::models::RunRecord;

use chrono::Utc;
use serde::Serialize;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// 轮询子进程的间隔
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// 单次运行的结果（执行失败也以此表示，而不是错误）
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub job_id: String,
    pub ok: bool,
    pub rc: Option<i32>,
    pub timed_out: bool,
    pub log: String,
    pub elapsed_secs: f64,
}

impl RunOutcome {
    /// 失败原因的简短说明
    pub fn failure_reason(&self) -> Option<String> {
        if self.ok {
            None
        } else if self.timed_out {
            Some(format!("timed out after {:.0}s", self.elapsed_secs))
        } else {
            match self.rc {
                Some(0) => Some(format!("exit code 0 but no {}", DETAILED_OUT)),
                Some(rc) => Some(format!("exit code {}", rc)),
                None => Some("terminated by signal".to_string()),
            }
        }
    }
}

/// 引擎执行器
pub struct SimulationRunner<'a> {
    engine: &'a EngineConfig,
    workspace: &'a WorkspaceManager,
}

impl<'a> SimulationRunner<'a> {
    pub fn new(engine: &'a EngineConfig, workspace: &'a WorkspaceManager) -> Self {
        SimulationRunner { engine, workspace }
    }

    /// 运行一个已准备好的作业
    pub fn run(&self, job_id: &str) -> Result<RunOutcome> {
        let dir = self.workspace.resolve(job_id)?;
        if !dir.join(INPUT_DECK).is_file() {
            return Err(DftbkitError::NotPrepared {
                job_id: job_id.to_string(),
            });
        }

        let _lock = RunLock::acquire(&dir, job_id)?;
        self.workspace.ensure_param_link(&dir)?;

        // 旧报告会让失败的重跑看起来成功；引擎启动前先移开，启动失败则还原
        let report = dir.join(DETAILED_OUT);
        let log_path = dir.join(RUN_LOG);
        let old_report = SetAside::new(&report)?;
        let old_log = match SetAside::new(&log_path) {
            Ok(old) => old,
            Err(e) => {
                old_report.restore();
                return Err(e);
            }
        };
        let previous = [old_report, old_log];

        let started_at = Utc::now();
        let start = Instant::now();
        let child = match self.spawn(&dir, &log_path) {
            Ok(child) => child,
            Err(e) => {
                for old in previous {
                    old.restore();
                }
                return Err(e);
            }
        };
        for old in previous {
            old.discard();
        }
        tracing::info!(job_id, pid = child.id(), command = %self.engine.command_line(), "engine started");

        let (status, timed_out) = wait_with_timeout(child, self.engine.timeout, job_id)?;
        let rc = status.and_then(|s| s.code());
        let ok = !timed_out && report.is_file();
        let elapsed = start.elapsed();

        if timed_out {
            tracing::warn!(job_id, timeout_secs = self.engine.timeout.as_secs(), "engine killed after timeout");
        } else {
            tracing::info!(job_id, ?rc, ok, elapsed_secs = elapsed.as_secs_f64(), "engine finished");
        }

        if let Some(mut meta) = self.workspace.read_meta(&dir) {
            meta.last_run = Some(RunRecord {
                started_at,
                finished_at: Utc::now(),
                rc,
                ok,
                timed_out,
            });
            meta.state = job_state(&dir);
            self.workspace.write_meta(&dir, &meta)?;
        }

        Ok(RunOutcome {
            job_id: job_id.to_string(),
            ok,
            rc,
            timed_out,
            log: log_path.display().to_string(),
            elapsed_secs: elapsed.as_secs_f64(),
        })
    }

    fn spawn(&self, dir: &Path, log_path: &Path) -> Result<Child> {
        let log = File::create(log_path).map_err(|e| DftbkitError::FileWriteError {
            path: log_path.display().to_string(),
            source: e,
        })?;
        let log_err = log.try_clone().map_err(|e| DftbkitError::FileWriteError {
            path: log_path.display().to_string(),
            source: e,
        })?;

        Command::new(&self.engine.program)
            .args(&self.engine.args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::from(log))
            .stderr(Stdio::from(log_err))
            .spawn()
            .map_err(|e| DftbkitError::EngineSpawn {
                command: self.engine.command_line(),
                source: e,
            })
    }
}

/// 运行前被移到 `<name>.prev` 的旧文件
struct SetAside {
    original: PathBuf,
    moved: Option<PathBuf>,
}

impl SetAside {
    fn new(path: &Path) -> Result<SetAside> {
        if !path.exists() {
            return Ok(SetAside {
                original: path.to_path_buf(),
                moved: None,
            });
        }
        let mut name = path.as_os_str().to_owned();
        name.push(".prev");
        let moved = PathBuf::from(name);
        fs::rename(path, &moved).map_err(|e| DftbkitError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(SetAside {
            original: path.to_path_buf(),
            moved: Some(moved),
        })
    }

    /// 删除本次运行留下的同名文件，放回旧文件
    fn restore(self) {
        let _ = fs::remove_file(&self.original);
        if let Some(moved) = &self.moved {
            if let Err(e) = fs::rename(moved, &self.original) {
                tracing::warn!(file = %self.original.display(), error = %e, "failed to restore previous file");
            }
        }
    }

    fn discard(self) {
        if let Some(moved) = &self.moved {
            if let Err(e) = fs::remove_file(moved) {
                tracing::warn!(file = %moved.display(), error = %e, "failed to remove previous file");
            }
        }
    }
}

/// 等待子进程结束；超时则终止。返回 (退出状态, 是否超时)
fn wait_with_timeout(
    mut child: Child,
    timeout: Duration,
    job_id: &str,
) -> Result<(Option<ExitStatus>, bool)> {
    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok((Some(status), false)),
            Ok(None) => {
                let now = Instant::now();
                if now >= deadline {
                    if let Err(e) = child.kill() {
                        tracing::warn!(job_id, error = %e, "failed to kill engine");
                    }
                    let _ = child.wait();
                    return Ok((None, true));
                }
                thread::sleep(POLL_INTERVAL.min(deadline - now));
            }
            Err(e) => {
                let _ = child.kill();
                return Err(DftbkitError::EngineSpawn {
                    command: format!("wait for pid {}", child.id()),
                    source: e,
                });
            }
        }
    }
}
