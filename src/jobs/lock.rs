//! # 作业运行锁
//!
//! 以 `create_new` 打开 `.run.lock`，同一作业的并发 run 会得到 `JobBusy`。
//! 锁在 drop 时删除。进程被强制结束时锁文件会残留：文件中记录的 pid
//! 已不存在时视为过期锁，下一次 run 会回收它。
//!
//! ## 依赖关系
//! - 被 `jobs/runner.rs` 使用

use crate::error::{DftbkitError, Result};

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
#[cfg(unix)]
use std::process::{Command, Stdio};

pub const LOCK_FILE: &str = ".run.lock";

/// 持有期间独占该作业的运行权
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    pub fn acquire(dir: &Path, job_id: &str) -> Result<RunLock> {
        let path = dir.join(LOCK_FILE);
        match Self::create(&path) {
            Err(e) if e.kind() == ErrorKind::AlreadyExists && is_stale(&path) => {
                tracing::warn!(job_id, lock = %path.display(), "removing stale run lock");
                let _ = fs::remove_file(&path);
                Self::finish(Self::create(&path), path, job_id)
            }
            other => Self::finish(other, path, job_id),
        }
    }

    fn create(path: &Path) -> std::io::Result<()> {
        let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
        let _ = writeln!(file, "{}", std::process::id());
        Ok(())
    }

    fn finish(created: std::io::Result<()>, path: PathBuf, job_id: &str) -> Result<RunLock> {
        match created {
            Ok(()) => Ok(RunLock { path }),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(DftbkitError::JobBusy {
                job_id: job_id.to_string(),
                lock: path.display().to_string(),
            }),
            Err(e) => Err(DftbkitError::FileWriteError {
                path: path.display().to_string(),
                source: e,
            }),
        }
    }
}

/// 锁文件中的 pid 已不存在；读不出 pid 时按占用处理
fn is_stale(path: &Path) -> bool {
    let pid = match fs::read_to_string(path)
        .ok()
        .and_then(|s| s.trim().parse::<u32>().ok())
    {
        Some(pid) => pid,
        None => return false,
    };
    pid != std::process::id() && !process_alive(pid)
}

#[cfg(unix)]
fn process_alive(pid: u32) -> bool {
    // 有 procfs 时直接查目录，否则交给 kill -0
    if Path::new("/proc/self").exists() {
        return Path::new("/proc").join(pid.to_string()).exists();
    }
    Command::new("kill")
        .args(["-0", &pid.to_string()])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(true)
}

#[cfg(not(unix))]
fn process_alive(_pid: u32) -> bool {
    true
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!(lock = %self.path.display(), error = %e, "failed to release run lock");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_is_busy() {
        let dir = tempfile::tempdir().unwrap();
        let lock = RunLock::acquire(dir.path(), "job").unwrap();
        assert!(matches!(
            RunLock::acquire(dir.path(), "job"),
            Err(DftbkitError::JobBusy { .. })
        ));
        drop(lock);
        assert!(!dir.path().join(LOCK_FILE).exists());
        RunLock::acquire(dir.path(), "job").unwrap();
    }

    #[test]
    fn test_lock_held_by_this_process_is_busy() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(LOCK_FILE), format!("{}\n", std::process::id())).unwrap();
        assert!(matches!(
            RunLock::acquire(dir.path(), "job"),
            Err(DftbkitError::JobBusy { .. })
        ));
    }

    #[test]
    fn test_unreadable_lock_is_busy() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(LOCK_FILE), "").unwrap();
        assert!(RunLock::acquire(dir.path(), "job").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_lock_of_dead_process_is_reclaimed() {
        let mut child = std::process::Command::new("true").spawn().unwrap();
        let dead_pid = child.id();
        child.wait().unwrap();

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(LOCK_FILE), format!("{}\n", dead_pid)).unwrap();
        let lock = RunLock::acquire(dir.path(), "job").unwrap();
        let owner = fs::read_to_string(dir.path().join(LOCK_FILE)).unwrap();
        assert_eq!(owner.trim(), std::process::id().to_string());
        drop(lock);
        assert!(!dir.path().join(LOCK_FILE).exists());
    }
}
