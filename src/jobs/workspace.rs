//! # 作业工作目录管理
//!
//! 每个作业一个独立目录，以 UUID 命名。作业状态不单独存储，
//! 而是由目录中的文件推断：
//! - `detailed.out` 存在 -> completed
//! - `dftb_in.hsd` 存在 -> prepared
//! - 否则 -> not-run
//!
//! 目录内另有 `job.json` 元数据记录（参数集、创建时间、最近一次运行）。
//!
//! ## 依赖关系
//! - 被 `jobs/prepare.rs`, `jobs/runner.rs`, `jobs/results.rs` 使用
//! - 被 `commands/` 使用
//! - 使用 `uuid`, `walkdir`, `serde_json`

use crate::config::Settings;
use crate::dftb::{CANONICAL_GEOMETRY, DETAILED_OUT, INPUT_DECK, PARAM_LINK, RAW_INPUT};
use crate::error::{DftbkitError, Result};
use crate::models::{JobMeta, JobState};

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;
use walkdir::WalkDir;

/// 作业元数据文件名
pub const META_FILE: &str = "job.json";

/// 作业目录管理器
#[derive(Debug, Clone)]
pub struct WorkspaceManager {
    jobs_root: PathBuf,
    param_root: PathBuf,
}

impl WorkspaceManager {
    pub fn new(settings: &Settings) -> Self {
        WorkspaceManager {
            jobs_root: settings.jobs_root.clone(),
            param_root: settings.param_root.clone(),
        }
    }

    pub fn jobs_root(&self) -> &Path {
        &self.jobs_root
    }

    /// 分配新的作业标识并创建空目录
    pub fn create(&self) -> Result<String> {
        fs::create_dir_all(&self.jobs_root).map_err(|e| DftbkitError::FileWriteError {
            path: self.jobs_root.display().to_string(),
            source: e,
        })?;

        loop {
            let job_id = Uuid::new_v4().to_string();
            let dir = self.jobs_root.join(&job_id);
            match fs::create_dir(&dir) {
                Ok(()) => {
                    tracing::info!(job_id = %job_id, dir = %dir.display(), "created job workspace");
                    return Ok(job_id);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(DftbkitError::FileWriteError {
                        path: dir.display().to_string(),
                        source: e,
                    })
                }
            }
        }
    }

    /// 写入输入文件、原始输入与规范几何，并重建参数链接
    pub fn write_artifacts(
        &self,
        job_id: &str,
        deck: &str,
        raw_input: &str,
        canonical: &str,
    ) -> Result<()> {
        let dir = self.resolve(job_id)?;
        write_file(&dir.join(INPUT_DECK), deck)?;
        write_file(&dir.join(RAW_INPUT), raw_input)?;
        write_file(&dir.join(CANONICAL_GEOMETRY), canonical)?;
        self.link_params(&dir)?;
        tracing::debug!(job_id, "wrote job artifacts");
        Ok(())
    }

    /// 解析作业目录，不存在时返回 `JobNotFound`
    pub fn resolve(&self, job_id: &str) -> Result<PathBuf> {
        if !is_plain_component(job_id) {
            return Err(DftbkitError::JobNotFound {
                job_id: job_id.to_string(),
            });
        }
        let dir = self.jobs_root.join(job_id);
        if dir.is_dir() {
            Ok(dir)
        } else {
            Err(DftbkitError::JobNotFound {
                job_id: job_id.to_string(),
            })
        }
    }

    /// 解析作业目录中的单个文件
    pub fn resolve_file(&self, job_id: &str, name: &str) -> Result<PathBuf> {
        let dir = self.resolve(job_id)?;
        let path = dir.join(name);
        if is_plain_component(name) && path.is_file() {
            Ok(path)
        } else {
            Err(DftbkitError::FileNotFound {
                job_id: job_id.to_string(),
                name: name.to_string(),
            })
        }
    }

    /// 创建（或重建）指向参数根目录的链接
    pub fn link_params(&self, dir: &Path) -> Result<()> {
        let link = dir.join(PARAM_LINK);
        if fs::symlink_metadata(&link).is_ok() {
            remove_link(&link)?;
        }
        let target = fs::canonicalize(&self.param_root).unwrap_or_else(|_| self.param_root.clone());
        make_dir_link(&target, &link).map_err(|e| DftbkitError::FileWriteError {
            path: link.display().to_string(),
            source: e,
        })
    }

    /// 链接缺失时补建
    pub fn ensure_param_link(&self, dir: &Path) -> Result<()> {
        if dir.join(PARAM_LINK).exists() {
            return Ok(());
        }
        self.link_params(dir)
    }

    /// 删除作业目录（仅用于准备失败时回收）
    pub fn discard(&self, job_id: &str) {
        if let Ok(dir) = self.resolve(job_id) {
            if let Err(e) = fs::remove_dir_all(&dir) {
                tracing::warn!(job_id, error = %e, "failed to remove incomplete job workspace");
            }
        }
    }

    /// 读取 job.json，不存在或损坏时返回 None
    pub fn read_meta(&self, dir: &Path) -> Option<JobMeta> {
        let content = fs::read_to_string(dir.join(META_FILE)).ok()?;
        match serde_json::from_str(&content) {
            Ok(meta) => Some(meta),
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "ignoring unreadable job metadata");
                None
            }
        }
    }

    pub fn write_meta(&self, dir: &Path, meta: &JobMeta) -> Result<()> {
        let content = serde_json::to_string_pretty(meta)?;
        write_file(&dir.join(META_FILE), &content)
    }

    /// 作业根目录下的所有作业标识（排序）
    pub fn list_jobs(&self) -> Vec<String> {
        let mut ids: Vec<String> = WalkDir::new(&self.jobs_root)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_dir())
            .filter_map(|e| e.file_name().to_str().map(String::from))
            .collect();
        ids.sort();
        ids
    }
}

/// 由文件证据推断作业状态
pub fn job_state(dir: &Path) -> JobState {
    if dir.join(DETAILED_OUT).exists() {
        JobState::Completed
    } else if dir.join(INPUT_DECK).exists() {
        JobState::Prepared
    } else {
        JobState::NotRun
    }
}

/// 目录中的全部条目名（含参数链接），排序
pub fn list_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

fn is_plain_component(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(|c: char| c == '/' || c == '\\')
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| DftbkitError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}

fn remove_link(link: &Path) -> Result<()> {
    let result = fs::remove_file(link).or_else(|e| {
        // Windows 目录链接需要 remove_dir
        if cfg!(windows) {
            fs::remove_dir(link)
        } else {
            Err(e)
        }
    });
    result.map_err(|e| DftbkitError::FileWriteError {
        path: link.display().to_string(),
        source: e,
    })
}

#[cfg(unix)]
fn make_dir_link(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn make_dir_link(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}
