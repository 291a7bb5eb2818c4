//! # 统一错误处理模块
//!
//! 定义 dftbkit 的所有错误类型，使用 `thiserror` 派生。
//!
//! 执行失败（超时、非零退出、缺少 detailed.out）不是错误，
//! 而是 `RunOutcome { ok: false, .. }`，见 `jobs/runner.rs`。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use std::fmt;
use thiserror::Error;

/// 几何校验失败的具体子类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    TooShort,
    BadScale,
    BadLattice,
    BadSymbols,
    SymbolCountMismatch,
    BadCounts,
    BadMode,
    BadCoordinateLine,
    AtomCountMismatch,
    BadHeader,
    BadSpeciesLine,
    BadIndices,
    BadSpeciesId,
    BadCoordinate,
    UnclosedBlock,
}

impl ValidationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationKind::TooShort => "too_short",
            ValidationKind::BadScale => "bad_scale",
            ValidationKind::BadLattice => "bad_lattice",
            ValidationKind::BadSymbols => "bad_symbols",
            ValidationKind::SymbolCountMismatch => "symbol_count_mismatch",
            ValidationKind::BadCounts => "bad_counts",
            ValidationKind::BadMode => "bad_mode",
            ValidationKind::BadCoordinateLine => "bad_coordinate_line",
            ValidationKind::AtomCountMismatch => "atom_count_mismatch",
            ValidationKind::BadHeader => "bad_header",
            ValidationKind::BadSpeciesLine => "bad_species_line",
            ValidationKind::BadIndices => "bad_indices",
            ValidationKind::BadSpeciesId => "bad_species_id",
            ValidationKind::BadCoordinate => "bad_coordinate",
            ValidationKind::UnclosedBlock => "unclosed_block",
        }
    }
}

impl fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 几何文本校验错误（带子类与可读说明）
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind}: {detail}")]
pub struct ValidationError {
    pub kind: ValidationKind,
    pub detail: String,
}

impl ValidationError {
    pub fn new(kind: ValidationKind, detail: impl Into<String>) -> Self {
        ValidationError {
            kind,
            detail: detail.into(),
        }
    }
}

/// 错误大类，供传输层映射状态码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    NotFound,
    Precondition,
    Io,
}

/// dftbkit 统一错误类型
#[derive(Error, Debug)]
pub enum DftbkitError {
    // ─────────────────────────────────────────────────────────────
    // 几何校验
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid geometry: {0}")]
    Validation(#[from] ValidationError),

    // ─────────────────────────────────────────────────────────────
    // 配置错误
    // ─────────────────────────────────────────────────────────────
    #[error("Parameter set '{name}' not found under {root}. Available: {available}")]
    UnknownParamSet {
        name: String,
        root: String,
        available: String,
    },

    #[error("Slater-Koster file missing: {path}")]
    MissingSlakoFile { path: String },

    // ─────────────────────────────────────────────────────────────
    // 作业标识
    // ─────────────────────────────────────────────────────────────
    #[error("Job not found: {job_id}")]
    JobNotFound { job_id: String },

    #[error("File '{name}' not found in job {job_id}")]
    FileNotFound { job_id: String, name: String },

    // ─────────────────────────────────────────────────────────────
    // 前置条件
    // ─────────────────────────────────────────────────────────────
    #[error("Job {job_id} is not prepared (no input deck); run 'prepare' first")]
    NotPrepared { job_id: String },

    #[error("Job {job_id} is already running (lock file {lock})")]
    JobBusy { job_id: String, lock: String },

    // ─────────────────────────────────────────────────────────────
    // I/O 与外部进程
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to start engine '{command}'")]
    EngineSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 批量运行
    // ─────────────────────────────────────────────────────────────
    #[error("{failed} of {total} job(s) did not succeed")]
    BatchFailed { failed: usize, total: usize },
}

impl DftbkitError {
    /// 错误所属大类
    pub fn category(&self) -> ErrorCategory {
        match self {
            DftbkitError::Validation(_) => ErrorCategory::Validation,
            DftbkitError::UnknownParamSet { .. } | DftbkitError::MissingSlakoFile { .. } => {
                ErrorCategory::Configuration
            }
            DftbkitError::JobNotFound { .. } | DftbkitError::FileNotFound { .. } => {
                ErrorCategory::NotFound
            }
            DftbkitError::NotPrepared { .. } | DftbkitError::JobBusy { .. } => {
                ErrorCategory::Precondition
            }
            _ => ErrorCategory::Io,
        }
    }

    /// 对应的 HTTP 状态码
    pub fn http_status(&self) -> u16 {
        match self {
            DftbkitError::JobBusy { .. } => 409,
            _ => match self.category() {
                ErrorCategory::Validation
                | ErrorCategory::Configuration
                | ErrorCategory::Precondition => 400,
                ErrorCategory::NotFound => 404,
                ErrorCategory::Io => 500,
            },
        }
    }

    /// 校验子类（仅 Validation）
    pub fn validation_kind(&self) -> Option<ValidationKind> {
        match self {
            DftbkitError::Validation(v) => Some(v.kind),
            _ => None,
        }
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, DftbkitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display_carries_kind() {
        let err: DftbkitError =
            ValidationError::new(ValidationKind::BadIndices, "duplicated atom index 1").into();
        assert_eq!(
            err.to_string(),
            "Invalid geometry: bad_indices: duplicated atom index 1"
        );
        assert_eq!(err.validation_kind(), Some(ValidationKind::BadIndices));
    }

    #[test]
    fn test_status_mapping() {
        let unknown = DftbkitError::UnknownParamSet {
            name: "nonexistent".into(),
            root: "parameters".into(),
            available: "(none)".into(),
        };
        assert_eq!(unknown.category(), ErrorCategory::Configuration);
        assert_eq!(unknown.http_status(), 400);

        let missing = DftbkitError::JobNotFound {
            job_id: "abc".into(),
        };
        assert_eq!(missing.http_status(), 404);

        let busy = DftbkitError::JobBusy {
            job_id: "abc".into(),
            lock: ".run.lock".into(),
        };
        assert_eq!(busy.category(), ErrorCategory::Precondition);
        assert_eq!(busy.http_status(), 409);
    }
}
