//! # 作业数据模型
//!
//! 作业状态、元数据记录与结果查询的数据结构。
//!
//! ## 依赖关系
//! - 被 `jobs/` 和 `commands/` 使用

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 由文件证据推断出的作业状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobState {
    #[default]
    NotRun,
    Prepared,
    Completed,
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::NotRun => write!(f, "not-run"),
            JobState::Prepared => write!(f, "prepared"),
            JobState::Completed => write!(f, "completed"),
        }
    }
}

/// 输入被识别成的格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectedInput {
    Genformat,
    Poscar,
}

impl fmt::Display for DetectedInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectedInput::Genformat => write!(f, "genformat"),
            DetectedInput::Poscar => write!(f, "poscar"),
        }
    }
}

/// 一次 run 的记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// 超时或被信号终止时为 None
    pub rc: Option<i32>,
    pub ok: bool,
    pub timed_out: bool,
}

/// 作业目录中的 job.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMeta {
    pub job_id: String,
    pub param_set: String,
    pub detected_input: DetectedInput,
    pub species_order: Vec<String>,
    pub created_at: DateTime<Utc>,
    /// 最近一次写入时的状态，与文件证据一同更新
    #[serde(default)]
    pub state: JobState,
    #[serde(default)]
    pub last_run: Option<RunRecord>,
}

/// prepare 的返回
#[derive(Debug, Clone, Serialize)]
pub struct PrepareOutcome {
    pub job_id: String,
    pub prepared: bool,
    pub elements: Vec<String>,
    pub species_order: Vec<String>,
    pub param_set: String,
    pub detected_input: DetectedInput,
}

/// 结果查询（每次重新计算，不缓存）
#[derive(Debug, Clone, Serialize)]
pub struct SimulationResult {
    pub job_id: String,
    pub state: JobState,
    pub files: Vec<String>,
    pub total_energy_hartree: Option<f64>,
    pub total_energy_ev: Option<f64>,
    pub rc: Option<i32>,
    pub ok: bool,
}
