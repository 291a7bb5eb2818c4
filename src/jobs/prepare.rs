//! # 作业准备流水线
//!
//! 参数集检查 -> 几何识别与规范化 -> 物种角动量 -> 输入文件 -> 写入工作目录。
//! 所有校验都在创建目录之前完成；写入阶段出错则删除半成品目录。
//!
//! ## 依赖关系
//! - 被 `commands/prepare.rs` 调用
//! - 使用 `parsers/`, `dftb/`, `jobs/workspace.rs`

use super::workspace::WorkspaceManager;
use crate::config::Settings;
use crate::dftb::{build_input_deck, resolve_species, ParameterSet};
use crate::error::Result;
use crate::models::{JobMeta, JobState, PrepareOutcome};
use crate::parsers::{self, NormalizedGeometry};

use chrono::Utc;

/// 调用方声明的输入类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// 自动识别 GenFormat / HSD 包装 / POSCAR
    Genformat,
    /// 只按 POSCAR 校验
    Poscar,
}

/// 准备一个新作业
pub fn prepare_job(
    settings: &Settings,
    text: &str,
    kind: InputKind,
    param_set: Option<&str>,
) -> Result<PrepareOutcome> {
    let set_name = param_set.unwrap_or(&settings.default_param_set);
    let set = ParameterSet::resolve(&settings.param_root, set_name)?;

    let norm: NormalizedGeometry = match kind {
        InputKind::Genformat => parsers::normalize_geometry(text)?,
        InputKind::Poscar => parsers::normalize_poscar(text)?,
    };
    let species = norm.geometry.species.clone();
    tracing::debug!(
        format = ?norm.format,
        atoms = norm.geometry.atoms.len(),
        species = %species.join(" "),
        "normalized geometry"
    );

    set.check_pairs(&species)?;
    let assignments = resolve_species(set.family(), &species);
    let deck = build_input_deck(&norm.geometry, &set.name, &assignments);
    tracing::debug!(pairs = deck.slako.len(), param_set = %set.name, "built input deck");

    let workspace = WorkspaceManager::new(settings);
    let job_id = workspace.create()?;
    let written = workspace
        .write_artifacts(&job_id, &deck.hsd, &norm.raw, &norm.canonical)
        .and_then(|_| {
            let dir = workspace.resolve(&job_id)?;
            workspace.write_meta(
                &dir,
                &JobMeta {
                    job_id: job_id.clone(),
                    param_set: set.name.clone(),
                    detected_input: norm.detected,
                    species_order: species.clone(),
                    created_at: Utc::now(),
                    state: JobState::Prepared,
                    last_run: None,
                },
            )
        });
    if let Err(e) = written {
        workspace.discard(&job_id);
        return Err(e);
    }

    tracing::info!(job_id = %job_id, param_set = %set.name, "job prepared");

    Ok(PrepareOutcome {
        job_id,
        prepared: true,
        elements: norm.geometry.elements(),
        species_order: species,
        param_set: set.name,
        detected_input: norm.detected,
    })
}
