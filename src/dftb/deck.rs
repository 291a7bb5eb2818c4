//! # dftb_in.hsd 输入文件生成
//!
//! 纯组合：几何块 + SlaterKosterFiles 块 + MaxAngularMomentum 块。
//! 不访问文件系统或网络。
//!
//! ## 依赖关系
//! - 被 `jobs/prepare.rs` 使用
//! - 使用 `parsers/genformat.rs` 序列化几何
//! - 使用 `dftb/species.rs` 的角动量分配

use super::species::SpeciesAssignment;
use super::PARAM_LINK;
use crate::models::Geometry;
use crate::parsers::genformat::to_genformat_string;

/// 一个物种对的 Slater-Koster 文件引用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlakoEntry {
    pub first: String,
    pub second: String,
    /// 相对作业目录的路径，经由参数链接
    pub path: String,
}

/// 生成的输入文件
#[derive(Debug, Clone)]
pub struct InputDeck {
    pub hsd: String,
    pub slako: Vec<SlakoEntry>,
}

/// 物种顺序下全部有序物种对
pub fn slako_entries(species: &[String], param_set: &str) -> Vec<SlakoEntry> {
    let mut entries = Vec::with_capacity(species.len() * species.len());
    for a in species {
        for b in species {
            entries.push(SlakoEntry {
                first: a.clone(),
                second: b.clone(),
                path: format!("{}/{}/{}-{}.skf", PARAM_LINK, param_set, a, b),
            });
        }
    }
    entries
}

/// 组合完整的 dftb_in.hsd
pub fn build_input_deck(
    geometry: &Geometry,
    param_set: &str,
    assignments: &[SpeciesAssignment],
) -> InputDeck {
    let genblock = to_genformat_string(geometry);
    let slako = slako_entries(&geometry.species, param_set);

    let slako_lines = slako
        .iter()
        .map(|e| format!("    {}-{} = \"{}\"", e.first, e.second, e.path))
        .collect::<Vec<_>>()
        .join("\n");

    let maxl_lines = assignments
        .iter()
        .map(|a| format!("    {} = \"{}\"", a.symbol, a.max_l))
        .collect::<Vec<_>>()
        .join("\n");

    // 周期结构只取 Gamma 点
    let kpoints = if geometry.is_periodic() {
        "  KPointsAndWeights = SupercellFolding {\n    1 0 0\n    0 1 0\n    0 0 1\n    0.0 0.0 0.0\n  }\n"
    } else {
        ""
    };

    let hsd = format!(
        r#"Geometry = GenFormat {{
{genblock}
}}

Driver = GeometryOptimization {{
  Optimizer = Rational {{}}
  MovedAtoms = 1:-1
  MaxSteps = 100
  OutputPrefix = "geom.out"
  Convergence {{GradElem = 1E-4}}
}}

Hamiltonian = DFTB {{
  Scc = Yes
  SlaterKosterFiles {{
{slako_lines}
  }}
  MaxAngularMomentum {{
{maxl_lines}
  }}
{kpoints}}}

Options {{}}

Analysis {{
  CalculateForces = Yes
}}

ParserOptions {{
  ParserVersion = 12
}}
"#
    );

    InputDeck { hsd, slako }
}
