//! # 几何结构数据模型
//!
//! POSCAR 与 GenFormat 两条解析分支共享的唯一几何表示。
//! 物种顺序由输入决定，后续 SlaterKosterFiles 的排列也依赖该顺序。
//!
//! ## 依赖关系
//! - 被 `parsers/` 产生
//! - 被 `dftb/` 消费
//! - 无外部模块依赖

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 晶格向量，行向量表示 a, b, c
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lattice {
    /// [[a1, a2, a3], [b1, b2, b3], [c1, c2, c3]]
    pub matrix: [[f64; 3]; 3],
}

impl Lattice {
    /// 从晶格向量矩阵创建
    pub fn from_vectors(matrix: [[f64; 3]; 3]) -> Self {
        Lattice { matrix }
    }

    /// 计算晶格体积（带符号）
    pub fn volume(&self) -> f64 {
        let a = self.matrix[0];
        let b = self.matrix[1];
        let c = self.matrix[2];

        a[0] * (b[1] * c[2] - b[2] * c[1]) - a[1] * (b[0] * c[2] - b[2] * c[0])
            + a[2] * (b[0] * c[1] - b[1] * c[0])
    }

    /// 分数坐标转笛卡尔坐标
    pub fn frac_to_cart(&self, frac: [f64; 3]) -> [f64; 3] {
        let m = self.matrix;
        [
            frac[0] * m[0][0] + frac[1] * m[1][0] + frac[2] * m[2][0],
            frac[0] * m[0][1] + frac[1] * m[1][1] + frac[2] * m[2][1],
            frac[0] * m[0][2] + frac[1] * m[1][2] + frac[2] * m[2][2],
        ]
    }
}

/// 坐标模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateMode {
    Cartesian,
    Fractional,
}

/// 单个原子记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeomAtom {
    /// 输入中的原子序号（从 1 开始）
    pub index: usize,
    /// 物种下标（从 0 开始，指向 `Geometry::species`）
    pub species: usize,
    /// 坐标，含义由 `Geometry::mode` 决定
    pub position: [f64; 3],
}

/// 规范化几何
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// 非周期输入为 None
    pub lattice: Option<Lattice>,
    /// 晶胞原点（仅周期结构写出）
    pub origin: [f64; 3],
    /// 物种符号，顺序即输入顺序
    pub species: Vec<String>,
    /// 按输入序号排列的原子
    pub atoms: Vec<GeomAtom>,
    pub mode: CoordinateMode,
}

impl Geometry {
    pub fn is_periodic(&self) -> bool {
        self.lattice.is_some()
    }

    /// GenFormat 头部的模式字符
    pub fn gen_mode_char(&self) -> char {
        match (self.lattice.is_some(), self.mode) {
            (false, _) => 'C',
            (true, CoordinateMode::Cartesian) => 'S',
            (true, CoordinateMode::Fractional) => 'F',
        }
    }

    /// 去重后按字母排序的元素集合
    pub fn elements(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self
            .atoms
            .iter()
            .map(|a| self.species[a.species].as_str())
            .collect();
        set.into_iter().map(String::from).collect()
    }

    /// 每个物种的原子数，与 `species` 对齐
    pub fn species_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.species.len()];
        for atom in &self.atoms {
            counts[atom.species] += 1;
        }
        counts
    }

    /// 检查计数、物种下标与原子序号的不变量
    pub fn is_consistent(&self) -> bool {
        let total: usize = self.species_counts().iter().sum();
        total == self.atoms.len()
            && self.atoms.iter().all(|a| a.species < self.species.len())
            && self
                .atoms
                .iter()
                .enumerate()
                .all(|(i, a)| a.index == i + 1)
    }

    /// 转为笛卡尔团簇表示（丢弃晶格）
    pub fn into_cluster(mut self) -> Geometry {
        if let (Some(lattice), CoordinateMode::Fractional) = (self.lattice, self.mode) {
            for atom in &mut self.atoms {
                atom.position = lattice.frac_to_cart(atom.position);
            }
        }
        self.lattice = None;
        self.origin = [0.0; 3];
        self.mode = CoordinateMode::Cartesian;
        self
    }
}
