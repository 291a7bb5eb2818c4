//! # 物种角动量分配
//!
//! 按参数集家族（名称前缀）为每个物种决定 MaxAngularMomentum。
//! 结果只取决于 (家族, 元素符号)；H 总是 `s`，表中没有的元素取 `p`。
//!
//! ## 依赖关系
//! - 被 `dftb/params.rs`、`dftb/deck.rs` 和 `jobs/prepare.rs` 使用
//! - 无外部模块依赖

use std::fmt;

/// 最高角动量壳层
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AngularMomentum {
    S,
    P,
    D,
}

impl fmt::Display for AngularMomentum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AngularMomentum::S => write!(f, "s"),
            AngularMomentum::P => write!(f, "p"),
            AngularMomentum::D => write!(f, "d"),
        }
    }
}

/// 参数集家族
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamFamily {
    /// 3ob-*
    ThirdOrder,
    /// mio-*
    Mio,
    /// matsci-*
    Matsci,
    /// 其他参数集：H=s，其余=p
    Generic,
}

use AngularMomentum::{D, P, S};

const THIRD_ORDER_TABLE: &[(&str, AngularMomentum)] = &[
    ("H", S),
    ("C", P),
    ("N", P),
    ("O", P),
    ("F", P),
    ("P", D),
    ("S", D),
    ("Cl", D),
    ("Si", D),
];

const MIO_TABLE: &[(&str, AngularMomentum)] = &[
    ("H", S),
    ("C", P),
    ("N", P),
    ("O", P),
    ("F", P),
    ("P", P),
    ("S", P),
    ("Cl", P),
    ("Si", P),
    ("B", P),
    ("Al", P),
    ("Na", P),
    ("Mg", P),
];

const MATSCI_TABLE: &[(&str, AngularMomentum)] = &[
    ("H", S),
    ("C", P),
    ("N", P),
    ("O", P),
    ("F", P),
    ("Fe", D),
    ("Co", D),
    ("Ni", D),
    ("Cu", D),
    ("Zn", D),
    ("Ti", D),
    ("V", D),
    ("Cr", D),
    ("Mn", D),
    ("Mo", D),
    ("W", D),
    ("Pd", D),
    ("Pt", D),
];

impl ParamFamily {
    /// 按参数集名称前缀匹配家族
    pub fn from_set_name(name: &str) -> Self {
        if name.starts_with("3ob") {
            ParamFamily::ThirdOrder
        } else if name.starts_with("mio") {
            ParamFamily::Mio
        } else if name.starts_with("matsci") {
            ParamFamily::Matsci
        } else {
            ParamFamily::Generic
        }
    }

    fn table(&self) -> &'static [(&'static str, AngularMomentum)] {
        match self {
            ParamFamily::ThirdOrder => THIRD_ORDER_TABLE,
            ParamFamily::Mio => MIO_TABLE,
            ParamFamily::Matsci => MATSCI_TABLE,
            ParamFamily::Generic => &[],
        }
    }

    /// 单个元素的最高角动量
    pub fn max_angular_momentum(&self, symbol: &str) -> AngularMomentum {
        if symbol == "H" {
            return S;
        }
        self.table()
            .iter()
            .find(|(el, _)| *el == symbol)
            .map(|(_, l)| *l)
            .unwrap_or(P)
    }
}

/// 一个物种的角动量分配
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesAssignment {
    pub symbol: String,
    pub max_l: AngularMomentum,
}

/// 按物种顺序生成分配表
pub fn resolve_species(family: ParamFamily, species: &[String]) -> Vec<SpeciesAssignment> {
    species
        .iter()
        .map(|s| SpeciesAssignment {
            symbol: s.clone(),
            max_l: family.max_angular_momentum(s),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_from_prefix() {
        assert_eq!(ParamFamily::from_set_name("3ob-3-1"), ParamFamily::ThirdOrder);
        assert_eq!(ParamFamily::from_set_name("mio-1-1"), ParamFamily::Mio);
        assert_eq!(ParamFamily::from_set_name("matsci-0-3"), ParamFamily::Matsci);
        assert_eq!(ParamFamily::from_set_name("pbc-0-3"), ParamFamily::Generic);
    }

    #[test]
    fn test_hydrogen_always_s() {
        for family in [
            ParamFamily::ThirdOrder,
            ParamFamily::Mio,
            ParamFamily::Matsci,
            ParamFamily::Generic,
        ] {
            assert_eq!(family.max_angular_momentum("H"), AngularMomentum::S);
        }
    }

    #[test]
    fn test_third_order_d_shells() {
        let f = ParamFamily::ThirdOrder;
        assert_eq!(f.max_angular_momentum("S"), AngularMomentum::D);
        assert_eq!(f.max_angular_momentum("Cl"), AngularMomentum::D);
        assert_eq!(f.max_angular_momentum("O"), AngularMomentum::P);
    }

    #[test]
    fn test_mio_never_d() {
        for el in ["C", "S", "P", "Cl", "Si", "Fe", "Xx"] {
            assert_ne!(ParamFamily::Mio.max_angular_momentum(el), AngularMomentum::D);
        }
    }

    #[test]
    fn test_matsci_transition_metals() {
        assert_eq!(ParamFamily::Matsci.max_angular_momentum("Fe"), AngularMomentum::D);
        assert_eq!(ParamFamily::Matsci.max_angular_momentum("Si"), AngularMomentum::P);
    }

    #[test]
    fn test_resolution_is_deterministic_and_ordered() {
        let species = vec!["S".to_string(), "H".to_string(), "C".to_string()];
        let a = resolve_species(ParamFamily::ThirdOrder, &species);
        let b = resolve_species(ParamFamily::ThirdOrder, &species);
        assert_eq!(a, b);
        let symbols: Vec<&str> = a.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["S", "H", "C"]);
        assert_eq!(a[0].max_l.to_string(), "d");
    }
}
