//! # DFTB+ detailed.out 解析器
//!
//! 从 detailed.out 中提取总能量。
//!
//! ```text
//! Total energy:                      -4.0779379326 H         -110.9666 eV
//! ```
//!
//! ## 依赖关系
//! - 被 `jobs/results.rs` 使用

use crate::error::{DftbkitError, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// 总能量（Hartree 与可选的 eV）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TotalEnergy {
    pub hartree: f64,
    pub ev: Option<f64>,
}

/// 从报告文件提取总能量；没有标记行时返回 None
pub fn parse_detailed_out(path: &Path) -> Result<Option<TotalEnergy>> {
    let file = File::open(path).map_err(|e| DftbkitError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    let reader = BufReader::new(file);

    for line in reader.lines().map_while(|l| l.ok()) {
        if let Some(energy) = parse_total_energy_line(&line) {
            return Ok(Some(energy));
        }
    }
    Ok(None)
}

/// 解析单行 `Total energy: <value> H <value> eV`
pub fn parse_total_energy_line(line: &str) -> Option<TotalEnergy> {
    let trimmed = line.trim_start();
    let label = "total energy:";
    if !trimmed.get(..label.len())?.eq_ignore_ascii_case(label) {
        return None;
    }
    let tokens: Vec<&str> = trimmed[label.len()..].split_whitespace().collect();

    let hartree = value_before_unit(&tokens, "H")
        .or_else(|| tokens.first().and_then(|t| t.parse().ok()))?;
    let ev = value_before_unit(&tokens, "eV");
    Some(TotalEnergy { hartree, ev })
}

fn value_before_unit(tokens: &[&str], unit: &str) -> Option<f64> {
    let pos = tokens.iter().position(|t| *t == unit)?;
    tokens.get(pos.checked_sub(1)?)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const DETAILED: &str = "\
Fermi level:                        -0.2526730926 H           -6.8756 eV
Total Electronic energy:            -4.0779379326 H         -110.9666 eV
Repulsive energy:                    0.0000000000 H            0.0000 eV
Total energy:                       -4.0779379326 H         -110.9666 eV
Extrapolated to 0:                  -4.0779379326 H         -110.9666 eV
";

    #[test]
    fn test_total_energy_line() {
        let e = parse_total_energy_line("Total energy:  -4.0779379326 H  -110.9666 eV").unwrap();
        assert!((e.hartree + 4.0779379326).abs() < 1e-12);
        assert!((e.ev.unwrap() + 110.9666).abs() < 1e-9);
    }

    #[test]
    fn test_electronic_energy_not_matched() {
        assert!(parse_total_energy_line("Total Electronic energy: -4.0 H -110.9 eV").is_none());
    }

    #[test]
    fn test_bare_value_without_units() {
        let e = parse_total_energy_line("TOTAL ENERGY: -1.5").unwrap();
        assert_eq!(e.hartree, -1.5);
        assert_eq!(e.ev, None);
    }

    #[test]
    fn test_parse_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("detailed.out");
        fs::write(&path, DETAILED).unwrap();
        let e = parse_detailed_out(&path).unwrap().unwrap();
        assert!((e.hartree + 4.0779379326).abs() < 1e-12);

        fs::write(&path, "nothing to see\n").unwrap();
        assert_eq!(parse_detailed_out(&path).unwrap(), None);
    }
}
