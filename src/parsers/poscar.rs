//! # VASP5 POSCAR 格式解析器
//!
//! 只接受第 6 行为元素符号的 VASP5 格式，VASP4 纯数字格式会被拒绝。
//!
//! ## POSCAR 格式说明
//! ```text
//! Comment line (structure name)
//! 1.0                    # scaling factor
//! a1 a2 a3               # lattice vector a
//! b1 b2 b3               # lattice vector b
//! c1 c2 c3               # lattice vector c
//! Element1 Element2 ...  # element symbols (VASP 5+)
//! n1 n2 ...              # number of atoms per element
//! Selective dynamics     # optional
//! Direct/Cartesian       # coordinate type
//! x1 y1 z1               # atom positions
//! ...
//! ```
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/geometry.rs`

use crate::error::{ValidationError, ValidationKind};
use crate::models::{CoordinateMode, GeomAtom, Geometry, Lattice};
use crate::parsers::genformat::parse_real;

type ParseResult<T> = std::result::Result<T, ValidationError>;

fn invalid(kind: ValidationKind, detail: impl Into<String>) -> ValidationError {
    ValidationError::new(kind, detail)
}

/// 从字符串内容解析 POSCAR
///
/// 物种顺序逐字取自符号行，不重新排序；原子按计数行顺序分配物种。
pub fn parse_poscar_content(content: &str) -> ParseResult<Geometry> {
    // 注释行可以为空，其余空行忽略
    let mut raw = content.lines();
    let comment = raw.next().unwrap_or_default();
    let lines: Vec<&str> = std::iter::once(comment)
        .chain(raw.map(str::trim).filter(|l| !l.is_empty()))
        .collect();

    if lines.len() < 8 {
        return Err(invalid(
            ValidationKind::TooShort,
            format!(
                "POSCAR too short: expected at least 8 non-empty lines, found {}",
                lines.len()
            ),
        ));
    }

    // Line 1: Scaling factor
    let scale: f64 = lines[1]
        .split_whitespace()
        .next()
        .and_then(parse_real)
        .ok_or_else(|| invalid(ValidationKind::BadScale, "Line 2 (scaling factor) must be a number"))?;

    // Lines 2-4: Lattice vectors
    let mut matrix = [[0.0; 3]; 3];
    for i in 0..3 {
        let line_no = 3 + i;
        let parts: Vec<&str> = lines[2 + i].split_whitespace().collect();
        if parts.len() != 3 {
            return Err(invalid(
                ValidationKind::BadLattice,
                format!(
                    "Line {} must have exactly 3 lattice vector components, found {}",
                    line_no,
                    parts.len()
                ),
            ));
        }
        for (j, part) in parts.iter().enumerate() {
            matrix[i][j] = parse_real(part).ok_or_else(|| {
                invalid(
                    ValidationKind::BadLattice,
                    format!("Line {} contains non-numeric lattice component '{}'", line_no, part),
                )
            })?;
        }
    }
    let factor = scale_factor(scale, &matrix);
    let matrix = matrix.map(|row| row.map(|x| x * factor));

    // Line 5: Element symbols
    let symbols: Vec<String> = lines[5].split_whitespace().map(String::from).collect();
    if symbols.is_empty() || symbols.iter().all(|s| s.parse::<i64>().is_ok()) {
        return Err(invalid(
            ValidationKind::BadSymbols,
            "Line 6 must list element symbols (e.g. 'C H'); VASP4 files without symbols are not supported",
        ));
    }

    // Line 6: Counts
    let count_tokens: Vec<&str> = lines[6].split_whitespace().collect();
    if count_tokens.len() != symbols.len() {
        return Err(invalid(
            ValidationKind::SymbolCountMismatch,
            format!(
                "found {} counts for {} symbols ({})",
                count_tokens.len(),
                symbols.len(),
                symbols.join(" ")
            ),
        ));
    }
    let mut counts = Vec::with_capacity(count_tokens.len());
    for token in &count_tokens {
        match token.parse::<usize>() {
            Ok(n) if n > 0 => counts.push(n),
            _ => {
                return Err(invalid(
                    ValidationKind::BadCounts,
                    format!("Line 7 counts must be positive integers, got '{}'", token),
                ))
            }
        }
    }
    let natoms = counts
        .iter()
        .try_fold(0usize, |acc, &n| acc.checked_add(n))
        .ok_or_else(|| invalid(ValidationKind::BadCounts, "Line 7 counts are too large"))?;

    // 重复符号并入首次出现的物种
    let mut species: Vec<String> = Vec::with_capacity(symbols.len());
    let species_of: Vec<usize> = symbols
        .iter()
        .map(|sym| match species.iter().position(|s| s == sym) {
            Some(i) => i,
            None => {
                species.push(sym.clone());
                species.len() - 1
            }
        })
        .collect();

    // Check for "Selective dynamics" line
    let mut idx = 7;
    let selective = lines[idx].to_lowercase().starts_with("selective");
    if selective {
        idx += 1;
    }

    // Coordinate type line
    let mode = lines
        .get(idx)
        .and_then(|l| coordinate_mode(l))
        .ok_or_else(|| {
            invalid(
                ValidationKind::BadMode,
                "Coordinate mode must be 'Direct' or 'Cartesian' on the line after counts (or after 'Selective dynamics')",
            )
        })?;
    idx += 1;

    if idx.checked_add(natoms).map_or(true, |end| end > lines.len()) {
        return Err(invalid(
            ValidationKind::AtomCountMismatch,
            format!(
                "Not enough coordinate lines: expected {}, found {}",
                natoms,
                lines.len().saturating_sub(idx)
            ),
        ));
    }

    // Parse atom positions
    let mut atoms = Vec::with_capacity(natoms);
    let mut line_idx = idx;
    for (&sid, &count) in species_of.iter().zip(&counts) {
        for _ in 0..count {
            let k = atoms.len() + 1;
            let position = parse_coordinate_line(lines[line_idx], selective).ok_or_else(|| {
                invalid(
                    ValidationKind::BadCoordinateLine,
                    format!("Coordinate line {} must start with 3 real numbers", k),
                )
            })?;
            let position = match mode {
                CoordinateMode::Cartesian => position.map(|x| x * factor),
                CoordinateMode::Fractional => position,
            };
            atoms.push(GeomAtom {
                index: k,
                species: sid,
                position,
            });
            line_idx += 1;
        }
    }

    Ok(Geometry {
        lattice: Some(Lattice::from_vectors(matrix)),
        origin: [0.0; 3],
        species,
        atoms,
        mode,
    })
}

/// 识别坐标模式（前缀，大小写不敏感）
fn coordinate_mode(line: &str) -> Option<CoordinateMode> {
    let line = line.trim().to_ascii_lowercase();
    if line.starts_with("direct") {
        Some(CoordinateMode::Fractional)
    } else if line.starts_with("cart") || line.starts_with("kart") {
        Some(CoordinateMode::Cartesian)
    } else {
        None
    }
}

/// 解析一行坐标；选择性动力学允许附带 T/F 标记
fn parse_coordinate_line(line: &str, selective: bool) -> Option<[f64; 3]> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 3 {
        return None;
    }
    if selective && parts.len() > 3 && parts.len() != 6 {
        return None;
    }
    let x = parse_real(parts[0])?;
    let y = parse_real(parts[1])?;
    let z = parse_real(parts[2])?;
    Some([x, y, z])
}

/// 缩放系数；负值表示目标晶胞体积
fn scale_factor(scale: f64, unscaled: &[[f64; 3]; 3]) -> f64 {
    if scale >= 0.0 {
        return scale;
    }
    let volume = Lattice::from_vectors(*unscaled).volume().abs();
    if volume < 1e-12 {
        1.0
    } else {
        (scale.abs() / volume).cbrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WATER: &str = r#"water
1.0
10.0 0.0 0.0
0.0 10.0 0.0
0.0 0.0 10.0
O H
1 2
Direct
0.0 0.0 0.0
0.0957 0.0 0.0
-0.024 0.0927 0.0
"#;

    #[test]
    fn test_parse_water_keeps_symbol_order() {
        let geom = parse_poscar_content(WATER).unwrap();
        assert_eq!(geom.species, vec!["O", "H"]);
        assert_eq!(geom.atoms.len(), 3);
        assert_eq!(geom.species_counts(), vec![1, 2]);
        assert_eq!(geom.mode, CoordinateMode::Fractional);
        assert!(geom.is_consistent());
    }

    #[test]
    fn test_species_not_resorted() {
        let content = WATER.replace("O H\n1 2", "H O\n2 1");
        let geom = parse_poscar_content(&content).unwrap();
        assert_eq!(geom.species, vec!["H", "O"]);
        assert_eq!(geom.species_counts(), vec![2, 1]);
        assert_eq!(geom.atoms[2].species, 1);
    }

    #[test]
    fn test_scale_applied_to_lattice() {
        let content = WATER.replacen("1.0\n", "2.0\n", 1);
        let geom = parse_poscar_content(&content).unwrap();
        let lattice = geom.lattice.unwrap();
        assert!((lattice.matrix[0][0] - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_selective_dynamics_accepted() {
        let content = r#"Fe with selective
1.0
2.87 0.0 0.0
0.0 2.87 0.0
0.0 0.0 2.87
Fe
2
Selective dynamics
Direct
0.0 0.0 0.0 T T T
0.5 0.5 0.5 F F F
"#;
        let geom = parse_poscar_content(content).unwrap();
        assert_eq!(geom.atoms.len(), 2);
    }

    #[test]
    fn test_negative_scale_is_volume() {
        let content = WATER.replacen("1.0\n", "-8000.0\n", 1);
        let geom = parse_poscar_content(&content).unwrap();
        let lattice = geom.lattice.unwrap();
        assert!((lattice.volume() - 8000.0).abs() < 1e-6);
    }

    #[test]
    fn test_cartesian_mode() {
        let content = WATER.replace("Direct", "cartesian");
        let geom = parse_poscar_content(&content).unwrap();
        assert_eq!(geom.mode, CoordinateMode::Cartesian);
        assert!((geom.atoms[1].position[0] - 0.0957).abs() < 1e-12);
    }

    fn kind_of(content: &str) -> ValidationKind {
        parse_poscar_content(content).unwrap_err().kind
    }

    #[test]
    fn test_too_short() {
        assert_eq!(kind_of("x\n1.0\n1 0 0\n"), ValidationKind::TooShort);
    }

    #[test]
    fn test_bad_lattice() {
        let content = WATER.replace("0.0 10.0 0.0", "0.0 ten 0.0");
        assert_eq!(kind_of(&content), ValidationKind::BadLattice);
        let content = WATER.replace("0.0 10.0 0.0", "0.0 10.0");
        assert_eq!(kind_of(&content), ValidationKind::BadLattice);
    }

    #[test]
    fn test_symbol_count_mismatch() {
        let content = WATER.replace("1 2\n", "1 2 3\n");
        assert_eq!(kind_of(&content), ValidationKind::SymbolCountMismatch);
    }

    #[test]
    fn test_counts_must_be_positive() {
        let content = WATER.replace("1 2\n", "1 0\n");
        assert_eq!(kind_of(&content), ValidationKind::BadCounts);
    }

    #[test]
    fn test_vasp4_rejected() {
        let content = WATER.replace("O H\n", "1 2\n");
        assert_eq!(kind_of(&content), ValidationKind::BadSymbols);
    }

    #[test]
    fn test_bad_mode() {
        let content = WATER.replace("Direct", "Fractional");
        assert_eq!(kind_of(&content), ValidationKind::BadMode);
    }

    #[test]
    fn test_missing_coordinate_lines() {
        let content = WATER.replace("1 2\n", "1 3\n");
        assert_eq!(kind_of(&content), ValidationKind::AtomCountMismatch);
    }

    #[test]
    fn test_bad_coordinate_line() {
        let content = WATER.replace("0.0957 0.0 0.0", "0.0957 abc 0.0");
        assert_eq!(kind_of(&content), ValidationKind::BadCoordinateLine);
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let content = WATER.replace("0.0957 0.0 0.0", "nan 0.0 0.0");
        assert_eq!(kind_of(&content), ValidationKind::BadCoordinateLine);
        let content = WATER.replace("0.0957 0.0 0.0", "0.0957 inf 0.0");
        assert_eq!(kind_of(&content), ValidationKind::BadCoordinateLine);
        let content = WATER.replace("0.0 10.0 0.0", "0.0 infinity 0.0");
        assert_eq!(kind_of(&content), ValidationKind::BadLattice);
        let content = WATER.replacen("1.0\n", "NaN\n", 1);
        assert_eq!(kind_of(&content), ValidationKind::BadScale);
    }

    #[test]
    fn test_overflowing_counts() {
        let content = WATER.replace("1 2\n", "18446744073709551615 1\n");
        assert_eq!(kind_of(&content), ValidationKind::BadCounts);
        let content = WATER.replace("1 2\n", "18446744073709551615 0\n");
        assert_eq!(kind_of(&content), ValidationKind::BadCounts);
        let content = WATER.replace("1 2\n", "18446744073709551614 1\n");
        assert_eq!(kind_of(&content), ValidationKind::AtomCountMismatch);
    }

    #[test]
    fn test_repeated_symbols_merge_into_first() {
        let content = r#"water pair
1.0
10.0 0.0 0.0
0.0 10.0 0.0
0.0 0.0 10.0
O H O
1 2 1
Cartesian
0.0 0.0 0.0
0.96 0.0 0.0
0.0 0.96 0.0
5.0 5.0 5.0
"#;
        let geom = parse_poscar_content(content).unwrap();
        assert_eq!(geom.species, vec!["O", "H"]);
        assert_eq!(geom.species_counts(), vec![2, 2]);
        assert_eq!(geom.atoms[3].species, 0);
        assert_eq!(geom.atoms[3].index, 4);
        assert!(geom.is_consistent());
    }

    #[test]
    fn test_mode_requires_keyword_prefix() {
        assert_eq!(kind_of(&WATER.replace("Direct", "dog")), ValidationKind::BadMode);
        assert_eq!(kind_of(&WATER.replace("Direct", "cheese")), ValidationKind::BadMode);
        let geom = parse_poscar_content(&WATER.replace("Direct", "DIRECT coordinates")).unwrap();
        assert_eq!(geom.mode, CoordinateMode::Fractional);
        let geom = parse_poscar_content(&WATER.replace("Direct", "Cart")).unwrap();
        assert_eq!(geom.mode, CoordinateMode::Cartesian);
    }
}
