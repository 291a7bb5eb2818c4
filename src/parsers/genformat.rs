//! # DFTB+ GenFormat 解析与规范化
//!
//! ## GenFormat 格式说明
//! ```text
//! 3 C                    # atom count, mode (C / S / F)
//!   C O H                # species symbols, index 1..N
//!   1 1  x y z           # atom index, species id, coordinates
//!   ...
//!   ox oy oz             # origin (S / F only)
//!   a1 a2 a3             # lattice vectors (S / F only)
//!   b1 b2 b3
//!   c1 c2 c3
//! ```
//!
//! 规范化输出按原子序号 1..N 排列，坐标统一为科学计数法，
//! 物种行逐字保留。对规范输出再次解析并规范化结果字节级一致。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/geometry.rs`

use crate::error::{ValidationError, ValidationKind};
use crate::models::{CoordinateMode, GeomAtom, Geometry, Lattice};

type ParseResult<T> = std::result::Result<T, ValidationError>;

fn invalid(kind: ValidationKind, detail: impl Into<String>) -> ValidationError {
    ValidationError::new(kind, detail)
}

/// 判断一行是否形如 `<N> <C|S|F>`
pub fn is_header_line(line: &str) -> bool {
    let mut parts = line.split_whitespace();
    let count_ok = parts
        .next()
        .map(|t| t.parse::<usize>().is_ok())
        .unwrap_or(false);
    count_ok && parts.next().and_then(mode_from_token).is_some()
}

/// 模式字符 -> (是否周期, 坐标模式)
fn mode_from_token(token: &str) -> Option<(bool, CoordinateMode)> {
    match token.to_ascii_uppercase().as_str() {
        "C" => Some((false, CoordinateMode::Cartesian)),
        "S" => Some((true, CoordinateMode::Cartesian)),
        "F" => Some((true, CoordinateMode::Fractional)),
        _ => None,
    }
}

/// 解析 GenFormat 内层块
///
/// 头部之前的杂项行会被跳过；`#` 开头的注释行忽略。
pub fn parse_genformat_content(content: &str) -> ParseResult<Geometry> {
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .collect();

    let start = lines.iter().position(|l| is_header_line(l)).ok_or_else(|| {
        invalid(
            ValidationKind::BadHeader,
            "Not a valid GenFormat header (expected '<N> C', '<N> S' or '<N> F')",
        )
    })?;
    let lines = &lines[start..];

    let mut head = lines[0].split_whitespace();
    let n: usize = head
        .next()
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| invalid(ValidationKind::BadHeader, "atom count must be an integer"))?;
    let (periodic, mode) = head
        .next()
        .and_then(mode_from_token)
        .ok_or_else(|| invalid(ValidationKind::BadHeader, "second token must be C, S or F"))?;
    if n == 0 {
        return Err(invalid(ValidationKind::BadHeader, "atom count must be positive"));
    }

    let species: Vec<String> = lines
        .get(1)
        .map(|l| l.split_whitespace().map(String::from).collect())
        .unwrap_or_default();
    if species.is_empty() || species.iter().all(|t| t.parse::<i64>().is_ok()) {
        return Err(invalid(
            ValidationKind::BadSpeciesLine,
            "species line must list symbols (e.g. 'C H')",
        ));
    }

    if let Some(dup) = first_duplicate(&species) {
        return Err(invalid(
            ValidationKind::BadSpeciesLine,
            format!("species '{}' is listed more than once", dup),
        ));
    }

    // 只读取头部声明的 N 行原子，周期块再读其后 4 行，之后的内容忽略
    let rest = &lines[2.min(lines.len())..];
    if rest.len() < n {
        return Err(invalid(
            ValidationKind::BadIndices,
            format!("header says N={} but found {} coordinate lines", n, rest.len()),
        ));
    }
    let (rows, tail) = rest.split_at(n);
    let cell = if periodic {
        if tail.len() < 4 {
            return Err(invalid(
                ValidationKind::BadLattice,
                "periodic GenFormat requires an origin and three lattice vectors after the atoms",
            ));
        }
        &tail[..4]
    } else {
        &tail[..0]
    };
    if !periodic && !tail.is_empty() {
        tracing::debug!(ignored = tail.len(), "ignoring lines after the atom rows");
    }

    let mut atoms = Vec::with_capacity(rows.len());
    for (k, row) in rows.iter().enumerate() {
        atoms.push(parse_atom_row(row, k + 1, species.len())?);
    }
    check_indices(&atoms, n)?;
    atoms.sort_by_key(|a| a.index);

    let (lattice, origin) = if periodic {
        let origin = parse_vector(cell[0], "origin")?;
        let matrix = [
            parse_vector(cell[1], "lattice vector a")?,
            parse_vector(cell[2], "lattice vector b")?,
            parse_vector(cell[3], "lattice vector c")?,
        ];
        (Some(Lattice::from_vectors(matrix)), origin)
    } else {
        (None, [0.0; 3])
    };

    Ok(Geometry {
        lattice,
        origin,
        species,
        atoms,
        mode,
    })
}

/// 解析 `i sid x y z` 行
fn parse_atom_row(row: &str, line_no: usize, n_species: usize) -> ParseResult<GeomAtom> {
    let parts: Vec<&str> = row.split_whitespace().collect();
    if parts.len() < 5 {
        return Err(invalid(
            ValidationKind::BadCoordinate,
            format!("coordinate line #{} must be 'i sid x y z', got '{}'", line_no, row),
        ));
    }
    let index: usize = parts[0].parse().map_err(|_| {
        invalid(
            ValidationKind::BadIndices,
            format!("atom index '{}' on coordinate line #{} is not an integer", parts[0], line_no),
        )
    })?;
    let sid: usize = parts[1].parse().map_err(|_| {
        invalid(
            ValidationKind::BadSpeciesId,
            format!("species id '{}' on coordinate line #{} is not an integer", parts[1], line_no),
        )
    })?;
    if !(1..=n_species).contains(&sid) {
        return Err(invalid(
            ValidationKind::BadSpeciesId,
            format!("species id {} out of 1..{}", sid, n_species),
        ));
    }
    let mut position = [0.0; 3];
    for (j, token) in parts[2..5].iter().enumerate() {
        position[j] = parse_real(token).ok_or_else(|| {
            invalid(
                ValidationKind::BadCoordinate,
                format!("non-numeric value '{}' on coordinate line #{}", token, line_no),
            )
        })?;
    }
    Ok(GeomAtom {
        index,
        species: sid - 1,
        position,
    })
}

/// 原子序号必须恰好是 1..N，不重复
fn check_indices(atoms: &[GeomAtom], n: usize) -> ParseResult<()> {
    if atoms.len() != n {
        return Err(invalid(
            ValidationKind::BadIndices,
            format!("header says N={} but found {} coordinate lines", n, atoms.len()),
        ));
    }
    let mut seen = vec![false; n];
    for atom in atoms {
        if atom.index < 1 || atom.index > n {
            return Err(invalid(
                ValidationKind::BadIndices,
                format!("atom index {} outside 1..{}", atom.index, n),
            ));
        }
        if seen[atom.index - 1] {
            return Err(invalid(
                ValidationKind::BadIndices,
                format!("duplicated atom index {}", atom.index),
            ));
        }
        seen[atom.index - 1] = true;
    }
    Ok(())
}

/// 有限实数；`nan`、`inf` 不算坐标
pub(crate) fn parse_real(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn first_duplicate(species: &[String]) -> Option<&str> {
    species
        .iter()
        .enumerate()
        .find(|(i, s)| species[..*i].contains(*s))
        .map(|(_, s)| s.as_str())
}

fn parse_vector(line: &str, what: &str) -> ParseResult<[f64; 3]> {
    let values: Vec<f64> = line
        .split_whitespace()
        .map(parse_real)
        .collect::<Option<_>>()
        .ok_or_else(|| invalid(ValidationKind::BadLattice, format!("{} is not numeric: '{}'", what, line)))?;
    match values.as_slice() {
        [x, y, z] => Ok([*x, *y, *z]),
        _ => Err(invalid(
            ValidationKind::BadLattice,
            format!("{} must have 3 components: '{}'", what, line),
        )),
    }
}

/// 固定宽度科学计数法，如 ` 1.20000000000E+00`
pub fn sci(x: f64) -> String {
    let raw = format!("{:.11E}", x);
    let (mantissa, exp) = raw.split_once('E').unwrap_or((raw.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let sign = if exp < 0 { '-' } else { '+' };
    let lead = if mantissa.starts_with('-') { "" } else { " " };
    format!("{}{}E{}{:02}", lead, mantissa, sign, exp.abs())
}

fn vector_line(v: &[f64; 3]) -> String {
    format!("  {} {} {}", sci(v[0]), sci(v[1]), sci(v[2]))
}

/// 将几何写为规范 GenFormat 内层块
pub fn to_genformat_string(geom: &Geometry) -> String {
    let mut out = Vec::with_capacity(geom.atoms.len() + 7);
    out.push(format!("{} {}", geom.atoms.len(), geom.gen_mode_char()));
    out.push(format!("  {}", geom.species.join(" ")));
    out.push(String::new());

    let mut atoms: Vec<&GeomAtom> = geom.atoms.iter().collect();
    atoms.sort_by_key(|a| a.index);
    for atom in atoms {
        out.push(format!(
            "  {} {}  {} {} {}",
            atom.index,
            atom.species + 1,
            sci(atom.position[0]),
            sci(atom.position[1]),
            sci(atom.position[2])
        ));
    }

    if let Some(lattice) = &geom.lattice {
        out.push(vector_line(&geom.origin));
        for row in &lattice.matrix {
            out.push(vector_line(row));
        }
    }

    out.join("\n")
}
