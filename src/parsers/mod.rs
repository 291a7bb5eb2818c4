//! # 解析器模块
//!
//! 几何文本的格式识别、解析与规范化，以及 DFTB+ 输出的解析。
//!
//! 识别顺序：
//! 1. 含 `Geometry = GenFormat {` 包装 -> HSD 包装的 GenFormat
//! 2. 首个非空行为 `<整数> <C|S|F>` -> 裸 GenFormat 内层块
//! 3. 其余一律按 POSCAR 处理，由 POSCAR 校验报告错误
//!
//! ## 依赖关系
//! - 被 `jobs/prepare.rs` 使用
//! - 使用 `models/geometry.rs`
//! - 子模块: genformat, poscar, detailed

pub mod detailed;
pub mod genformat;
pub mod poscar;

use crate::error::{ValidationError, ValidationKind};
use crate::models::{DetectedInput, Geometry};

use regex::Regex;
use std::sync::OnceLock;

/// 输入文本形态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    RawGenformat,
    HsdWrapped,
    PoscarLike,
}

/// 规范化结果
#[derive(Debug, Clone)]
pub struct NormalizedGeometry {
    pub format: InputFormat,
    pub detected: DetectedInput,
    pub geometry: Geometry,
    /// 规范 GenFormat 内层块
    pub canonical: String,
    /// 去掉 markdown 围栏后的原始输入
    pub raw: String,
}

fn fence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\A```[^\n]*\n|\n```\z").expect("valid fence regex"))
}

fn hsd_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?im)^[ \t]*Geometry[ \t]*=[ \t]*GenFormat[ \t]*\{[ \t\r]*$")
            .expect("valid hsd regex")
    })
}

/// 去掉 ```lang ... ``` 围栏
pub fn strip_fences(text: &str) -> String {
    fence_re().replace_all(text.trim(), "").trim().to_string()
}

/// 识别输入形态，总是成功
pub fn classify(text: &str) -> InputFormat {
    if hsd_re().is_match(text) {
        return InputFormat::HsdWrapped;
    }
    let first = text.lines().map(str::trim).find(|l| !l.is_empty());
    match first {
        Some(line) if genformat::is_header_line(line) => InputFormat::RawGenformat,
        _ => InputFormat::PoscarLike,
    }
}

/// 取出 `Geometry = GenFormat { ... }` 的内层块
pub fn extract_hsd_inner(text: &str) -> Result<String, ValidationError> {
    let Some(open) = hsd_re().find(text) else {
        return Err(ValidationError::new(
            ValidationKind::BadHeader,
            "missing 'Geometry = GenFormat {' wrapper",
        ));
    };
    let after = &text[open.end()..];
    let mut inner = Vec::new();
    for line in after.lines() {
        if line.trim() == "}" {
            return Ok(inner.join("\n").trim().to_string());
        }
        inner.push(line);
    }
    Err(ValidationError::new(
        ValidationKind::UnclosedBlock,
        "GenFormat: missing closing '}'",
    ))
}

/// GenFormat 入口：识别三种形态后解析并规范化
pub fn normalize_geometry(text: &str) -> Result<NormalizedGeometry, ValidationError> {
    let raw = strip_fences(text);
    let format = classify(&raw);
    let (detected, geometry) = match format {
        InputFormat::HsdWrapped => {
            let inner = extract_hsd_inner(&raw)?;
            (DetectedInput::Genformat, genformat::parse_genformat_content(&inner)?)
        }
        InputFormat::RawGenformat => (
            DetectedInput::Genformat,
            genformat::parse_genformat_content(&raw)?,
        ),
        InputFormat::PoscarLike => (
            DetectedInput::Poscar,
            poscar::parse_poscar_content(&raw)?.into_cluster(),
        ),
    };
    Ok(finish(format, detected, geometry, raw))
}

/// POSCAR 入口：不做格式识别
pub fn normalize_poscar(text: &str) -> Result<NormalizedGeometry, ValidationError> {
    let raw = strip_fences(text);
    let geometry = poscar::parse_poscar_content(&raw)?.into_cluster();
    Ok(finish(InputFormat::PoscarLike, DetectedInput::Poscar, geometry, raw))
}

fn finish(
    format: InputFormat,
    detected: DetectedInput,
    geometry: Geometry,
    raw: String,
) -> NormalizedGeometry {
    debug_assert!(geometry.is_consistent());
    let canonical = genformat::to_genformat_string(&geometry);
    NormalizedGeometry {
        format,
        detected,
        geometry,
        canonical,
        raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POSCAR: &str = "water\n1.0\n10 0 0\n0 10 0\n0 0 10\nO H\n1 2\nDirect\n0 0 0\n0.1 0 0\n0 0.1 0\n";
    const GEN: &str = "3 C\nC O H\n1 1 0.0 0.0 0.0\n2 2 0.0 0.0 1.2\n3 3 1.0 0.0 0.0";

    #[test]
    fn test_strip_fences() {
        let fenced = format!("```text\n{}\n```\n", GEN);
        assert_eq!(strip_fences(&fenced), GEN);
        assert_eq!(strip_fences(GEN), GEN);
    }

    #[test]
    fn test_classify_priority() {
        let wrapped = format!("Geometry = GenFormat {{\n{}\n}}\n", GEN);
        assert_eq!(classify(&wrapped), InputFormat::HsdWrapped);
        assert_eq!(classify(GEN), InputFormat::RawGenformat);
        assert_eq!(classify(POSCAR), InputFormat::PoscarLike);
        assert_eq!(classify("complete nonsense"), InputFormat::PoscarLike);
        assert_eq!(classify(""), InputFormat::PoscarLike);
    }

    #[test]
    fn test_hsd_wrapped_case_insensitive() {
        let wrapped = format!("geometry = genformat {{\n{}\n}}\n\nDriver {{}}\n", GEN);
        let norm = normalize_geometry(&wrapped).unwrap();
        assert_eq!(norm.format, InputFormat::HsdWrapped);
        assert_eq!(norm.geometry.species, vec!["C", "O", "H"]);
    }

    #[test]
    fn test_unclosed_hsd_block() {
        let wrapped = format!("Geometry = GenFormat {{\n{}\n", GEN);
        let err = normalize_geometry(&wrapped).unwrap_err();
        assert_eq!(err.kind, ValidationKind::UnclosedBlock);
    }

    #[test]
    fn test_genformat_path_falls_back_to_poscar() {
        let norm = normalize_geometry(POSCAR).unwrap();
        assert_eq!(norm.detected, DetectedInput::Poscar);
        assert_eq!(norm.geometry.species, vec!["O", "H"]);
        assert!(norm.canonical.starts_with("3 C\n  O H\n"));
        // Direct 坐标经过晶格转换为笛卡尔
        assert!(norm.canonical.contains(" 1.00000000000E+00"));
    }

    #[test]
    fn test_unrecognized_text_reports_poscar_error() {
        let err = normalize_geometry("hello\nworld").unwrap_err();
        assert_eq!(err.kind, ValidationKind::TooShort);
    }

    #[test]
    fn test_raw_input_is_defenced() {
        let fenced = format!("```\n{}\n```", GEN);
        let norm = normalize_geometry(&fenced).unwrap();
        assert_eq!(norm.raw, GEN);
        assert_eq!(norm.format, InputFormat::RawGenformat);
    }

    #[test]
    fn test_normalize_poscar_entry() {
        let norm = normalize_poscar(POSCAR).unwrap();
        assert_eq!(norm.geometry.elements(), vec!["H", "O"]);
        assert_eq!(norm.geometry.atoms.len(), 3);
        assert!(!norm.geometry.is_periodic());
    }

    #[test]
    fn test_canonical_block_reparses() {
        let norm = normalize_geometry(GEN).unwrap();
        let again = normalize_geometry(&norm.canonical).unwrap();
        assert_eq!(again.canonical, norm.canonical);

        let err = normalize_geometry("2 C\nC O\n1 1 nan 0.0 0.0\n2 2 inf 0.0 1.2\n").unwrap_err();
        assert_eq!(err.kind, ValidationKind::BadCoordinate);
    }

    #[test]
    fn test_repeated_poscar_symbols_give_distinct_species() {
        let text = "pair\n1.0\n10 0 0\n0 10 0\n0 0 10\nO H O\n1 2 1\nCartesian\n0 0 0\n0.96 0 0\n0 0.96 0\n5 5 5\n";
        let norm = normalize_poscar(text).unwrap();
        assert_eq!(norm.geometry.species, vec!["O", "H"]);
        assert!(norm.canonical.starts_with("4 C\n  O H\n"));
        assert!(norm.canonical.contains("\n  4 1  "));
    }
}
