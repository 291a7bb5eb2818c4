//! # 参数集（Slater-Koster 文件目录）
//!
//! 参数集是参数根目录下的一个子目录，例如 `parameters/mio-1-1/`，
//! 其中每个物种对对应一个 `<A>-<B>.skf` 文件。
//!
//! ## 依赖关系
//! - 被 `jobs/prepare.rs` 和 `commands/params.rs` 使用
//! - 使用 `dftb/species.rs` 的 `ParamFamily`

use super::species::ParamFamily;
use crate::error::{DftbkitError, Result};

use std::fs;
use std::path::{Path, PathBuf};

/// 已验证存在的参数集
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSet {
    pub name: String,
    pub dir: PathBuf,
}

impl ParameterSet {
    /// 在参数根目录下查找参数集，不存在时返回 `UnknownParamSet`
    pub fn resolve(root: &Path, name: &str) -> Result<Self> {
        let dir = root.join(name);
        let plain_name = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(|c: char| c == '/' || c == '\\');
        if !plain_name || !dir.is_dir() {
            let available = available_param_sets(root);
            return Err(DftbkitError::UnknownParamSet {
                name: name.to_string(),
                root: root.display().to_string(),
                available: if available.is_empty() {
                    "(none)".to_string()
                } else {
                    available.join(",")
                },
            });
        }
        Ok(ParameterSet {
            name: name.to_string(),
            dir,
        })
    }

    pub fn family(&self) -> ParamFamily {
        ParamFamily::from_set_name(&self.name)
    }

    /// 物种对文件的绝对路径
    pub fn slako_file(&self, a: &str, b: &str) -> PathBuf {
        self.dir.join(format!("{}-{}.skf", a, b))
    }

    /// 确认所有有序物种对的 .skf 文件存在
    pub fn check_pairs(&self, species: &[String]) -> Result<()> {
        for a in species {
            for b in species {
                let path = self.slako_file(a, b);
                if !path.is_file() {
                    return Err(DftbkitError::MissingSlakoFile {
                        path: path.display().to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// 参数根目录下的全部参数集名称（排序），根目录不存在时为空
pub fn available_param_sets(root: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(root) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_root() -> tempfile::TempDir {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("mio-1-1")).unwrap();
        fs::create_dir_all(root.path().join("3ob-3-1")).unwrap();
        fs::write(root.path().join("README"), "not a set").unwrap();
        root
    }

    #[test]
    fn test_available_sorted_dirs_only() {
        let root = make_root();
        assert_eq!(available_param_sets(root.path()), vec!["3ob-3-1", "mio-1-1"]);
        assert!(available_param_sets(&root.path().join("missing")).is_empty());
    }

    #[test]
    fn test_resolve_unknown_lists_available() {
        let root = make_root();
        let err = ParameterSet::resolve(root.path(), "nonexistent").unwrap_err();
        match err {
            DftbkitError::UnknownParamSet { available, .. } => {
                assert_eq!(available, "3ob-3-1,mio-1-1")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_rejects_path_components() {
        let root = make_root();
        assert!(ParameterSet::resolve(root.path(), "../mio-1-1").is_err());
        assert!(ParameterSet::resolve(root.path(), "..").is_err());
        assert!(ParameterSet::resolve(root.path(), "").is_err());
    }

    #[test]
    fn test_check_pairs() {
        let root = make_root();
        let set = ParameterSet::resolve(root.path(), "mio-1-1").unwrap();
        let species = vec!["O".to_string(), "H".to_string()];
        for (a, b) in [("O", "O"), ("O", "H"), ("H", "O")] {
            fs::write(set.slako_file(a, b), "").unwrap();
        }
        assert!(matches!(
            set.check_pairs(&species),
            Err(DftbkitError::MissingSlakoFile { .. })
        ));
        fs::write(set.slako_file("H", "H"), "").unwrap();
        set.check_pairs(&species).unwrap();
    }
}
