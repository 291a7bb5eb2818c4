//! # show 命令实现
//!
//! 文本类文件直接输出内容，其他文件只报告大小与路径。
//!
//! ## 依赖关系
//! - 使用 `cli/show.rs` 定义的参数
//! - 使用 `jobs/workspace.rs`, `utils/output.rs`

use crate::cli::show::ShowArgs;
use crate::config::Settings;
use crate::error::{DftbkitError, Result};
use crate::jobs::WorkspaceManager;
use crate::utils::output;

use std::fs;
use std::path::Path;

/// 按扩展名视为文本的文件
const TEXT_EXTENSIONS: &[&str] = &["log", "out", "txt", "hsd", "gen", "json"];

/// 执行 show 命令
pub fn execute(args: ShowArgs, settings: &Settings) -> Result<()> {
    let workspace = WorkspaceManager::new(settings);
    let path = workspace.resolve_file(&args.job_id, &args.file)?;

    if is_text_file(&path) {
        let content = fs::read_to_string(&path).map_err(|e| DftbkitError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        print!("{}", content);
        if !content.is_empty() && !content.ends_with('\n') {
            println!();
        }
    } else {
        let size = fs::metadata(&path)
            .map_err(|e| DftbkitError::FileReadError {
                path: path.display().to_string(),
                source: e,
            })?
            .len();
        output::print_note(&format!("{} ({} bytes)", path.display(), size));
    }
    Ok(())
}

fn is_text_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| TEXT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_extensions() {
        assert!(is_text_file(Path::new("out.log")));
        assert!(is_text_file(Path::new("dftb_in.hsd")));
        assert!(is_text_file(Path::new("GENFORMAT.txt")));
        assert!(is_text_file(Path::new("job.JSON")));
        assert!(!is_text_file(Path::new("charges.bin")));
        assert!(!is_text_file(Path::new("parameters")));
    }
}
