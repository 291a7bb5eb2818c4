//! # param-sets 命令实现
//!
//! ## 依赖关系
//! - 使用 `dftb/params.rs`, `utils/output.rs`

use crate::config::Settings;
use crate::dftb::available_param_sets;
use crate::error::Result;
use crate::utils::output;

/// 执行 param-sets 命令
pub fn execute(settings: &Settings) -> Result<()> {
    let sets = available_param_sets(&settings.param_root);
    if sets.is_empty() {
        output::print_warning(&format!(
            "No parameter sets under '{}'",
            settings.param_root.display()
        ));
        return Ok(());
    }

    for name in &sets {
        let marker = if *name == settings.default_param_set {
            " (default)"
        } else {
            ""
        };
        println!("{}{}", name, marker);
    }
    Ok(())
}
