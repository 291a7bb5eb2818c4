//! # 终端输出
//!
//! 面向用户的作业卡片、运行结局行和批量汇总。诊断日志走 `tracing`，不经过这里。
//!
//! ## 依赖关系
//! - 被 `main.rs` 和 `commands/` 模块使用
//! - 使用 `models/job.rs` 的 `JobState`, `batch/runner.rs` 的 `BatchResult`
//! - 使用 `colored` crate

use crate::batch::BatchResult;
use crate::models::JobState;

use colored::{ColoredString, Colorize};

const RULE_WIDTH: usize = 60;

/// 单个作业一次运行的结局
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// 引擎跑完并留下报告
    Finished,
    /// 跑了，但超时、非零退出或没有报告
    Failed,
    /// 根本没有启动
    NotRun,
}

impl Verdict {
    fn tag(self) -> ColoredString {
        match self {
            Verdict::Finished => "[RUN OK]".green().bold(),
            Verdict::Failed => "[RUN FAIL]".yellow().bold(),
            Verdict::NotRun => "[NOT RUN]".red().bold(),
        }
    }
}

/// 打印致命错误 (stderr)
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

/// 打印警告，如空目录
pub fn print_warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// 打印提示
pub fn print_note(msg: &str) {
    println!("{} {}", "[*]".blue().bold(), msg);
}

/// 打印文件写出确认
pub fn print_saved(what: &str, path: &std::path::Path) {
    println!("{} {} saved to '{}'", "[OK]".green().bold(), what, path.display());
}

/// 打印一个作业的运行结局
pub fn print_job(verdict: Verdict, job_id: &str, detail: &str) {
    println!("{} {} {}", verdict.tag(), job_id.bold(), detail);
}

/// 带颜色的作业状态
pub fn state_label(state: JobState) -> ColoredString {
    let text = state.to_string();
    match state {
        JobState::Completed => text.green(),
        JobState::Prepared => text.cyan(),
        JobState::NotRun => text.dimmed(),
    }
}

/// 打印作业卡片：标题栏加对齐的字段
pub fn print_job_card(title: &str, fields: &[(&str, String)]) {
    let rule = "─".repeat(RULE_WIDTH);
    println!("\n{}", rule.dimmed());
    println!("  {}", title.bold());
    println!("{}", rule.dimmed());
    for (label, value) in fields {
        let label = format!("{:<16}", format!("{}:", label));
        println!("  {} {}", label.dimmed(), value);
    }
}

/// 打印批量运行汇总，随后逐条列出未成功的作业
pub fn print_batch_summary(summary: &BatchResult) {
    println!("{}", "─".repeat(RULE_WIDTH).dimmed());
    println!(
        "{} {} succeeded, {} failed, {} not run",
        "[DONE]".green().bold(),
        summary.success.to_string().green(),
        summary.failed.to_string().yellow(),
        summary.errors.to_string().red()
    );
    for line in failure_lines(summary) {
        println!("  {}", line);
    }
}

/// 未成功作业的明细行，顺序与提交顺序一致
pub fn failure_lines(summary: &BatchResult) -> Vec<String> {
    summary
        .failures
        .iter()
        .map(|(id, reason)| format!("{}: {}", id, reason))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::ProcessResult;

    #[test]
    fn test_failure_lines_keep_reasons() {
        let mut summary = BatchResult::default();
        summary.merge(ProcessResult::Success("a".to_string()));
        summary.merge(ProcessResult::Failed("b".to_string(), "timed out after 5s".to_string()));
        summary.merge(ProcessResult::Error("c".to_string(), "job 'c' not found".to_string()));

        assert_eq!(
            failure_lines(&summary),
            vec!["b: timed out after 5s", "c: job 'c' not found"]
        );
    }

    #[test]
    fn test_no_failure_lines_when_all_ok() {
        let mut summary = BatchResult::default();
        summary.merge(ProcessResult::Success("a".to_string()));
        assert!(failure_lines(&summary).is_empty());
    }
}
