//! # 批量执行器
//!
//! 在 rayon 线程池上并行处理一组作业。
//!
//! ## 功能
//! - 基于 rayon 的并行迭代，结果保持输入顺序
//! - 进度条显示
//! - 成功 / 失败 / 错误 汇总
//!
//! ## 依赖关系
//! - 被 `commands/run.rs` 调用
//! - 使用 `utils/progress.rs` 创建进度条

use crate::utils::progress;

use rayon::prelude::*;

/// 单个作业的处理结果
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessResult {
    /// 运行成功
    Success(String),
    /// 引擎运行了但没有成功 (作业, 原因)
    Failed(String, String),
    /// 无法运行，如作业不存在或正被占用 (作业, 错误信息)
    Error(String, String),
}

/// 批量处理结果统计
#[derive(Debug, Default)]
pub struct BatchResult {
    pub success: usize,
    pub failed: usize,
    pub errors: usize,
    /// 失败与错误详情
    pub failures: Vec<(String, String)>,
}

impl BatchResult {
    /// 合并处理结果
    pub fn merge(&mut self, result: ProcessResult) {
        match result {
            ProcessResult::Success(_) => self.success += 1,
            ProcessResult::Failed(id, reason) => {
                self.failed += 1;
                self.failures.push((id, reason));
            }
            ProcessResult::Error(id, err) => {
                self.errors += 1;
                self.failures.push((id, err));
            }
        }
    }

    /// 总处理数量
    pub fn total(&self) -> usize {
        self.success + self.failed + self.errors
    }

    pub fn all_ok(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }
}

/// 批量执行器
pub struct BatchRunner {
    /// 并行作业数
    jobs: usize,
}

impl BatchRunner {
    /// 创建新的批量执行器，0 表示 CPU 数
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self { jobs }
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// 并行处理，返回与输入同序的结果
    pub fn run<T, R, F>(&self, items: &[T], message: &str, processor: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send,
    {
        let pb = progress::create_progress_bar(items.len() as u64, message);

        let work = || -> Vec<R> {
            items
                .par_iter()
                .map(|item| {
                    let result = processor(item);
                    pb.inc(1);
                    result
                })
                .collect()
        };

        let results = match rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
        {
            Ok(pool) => pool.install(work),
            Err(e) => {
                tracing::warn!(error = %e, "falling back to the global thread pool");
                work()
            }
        };

        pb.finish_and_clear();
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;

    #[test]
    fn test_results_keep_input_order() {
        let runner = BatchRunner::new(4);
        let items: Vec<u32> = (0..20).collect();
        let out = runner.run(&items, "square", |x| x * x);
        assert_eq!(out, items.iter().map(|x| x * x).collect::<Vec<_>>());
    }

    #[test]
    fn test_items_run_concurrently() {
        // 两个任务互相等待，只有并行执行才能完成
        let runner = BatchRunner::new(2);
        let barrier = Barrier::new(2);
        let seen = AtomicUsize::new(0);
        runner.run(&[1, 2], "barrier", |_| {
            barrier.wait();
            seen.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_batch_result_merge() {
        let mut summary = BatchResult::default();
        summary.merge(ProcessResult::Success("a".into()));
        summary.merge(ProcessResult::Failed("b".into(), "exit code 1".into()));
        summary.merge(ProcessResult::Error("c".into(), "busy".into()));
        assert_eq!(summary.total(), 3);
        assert!(!summary.all_ok());
        assert_eq!(summary.failures.len(), 2);
    }

    #[test]
    fn test_zero_jobs_means_cpu_count() {
        assert_eq!(BatchRunner::new(0).jobs(), num_cpus::get());
    }
}
