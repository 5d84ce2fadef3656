//! 流程层
//!
//! - `state` - 状态转移表
//! - `submission` - 文件 → 分析结果
//! - `export` - 分析结果 → 保存的报告
//!
//! 两条管线都在边界处把所有错误收敛为 `PipelineOutcome`，不会向上抛出。

pub mod export;
pub mod state;
pub mod submission;

#[cfg(test)]
pub(crate) mod testing;

pub use export::{derive_base_name, ExportPipeline, ExportReceipt, DEFAULT_BASE_NAME};
pub use state::{WorkflowEvent, WorkflowState};
pub use submission::SubmissionPipeline;

use crate::error::AppError;
use std::sync::atomic::{AtomicBool, Ordering};

/// 管线调用结果
#[derive(Debug)]
pub enum PipelineOutcome<T> {
    /// 成功完成
    Completed(T),
    /// 失败，错误已分类
    Failed(AppError),
    /// 响应到达时控制器已销毁，结果被丢弃
    Discarded,
    /// 已有请求在途，本次调用被忽略
    Busy,
}

impl<T> PipelineOutcome<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, PipelineOutcome::Completed(_))
    }
}

/// 在途标记，离开作用域时自动复位
pub(crate) struct InFlight<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlight<'a> {
    pub(crate) fn enter(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
