//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层持有流程状态并负责调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `controller` - 流程控制器
//! - 唯一持有 `WorkflowState`，通过 watch 通道发布状态变化
//! - 组合文件选择、提交管线、导出管线和提示通道
//! - 把管线的结果转换为状态转移和用户提示
//! - 销毁后丢弃迟到的响应和计时器
//!
//! ### `app` - 会话驱动
//! - 管理应用生命周期（初始化、运行、清理）
//! - 逐个处理命令行给出的文件
//! - 输出全局统计信息
//!
//! ## 层次关系
//!
//! ```text
//! app (处理 Vec<PathBuf>)
//!     ↓
//! controller (单个文件的状态机)
//!     ↓
//! workflow::{SubmissionPipeline, ExportPipeline}
//!     ↓
//! services (能力层：selection / notification / presenter)
//!     ↓
//! infrastructure (基础设施：HttpTransport / BlobStore / ReportSaver)
//! ```

pub mod app;
pub mod controller;

// 重新导出主要类型
pub use app::{App, FileOutcome, SessionStats};
pub use controller::{WorkflowController, ANALYSIS_SUCCESS_MESSAGE, EXPORT_SUCCESS_MESSAGE};
