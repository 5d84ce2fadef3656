//! # Complexity Client
//!
//! C/C++ 源文件复杂度分析客户端：上传源文件，展示函数级复杂度，导出 PDF 报告
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有外部资源，只暴露能力
//! - `HttpTransport` - 发送请求并原样带回响应
//! - `BlobStore` / `TransientBlob` - 报告字节的临时引用
//! - `ReportSaver` - 保存报告
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，不持有流程状态
//! - `classification` - 复杂度分级与严重程度
//! - `SelectionManager` - 文件选择与扩展名过滤
//! - `NotificationChannel` - 定时消失的提示
//! - `ResultView` - 结果展示
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义状态转移和两条网络管线
//! - `SubmissionPipeline` - 文件 → 分析结果
//! - `ExportPipeline` - 分析结果 → PDF 报告
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/controller` - 流程控制器，唯一持有状态
//! - `orchestrator/app` - 会话驱动，逐个处理命令行文件
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, ErrorKind, Operation};
pub use infrastructure::{DirectorySaver, HttpTransport, ReportSaver, ReqwestTransport};
pub use models::{AnalysisResult, FunctionMetric, SelectedFile};
pub use orchestrator::{App, SessionStats, WorkflowController};
pub use services::{InputSource, Notification, NotificationKind, ResultView, Tier};
pub use workflow::{WorkflowEvent, WorkflowState};
