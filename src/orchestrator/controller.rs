//! 流程控制器
//!
//! 唯一持有流程状态的组件，组合文件选择、两条管线和提示通道。
//! 每个操作无论成功失败都会让状态落到一个确定的下一状态。

use crate::config::Config;
use crate::error::Operation;
use crate::infrastructure::{HttpTransport, Liveness, ReportSaver};
use crate::models::{AnalysisResult, SelectedFile};
use crate::services::{
    InputSource, Notification, NotificationChannel, NotificationKind, ResultView,
    SelectionManager,
};
use crate::workflow::{
    ExportPipeline, ExportReceipt, PipelineOutcome, SubmissionPipeline, WorkflowEvent,
    WorkflowState,
};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

pub const ANALYSIS_SUCCESS_MESSAGE: &str = "Analysis completed successfully!";
pub const EXPORT_SUCCESS_MESSAGE: &str = "PDF report downloaded successfully!";

/// 流程控制器
pub struct WorkflowController<T, S> {
    state_tx: watch::Sender<WorkflowState>,
    selection: SelectionManager,
    result: Option<AnalysisResult>,
    notifications: NotificationChannel,
    submission: SubmissionPipeline<T>,
    export: ExportPipeline<T, S>,
    liveness: Liveness,
}

impl<T: HttpTransport, S: ReportSaver> WorkflowController<T, S> {
    pub fn new(config: &Config, transport: T, saver: S) -> Self {
        let liveness = Liveness::new();
        let transport = Arc::new(transport);
        let (state_tx, _) = watch::channel(WorkflowState::Idle);

        Self {
            state_tx,
            selection: SelectionManager::new(),
            result: None,
            notifications: NotificationChannel::new(config.notification_dwell(), liveness.clone()),
            submission: SubmissionPipeline::new(
                Arc::clone(&transport),
                config.analyze_url(),
                liveness.clone(),
            ),
            export: ExportPipeline::new(
                transport,
                saver,
                config.report_url(),
                config.blob_release_delay(),
                liveness.clone(),
            ),
            liveness,
        }
    }

    // ========== 查询 ==========

    pub fn state(&self) -> WorkflowState {
        *self.state_tx.borrow()
    }

    /// 订阅状态变化
    pub fn subscribe(&self) -> watch::Receiver<WorkflowState> {
        self.state_tx.subscribe()
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selection.current()
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    /// 当前结果的展示视图
    pub fn view(&self) -> Option<ResultView> {
        self.result.as_ref().map(ResultView::new)
    }

    pub fn notification(&self) -> Notification {
        self.notifications.current()
    }

    /// "Analyze" 是否可用
    pub fn can_analyze(&self) -> bool {
        self.state() == WorkflowState::FileSelected && self.selection.has_selection()
    }

    /// "Export" 是否可用
    pub fn can_export(&self) -> bool {
        self.state() == WorkflowState::Resulted
    }

    pub fn is_active(&self) -> bool {
        self.liveness.is_alive()
    }

    /// 存活标记的句柄，可在别处触发销毁
    pub fn liveness(&self) -> Liveness {
        self.liveness.clone()
    }

    // ========== 文件选择 ==========

    /// 选择文件，返回是否被接受
    pub fn select_file(&mut self, file: SelectedFile, source: InputSource) -> bool {
        if !self.is_active() {
            return false;
        }
        if self.state().next(WorkflowEvent::Select).is_none() {
            warn!("⚠️ 当前状态 {} 不能选择文件，忽略: {}", self.state(), file.name);
            return false;
        }
        let name = file.name.clone();
        if !self.selection.select_from(file, source) {
            return false;
        }
        info!("📁 已选择文件: {}", name);
        self.apply(WorkflowEvent::Select)
    }

    /// 清除当前选择
    pub fn clear_selection(&mut self) -> bool {
        if !self.is_active() || !self.apply(WorkflowEvent::Clear) {
            return false;
        }
        self.selection.clear();
        true
    }

    // ========== 提交 ==========

    /// 提交当前选择的文件进行分析
    ///
    /// 不满足前置条件时不做任何事。无论结果如何选择都会被清除。
    pub async fn submit(&mut self) -> WorkflowState {
        if !self.is_active() || !self.can_analyze() {
            debug!("当前不能提交 (状态 {})", self.state());
            return self.state();
        }

        let file = self.selection.take();
        self.apply(WorkflowEvent::Submit);

        let outcome = self.submission.submit(file).await;
        match outcome {
            PipelineOutcome::Completed(result) => {
                self.result = Some(result);
                self.apply(WorkflowEvent::SubmitSucceeded);
                self.notifications
                    .notify(ANALYSIS_SUCCESS_MESSAGE, NotificationKind::Success);
            }
            PipelineOutcome::Failed(e) => {
                error!("❌ 分析失败: {}", e);
                self.apply(WorkflowEvent::SubmitFailed);
                self.notifications
                    .notify(e.user_message(Operation::Submit), NotificationKind::Error);
            }
            PipelineOutcome::Discarded => {
                debug!("分析响应已丢弃");
            }
            PipelineOutcome::Busy => {
                self.apply(WorkflowEvent::SubmitFailed);
            }
        }

        self.state()
    }

    // ========== 导出 ==========

    /// 导出当前结果为 PDF 报告
    ///
    /// 导出不会改变是否持有结果；没有结果时只给出错误提示。
    /// 只有报告真正保存后才返回回执。
    pub async fn export_report(&mut self) -> Option<ExportReceipt> {
        if !self.is_active() || self.state().is_busy() {
            debug!("当前不能导出 (状态 {})", self.state());
            return None;
        }

        let entered = self.apply(WorkflowEvent::Export);

        let outcome = self.export.export(self.result.as_ref()).await;
        let receipt = match outcome {
            PipelineOutcome::Completed(receipt) => {
                info!(
                    "✓ 报告导出成功: {} ({} 字节)",
                    receipt.saved_to.display(),
                    receipt.size_bytes
                );
                self.notifications
                    .notify(EXPORT_SUCCESS_MESSAGE, NotificationKind::Success);
                Some(receipt)
            }
            PipelineOutcome::Failed(e) => {
                error!("❌ 报告导出失败: {}", e);
                self.notifications
                    .notify(e.user_message(Operation::Export), NotificationKind::Error);
                None
            }
            PipelineOutcome::Discarded => {
                debug!("报告响应已丢弃");
                return None;
            }
            PipelineOutcome::Busy => None,
        };

        if entered {
            self.apply(WorkflowEvent::ExportFinished);
        }
        receipt
    }

    // ========== 其他 ==========

    /// 放弃当前结果，开始新的分析
    pub fn reset(&mut self) -> bool {
        if !self.is_active() || !self.apply(WorkflowEvent::Reset) {
            return false;
        }
        self.result = None;
        self.selection.clear();
        true
    }

    /// 立即关闭当前提示
    pub fn dismiss_notification(&self) {
        self.notifications.clear();
    }

    /// 销毁控制器：之后到达的响应和计时器都不再生效
    pub fn teardown(&self) {
        if self.liveness.is_alive() {
            info!("控制器已销毁");
        }
        self.liveness.shut_down();
    }

    fn apply(&mut self, event: WorkflowEvent) -> bool {
        let current = self.state();
        match current.next(event) {
            Some(next) => {
                if next != current {
                    debug!("状态 {} --{:?}--> {}", current, event, next);
                }
                self.state_tx.send_replace(next);
                true
            }
            None => {
                debug!("忽略事件 {:?} (当前状态 {})", event, current);
                false
            }
        }
    }
}

impl<T, S> Drop for WorkflowController<T, S> {
    fn drop(&mut self) {
        self.liveness.shut_down();
    }
}
