//! 会话驱动 - 编排层
//!
//! 把命令行给出的文件逐个送进控制器：选择 → 分析 → 展示 → 导出 → 重置。
//! 只做调度和统计，所有业务判断都在控制器和管线里。

use crate::config::Config;
use crate::infrastructure::{DirectorySaver, HttpTransport, ReportSaver, ReqwestTransport};
use crate::models::SelectedFile;
use crate::orchestrator::controller::WorkflowController;
use crate::services::InputSource;
use crate::utils::logging::{
    append_log_line, init_log_file, log_file_start, log_startup, print_final_stats,
};
use crate::workflow::WorkflowState;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// 单个文件的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// 分析成功且报告已导出
    Exported,
    /// 分析成功，未导出或导出失败
    Analyzed,
    /// 读取或分析失败
    Failed,
    /// 扩展名不被接受
    Skipped,
}

/// 会话统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionStats {
    pub total: usize,
    pub analyzed: usize,
    pub exported: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl SessionStats {
    fn record(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Exported => {
                self.analyzed += 1;
                self.exported += 1;
            }
            FileOutcome::Analyzed => self.analyzed += 1,
            FileOutcome::Failed => self.failed += 1,
            FileOutcome::Skipped => self.skipped += 1,
        }
    }
}

/// 应用主结构
pub struct App<T, S> {
    config: Config,
    controller: WorkflowController<T, S>,
}

impl App<ReqwestTransport, DirectorySaver> {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        init_log_file(&config.output_log_file)?;

        log_startup(&config);

        let transport = ReqwestTransport::new(&config)?;
        let saver = DirectorySaver::new(&config.download_dir);
        let controller = WorkflowController::new(&config, transport, saver);

        Ok(Self::new(config, controller))
    }
}

impl<T: HttpTransport, S: ReportSaver> App<T, S> {
    pub fn new(config: Config, controller: WorkflowController<T, S>) -> Self {
        Self { config, controller }
    }

    pub fn controller(&self) -> &WorkflowController<T, S> {
        &self.controller
    }

    /// 运行应用主逻辑
    pub async fn run(mut self, paths: Vec<PathBuf>) -> Result<SessionStats> {
        let mut stats = SessionStats {
            total: paths.len(),
            ..Default::default()
        };

        if paths.is_empty() {
            warn!("⚠️ 没有指定待分析的文件，程序结束");
            self.controller.teardown();
            return Ok(stats);
        }

        for (idx, path) in paths.iter().enumerate() {
            log_file_start(idx + 1, stats.total, &path.display().to_string());

            let outcome = self.process_file(path).await;
            stats.record(outcome);

            let line = format!("{:?}: {}", outcome, path.display());
            if let Err(e) = append_log_line(&self.config.output_log_file, &line) {
                warn!("⚠️ 写入日志文件失败: {}", e);
            }
        }

        let summary = format!(
            "统计: 分析成功 {}/{}，导出 {}，失败 {}，跳过 {}",
            stats.analyzed, stats.total, stats.exported, stats.failed, stats.skipped
        );
        if let Err(e) = append_log_line(&self.config.output_log_file, &summary) {
            warn!("⚠️ 写入日志文件失败: {}", e);
        }

        print_final_stats(
            stats.analyzed,
            stats.exported,
            stats.failed,
            stats.skipped,
            stats.total,
            &self.config.output_log_file,
        );

        self.controller.teardown();
        Ok(stats)
    }

    /// 处理单个文件
    async fn process_file(&mut self, path: &Path) -> FileOutcome {
        let file = match SelectedFile::from_path(path).await {
            Ok(file) => file,
            Err(e) => {
                error!("❌ 读取文件失败: {}", e);
                return FileOutcome::Failed;
            }
        };

        if !self.controller.select_file(file, InputSource::Picker) {
            warn!("⚠️ 不支持的文件类型，跳过: {}", path.display());
            return FileOutcome::Skipped;
        }

        if self.controller.submit().await != WorkflowState::Resulted {
            error!("❌ {}", self.controller.notification().message);
            return FileOutcome::Failed;
        }

        if let Some(view) = self.controller.view() {
            info!("\n{}", view);
        }

        let outcome = if self.config.auto_export {
            match self.controller.export_report().await {
                Some(receipt) => {
                    info!("✓ 报告已保存: {}", receipt.saved_to.display());
                    FileOutcome::Exported
                }
                None => {
                    warn!("⚠️ 报告未导出: {}", self.controller.notification().message);
                    FileOutcome::Analyzed
                }
            }
        } else {
            FileOutcome::Analyzed
        };

        self.controller.reset();
        outcome
    }
}
