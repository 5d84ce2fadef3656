//! 提交管线 - 流程层
//!
//! 读取文件字节，以 multipart 发往分析服务，解析响应为 `AnalysisResult`。

use crate::error::{AppError, MalformedReason, ValidationError};
use crate::infrastructure::{HttpTransport, Liveness, RequestBody};
use crate::models::{AnalysisResult, SelectedFile};
use crate::workflow::{InFlight, PipelineOutcome};
use serde_json::Value;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 上传文件使用的表单字段
pub const FILE_FIELD: &str = "file";

/// 提交管线
pub struct SubmissionPipeline<T> {
    transport: Arc<T>,
    endpoint: String,
    liveness: Liveness,
    in_flight: AtomicBool,
}

impl<T: HttpTransport> SubmissionPipeline<T> {
    pub fn new(transport: Arc<T>, endpoint: impl Into<String>, liveness: Liveness) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
            liveness,
            in_flight: AtomicBool::new(false),
        }
    }

    /// 提交一个文件
    ///
    /// 同一时刻只允许一个提交，重复调用返回 `Busy`
    pub async fn submit(&self, file: Option<SelectedFile>) -> PipelineOutcome<AnalysisResult> {
        let Some(_in_flight) = InFlight::enter(&self.in_flight) else {
            warn!("⚠️ 已有分析请求在途，忽略本次提交");
            return PipelineOutcome::Busy;
        };

        let Some(file) = file else {
            return PipelineOutcome::Failed(ValidationError::NoFileSelected.into());
        };

        info!("📤 提交文件: {} ({})", file.name, file.size_kb());

        let bytes = match file.content.read().await {
            Ok(bytes) => bytes,
            Err(e) => return PipelineOutcome::Failed(e),
        };

        let body = RequestBody::Multipart {
            field: FILE_FIELD.to_string(),
            file_name: file.name.clone(),
            bytes,
        };
        let reply = self.transport.post(&self.endpoint, body).await;

        if !self.liveness.is_alive() {
            debug!("控制器已销毁，丢弃分析响应: {}", file.name);
            return PipelineOutcome::Discarded;
        }

        let response = match reply {
            Ok(response) => response,
            Err(e) => return PipelineOutcome::Failed(AppError::transport(&self.endpoint, e)),
        };

        if !response.is_success() {
            return PipelineOutcome::Failed(AppError::server(
                &self.endpoint,
                response.status,
                response.server_message(),
            ));
        }

        let value: Value = match serde_json::from_slice(&response.body) {
            Ok(value) => value,
            Err(e) => {
                return PipelineOutcome::Failed(AppError::malformed(
                    &self.endpoint,
                    MalformedReason::InvalidJson(e.to_string()),
                ))
            }
        };

        let result = AnalysisResult::from_json(value);
        info!(
            "✓ 分析完成: {} 个函数 (simple {}, moderate {}, complex {})",
            result.functions.len(),
            result.summary.simple,
            result.summary.moderate,
            result.summary.complex
        );
        PipelineOutcome::Completed(result)
    }
}
