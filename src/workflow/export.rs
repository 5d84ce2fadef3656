//! 导出管线 - 流程层
//!
//! 把分析结果发往报告服务，校验返回的 PDF 后通过临时引用触发保存。
//! 导出失败不会改变已持有的分析结果。

use crate::error::{AppError, MalformedReason, ValidationError};
use crate::infrastructure::{BlobStore, HttpTransport, Liveness, ReportSaver, RequestBody};
use crate::models::AnalysisResult;
use crate::workflow::{InFlight, PipelineOutcome};
use regex::Regex;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use tracing::{debug, info, warn};

/// 文件名不可用时的基础名
pub const DEFAULT_BASE_NAME: &str = "code_analysis";

/// 期望的报告格式
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// 一次成功导出的回执
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReceipt {
    /// 建议的保存文件名
    pub file_name: String,
    /// 实际保存位置
    pub saved_to: PathBuf,
    pub size_bytes: usize,
}

static EXTENSION_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\.[^/.]+$").ok());

/// 取最后一个路径分量并去掉最后一个扩展名
///
/// 文件名来自服务端，目录部分一律丢弃；缺失、为空或只剩 `.`/`..` 时使用默认名
pub fn derive_base_name(file_name: Option<&str>) -> String {
    let Some(name) = file_name
        .and_then(|n| n.rsplit(['/', '\\']).next())
        .filter(|n| !n.is_empty() && *n != "." && *n != "..")
    else {
        return DEFAULT_BASE_NAME.to_string();
    };

    let base = match EXTENSION_RE.as_ref() {
        Some(re) => re.replace(name, "").into_owned(),
        None => name.to_string(),
    };
    if base.is_empty() {
        DEFAULT_BASE_NAME.to_string()
    } else {
        base
    }
}

/// 导出管线
pub struct ExportPipeline<T, S> {
    transport: Arc<T>,
    saver: S,
    blobs: BlobStore,
    endpoint: String,
    release_delay: Duration,
    liveness: Liveness,
    in_flight: AtomicBool,
}

impl<T: HttpTransport, S: ReportSaver> ExportPipeline<T, S> {
    pub fn new(
        transport: Arc<T>,
        saver: S,
        endpoint: impl Into<String>,
        release_delay: Duration,
        liveness: Liveness,
    ) -> Self {
        Self {
            transport,
            saver,
            blobs: BlobStore::new(),
            endpoint: endpoint.into(),
            release_delay,
            liveness,
            in_flight: AtomicBool::new(false),
        }
    }

    /// 临时引用登记表
    pub fn blobs(&self) -> &BlobStore {
        &self.blobs
    }

    pub fn saver(&self) -> &S {
        &self.saver
    }

    /// 导出报告
    pub async fn export(&self, result: Option<&AnalysisResult>) -> PipelineOutcome<ExportReceipt> {
        let Some(_in_flight) = InFlight::enter(&self.in_flight) else {
            warn!("⚠️ 已有导出请求在途，忽略本次导出");
            return PipelineOutcome::Busy;
        };

        // 本地预检，不通过则不发请求
        let Some(result) = result.filter(|r| !r.functions.is_empty()) else {
            return PipelineOutcome::Failed(ValidationError::NoData.into());
        };

        let base_name = derive_base_name(result.file_name.as_deref());
        let payload = result.to_report_payload(&base_name);
        info!("📄 请求生成报告: {} ({} 个函数)", base_name, result.functions.len());

        let reply = self
            .transport
            .post(&self.endpoint, RequestBody::Json(payload))
            .await;

        if !self.liveness.is_alive() {
            debug!("控制器已销毁，丢弃报告响应: {}", base_name);
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

        if response.body.is_empty() {
            return PipelineOutcome::Failed(AppError::malformed(
                &self.endpoint,
                MalformedReason::EmptyPayload,
            ));
        }

        let is_pdf = response
            .content_type
            .as_deref()
            .map(|ct| ct.to_ascii_lowercase().contains(PDF_CONTENT_TYPE))
            .unwrap_or(false);
        if !is_pdf {
            return PipelineOutcome::Failed(AppError::malformed(
                &self.endpoint,
                MalformedReason::UnexpectedContentType(response.content_type),
            ));
        }

        let size_bytes = response.body.len();
        let file_name = format!("{}_analysis.pdf", base_name);

        // 引用在本作用域结束后延迟释放
        let blob = self.blobs.acquire(response.body, self.release_delay);
        debug!("报告临时引用: {}", blob.url());

        match self.saver.save(&blob, &file_name).await {
            Ok(saved_to) => PipelineOutcome::Completed(ExportReceipt {
                file_name,
                saved_to,
                size_bytes,
            }),
            Err(e) => PipelineOutcome::Failed(e),
        }
    }
}
