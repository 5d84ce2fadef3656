//! HTTP 传输 - 基础设施层
//!
//! 只负责把请求发出去并把响应原样带回来，不判断状态码、不解析响应体。

use crate::config::Config;
use crate::error::{AppError, AppResult, ConfigError};
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::future::Future;
use tracing::debug;

/// 请求已发出但没有拿到响应时的底层错误
pub type TransportFailure = Box<dyn std::error::Error + Send + Sync>;

/// 请求体
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// multipart 表单，携带一个文件字段
    Multipart {
        field: String,
        file_name: String,
        bytes: Vec<u8>,
    },
    /// JSON 请求体
    Json(Value),
}

/// 收到的响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 从错误响应体中提取服务端给出的提示（`message` 优先，其次 `error`）
    pub fn server_message(&self) -> Option<String> {
        let value: Value = serde_json::from_slice(&self.body).ok()?;
        ["message", "error"]
            .iter()
            .filter_map(|key| value.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .find(|msg| !msg.is_empty())
            .map(str::to_string)
    }
}

/// HTTP 传输能力
pub trait HttpTransport: Send + Sync {
    /// 发送一次 POST 请求
    fn post(
        &self,
        url: &str,
        body: RequestBody,
    ) -> impl Future<Output = Result<HttpResponse, TransportFailure>> + Send;
}

/// 基于 reqwest 的传输实现
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| {
                AppError::Config(ConfigError::ClientBuildFailed {
                    source: Box::new(e),
                })
            })?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    async fn post(&self, url: &str, body: RequestBody) -> Result<HttpResponse, TransportFailure> {
        let request = self.client.post(url);
        let request = match body {
            RequestBody::Multipart {
                field,
                file_name,
                bytes,
            } => {
                debug!("POST {} (multipart, {} 字节)", url, bytes.len());
                let part = Part::bytes(bytes).file_name(file_name);
                request.multipart(Form::new().part(field, part))
            }
            RequestBody::Json(value) => {
                debug!("POST {} (json)", url);
                request.json(&value)
            }
        };

        let response = request.send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();

        debug!(
            "响应 {} status={} content-type={:?} {} 字节",
            url,
            status,
            content_type,
            body.len()
        );

        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}
