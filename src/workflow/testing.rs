//! 单元测试用的假传输和假保存动作

use crate::error::AppResult;
use crate::infrastructure::{
    HttpResponse, HttpTransport, ReportSaver, RequestBody, TransientBlob, TransportFailure,
};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

/// 按顺序返回预设响应的传输，并记录每次调用
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<HttpResponse, String>>>,
    calls: Mutex<Vec<(String, RequestBody)>>,
    latency: Option<Duration>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_latency(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::default()
        }
    }

    pub(crate) fn reply(self, status: u16, content_type: Option<&str>, body: &[u8]) -> Self {
        self.replies.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            content_type: content_type.map(str::to_string),
            body: body.to_vec(),
        }));
        self
    }

    pub(crate) fn reply_json(self, status: u16, body: serde_json::Value) -> Self {
        let bytes = serde_json::to_vec(&body).unwrap();
        self.reply(status, Some("application/json"), &bytes)
    }

    pub(crate) fn fail(self, reason: &str) -> Self {
        self.replies.lock().unwrap().push_back(Err(reason.to_string()));
        self
    }

    pub(crate) fn calls(&self) -> Vec<(String, RequestBody)> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl HttpTransport for ScriptedTransport {
    async fn post(&self, url: &str, body: RequestBody) -> Result<HttpResponse, TransportFailure> {
        self.calls.lock().unwrap().push((url.to_string(), body));
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("no scripted reply".to_string()));
        reply.map_err(TransportFailure::from)
    }
}

/// 只记录保存动作的假保存器
#[derive(Default)]
pub(crate) struct RecordingSaver {
    saved: Mutex<Vec<(String, Vec<u8>)>>,
}

impl RecordingSaver {
    pub(crate) fn saved(&self) -> Vec<(String, Vec<u8>)> {
        self.saved.lock().unwrap().clone()
    }
}

impl ReportSaver for RecordingSaver {
    async fn save(&self, blob: &TransientBlob, file_name: &str) -> AppResult<PathBuf> {
        let bytes = blob.read()?;
        self.saved
            .lock()
            .unwrap()
            .push((file_name.to_string(), bytes.as_ref().clone()));
        Ok(PathBuf::from(file_name))
    }
}
