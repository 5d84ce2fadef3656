use crate::error::{AppError, AppResult, ConfigError};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// 默认配置文件路径
pub const DEFAULT_CONFIG_FILE: &str = "complexity_client.toml";

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 后端 API 根地址
    pub api_base_url: String,
    /// 代码分析接口（相对 api_base_url）
    pub analyze_endpoint: String,
    /// PDF 报告接口（相对 api_base_url）
    pub report_endpoint: String,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 提示消息停留时间（毫秒）
    pub notification_dwell_ms: u64,
    /// 报告临时引用的延迟释放时间（毫秒），可调
    pub blob_release_delay_ms: u64,
    /// 报告保存目录
    pub download_dir: String,
    /// 分析完成后是否自动导出报告
    pub auto_export: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000/api".to_string(),
            analyze_endpoint: "analyze/".to_string(),
            report_endpoint: "download-pdf/".to_string(),
            request_timeout_secs: 60,
            notification_dwell_ms: 3000,
            blob_release_delay_ms: 100,
            download_dir: "downloads".to_string(),
            auto_export: true,
            verbose_logging: false,
            output_log_file: "analysis_log.txt".to_string(),
        }
    }
}

impl Config {
    /// 加载配置：默认值 → TOML 文件（可选）→ 环境变量
    pub fn load() -> AppResult<Self> {
        let path = std::env::var("COMPLEXITY_CLIENT_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let base = if Path::new(&path).exists() {
            Self::from_toml_file(&path)?
        } else {
            debug!("配置文件 {} 不存在，使用默认配置", path);
            Self::default()
        };
        Ok(base.with_env_overrides())
    }

    /// 从 TOML 文件读取配置，缺失字段使用默认值
    pub fn from_toml_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(ConfigError::FileReadFailed {
                path: path.display().to_string(),
                source: Box::new(e),
            })
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            AppError::Config(ConfigError::TomlParseFailed { source, .. }) => {
                AppError::Config(ConfigError::TomlParseFailed {
                    path: path.display().to_string(),
                    source,
                })
            }
            other => other,
        })
    }

    /// 从 TOML 字符串解析配置
    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| {
            AppError::Config(ConfigError::TomlParseFailed {
                path: String::new(),
                source: Box::new(e),
            })
        })
    }

    /// 用环境变量覆盖当前配置，无法解析的值保持原样
    pub fn with_env_overrides(self) -> Self {
        Self {
            api_base_url: std::env::var("API_BASE_URL").unwrap_or(self.api_base_url),
            analyze_endpoint: std::env::var("ANALYZE_ENDPOINT").unwrap_or(self.analyze_endpoint),
            report_endpoint: std::env::var("REPORT_ENDPOINT").unwrap_or(self.report_endpoint),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.request_timeout_secs),
            notification_dwell_ms: std::env::var("NOTIFICATION_DWELL_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.notification_dwell_ms),
            blob_release_delay_ms: std::env::var("BLOB_RELEASE_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.blob_release_delay_ms),
            download_dir: std::env::var("DOWNLOAD_DIR").unwrap_or(self.download_dir),
            auto_export: std::env::var("AUTO_EXPORT").ok().and_then(|v| v.parse().ok()).unwrap_or(self.auto_export),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(self.output_log_file),
        }
    }

    /// 分析接口完整地址
    pub fn analyze_url(&self) -> String {
        join_url(&self.api_base_url, &self.analyze_endpoint)
    }

    /// 报告接口完整地址
    pub fn report_url(&self) -> String {
        join_url(&self.api_base_url, &self.report_endpoint)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn notification_dwell(&self) -> Duration {
        Duration::from_millis(self.notification_dwell_ms)
    }

    pub fn blob_release_delay(&self) -> Duration {
        Duration::from_millis(self.blob_release_delay_ms)
    }
}

fn join_url(base: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}
