use std::fmt;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 本地预检失败（未发起网络请求）
    Validation(ValidationError),
    /// 远程服务调用错误
    Api(ApiError),
    /// 本地文件操作错误
    File(FileError),
    /// 配置错误
    Config(ConfigError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(e) => write!(f, "校验错误: {}", e),
            AppError::Api(e) => write!(f, "API错误: {}", e),
            AppError::File(e) => write!(f, "文件错误: {}", e),
            AppError::Config(e) => write!(f, "配置错误: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Validation(e) => Some(e),
            AppError::Api(e) => Some(e),
            AppError::File(e) => Some(e),
            AppError::Config(e) => Some(e),
        }
    }
}

/// 本地预检错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// 没有选中的文件
    NoFileSelected,
    /// 没有可导出的分析结果
    NoData,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NoFileSelected => write!(f, "没有选中的文件"),
            ValidationError::NoData => write!(f, "没有可导出的分析数据"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// 响应未通过本地形状检查的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    /// 响应体为空
    EmptyPayload,
    /// Content-Type 不是期望的格式
    UnexpectedContentType(Option<String>),
    /// 响应体不是合法 JSON
    InvalidJson(String),
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::EmptyPayload => write!(f, "响应体为空"),
            MalformedReason::UnexpectedContentType(ct) => {
                write!(f, "意外的 Content-Type: {:?}", ct)
            }
            MalformedReason::InvalidJson(e) => write!(f, "JSON解析失败: {}", e),
        }
    }
}

/// API 调用错误
#[derive(Debug)]
pub enum ApiError {
    /// 请求已发出但没有收到响应
    Transport {
        endpoint: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 收到非成功状态码
    Server {
        endpoint: String,
        status: u16,
        message: Option<String>,
    },
    /// 收到响应但未通过本地检查
    Malformed {
        endpoint: String,
        reason: MalformedReason,
    },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport { endpoint, source } => {
                write!(f, "请求无响应 ({}): {}", endpoint, source)
            }
            ApiError::Server {
                endpoint,
                status,
                message,
            } => {
                write!(
                    f,
                    "服务端返回错误 ({}): status={}, message={:?}",
                    endpoint, status, message
                )
            }
            ApiError::Malformed { endpoint, reason } => {
                write!(f, "响应格式异常 ({}): {}", endpoint, reason)
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Transport { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

/// 文件操作错误
#[derive(Debug)]
pub enum FileError {
    /// 读取文件失败
    ReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入文件失败
    WriteFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 临时引用已被释放
    BlobRevoked {
        url: String,
    },
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileError::ReadFailed { path, source } => {
                write!(f, "读取文件失败 ({}): {}", path, source)
            }
            FileError::WriteFailed { path, source } => {
                write!(f, "写入文件失败 ({}): {}", path, source)
            }
            FileError::BlobRevoked { url } => write!(f, "临时引用已释放: {}", url),
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileError::ReadFailed { source, .. } | FileError::WriteFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            FileError::BlobRevoked { .. } => None,
        }
    }
}

/// 配置错误
#[derive(Debug)]
pub enum ConfigError {
    /// 配置文件读取失败
    FileReadFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 配置文件解析失败
    TomlParseFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// HTTP 客户端构建失败
    ClientBuildFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileReadFailed { path, source } => {
                write!(f, "无法读取配置文件 ({}): {}", path, source)
            }
            ConfigError::TomlParseFailed { path, source } => {
                write!(f, "TOML解析失败 ({}): {}", path, source)
            }
            ConfigError::ClientBuildFailed { source } => {
                write!(f, "HTTP 客户端构建失败: {}", source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::FileReadFailed { source, .. }
            | ConfigError::TomlParseFailed { source, .. }
            | ConfigError::ClientBuildFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
        }
    }
}

// ========== 错误分类 ==========

/// 面向用户的错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 本地预检失败，没有发起网络请求
    Validation,
    /// 请求已发出，没有收到响应
    Transport,
    /// 收到非成功状态码
    Server,
    /// 收到响应但未通过形状检查
    MalformedResponse,
}

/// 触发错误的操作，用于选择用户提示文案
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Submit,
    Export,
}

pub const NO_RESPONSE_MESSAGE: &str = "No response from server - check your connection";
pub const ANALYZE_FAILED_MESSAGE: &str = "Error analyzing code. Please try again.";
pub const NO_FILE_MESSAGE: &str = "No file selected";
pub const NO_DATA_MESSAGE: &str = "No analysis results available to export";
pub const EMPTY_PDF_MESSAGE: &str = "Received empty PDF file";
pub const NOT_PDF_MESSAGE: &str = "Server did not return a PDF file";
pub const SAVE_FAILED_MESSAGE: &str = "Failed to save PDF report";

impl AppError {
    /// 归入四类错误之一
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) | AppError::File(_) | AppError::Config(_) => {
                ErrorKind::Validation
            }
            AppError::Api(ApiError::Transport { .. }) => ErrorKind::Transport,
            AppError::Api(ApiError::Server { .. }) => ErrorKind::Server,
            AppError::Api(ApiError::Malformed { .. }) => ErrorKind::MalformedResponse,
        }
    }

    /// 转换为唯一的用户提示文案
    pub fn user_message(&self, operation: Operation) -> String {
        match self {
            AppError::Api(ApiError::Transport { .. }) => NO_RESPONSE_MESSAGE.to_string(),
            AppError::Api(ApiError::Server {
                status, message, ..
            }) => match message {
                Some(msg) if !msg.trim().is_empty() => msg.clone(),
                _ => format!("Server error: {}", status),
            },
            AppError::Validation(ValidationError::NoFileSelected) => NO_FILE_MESSAGE.to_string(),
            AppError::Validation(ValidationError::NoData) => NO_DATA_MESSAGE.to_string(),
            AppError::Api(ApiError::Malformed { reason, .. }) => match (operation, reason) {
                (Operation::Export, MalformedReason::EmptyPayload) => {
                    EMPTY_PDF_MESSAGE.to_string()
                }
                (Operation::Export, _) => NOT_PDF_MESSAGE.to_string(),
                (Operation::Submit, _) => ANALYZE_FAILED_MESSAGE.to_string(),
            },
            AppError::File(_) | AppError::Config(_) => match operation {
                Operation::Submit => ANALYZE_FAILED_MESSAGE.to_string(),
                Operation::Export => SAVE_FAILED_MESSAGE.to_string(),
            },
        }
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建无响应错误
    pub fn transport(
        endpoint: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        AppError::Api(ApiError::Transport {
            endpoint: endpoint.into(),
            source: source.into(),
        })
    }

    /// 创建服务端错误
    pub fn server(endpoint: impl Into<String>, status: u16, message: Option<String>) -> Self {
        AppError::Api(ApiError::Server {
            endpoint: endpoint.into(),
            status,
            message,
        })
    }

    /// 创建响应格式错误
    pub fn malformed(endpoint: impl Into<String>, reason: MalformedReason) -> Self {
        AppError::Api(ApiError::Malformed {
            endpoint: endpoint.into(),
            reason,
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_covers_taxonomy() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        assert_eq!(
            AppError::transport("analyze/", io).kind(),
            ErrorKind::Transport
        );
        assert_eq!(
            AppError::server("analyze/", 500, None).kind(),
            ErrorKind::Server
        );
        assert_eq!(
            AppError::malformed("download-pdf/", MalformedReason::EmptyPayload).kind(),
            ErrorKind::MalformedResponse
        );
        assert_eq!(
            AppError::from(ValidationError::NoData).kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn test_server_message_prefers_server_text() {
        let err = AppError::server("download-pdf/", 502, Some("renderer offline".to_string()));
        assert_eq!(err.user_message(Operation::Export), "renderer offline");

        let err = AppError::server("download-pdf/", 502, Some("   ".to_string()));
        assert_eq!(err.user_message(Operation::Export), "Server error: 502");

        let err = AppError::server("analyze/", 500, None);
        assert_eq!(err.user_message(Operation::Submit), "Server error: 500");
    }

    #[test]
    fn test_transport_message_is_fixed() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = AppError::transport("analyze/", io);
        assert_eq!(err.user_message(Operation::Submit), NO_RESPONSE_MESSAGE);
        assert_eq!(err.user_message(Operation::Export), NO_RESPONSE_MESSAGE);
    }

    #[test]
    fn test_malformed_messages_are_operation_specific() {
        let empty = AppError::malformed("download-pdf/", MalformedReason::EmptyPayload);
        assert_eq!(empty.user_message(Operation::Export), EMPTY_PDF_MESSAGE);

        let html = AppError::malformed(
            "download-pdf/",
            MalformedReason::UnexpectedContentType(Some("text/html".to_string())),
        );
        assert_eq!(html.user_message(Operation::Export), NOT_PDF_MESSAGE);

        let bad_json = AppError::malformed("analyze/", MalformedReason::InvalidJson("eof".into()));
        assert_eq!(bad_json.user_message(Operation::Submit), ANALYZE_FAILED_MESSAGE);
    }
}
