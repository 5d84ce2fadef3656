//! 待分析的源文件

use crate::error::{AppError, AppResult};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 文件内容句柄
///
/// 选择文件时不读取内容，真正的读取推迟到提交时
#[derive(Clone)]
pub enum FileContent {
    /// 磁盘上的文件
    Path(PathBuf),
    /// 已在内存中的字节（例如拖放进来的数据）
    Bytes(Arc<Vec<u8>>),
}

impl FileContent {
    /// 读取原始字节
    pub async fn read(&self) -> AppResult<Vec<u8>> {
        match self {
            FileContent::Path(path) => tokio::fs::read(path)
                .await
                .map_err(|e| AppError::file_read_failed(path.display().to_string(), e)),
            FileContent::Bytes(bytes) => Ok(bytes.as_ref().clone()),
        }
    }
}

impl fmt::Debug for FileContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileContent::Path(path) => write!(f, "Path({})", path.display()),
            FileContent::Bytes(bytes) => write!(f, "Bytes({} bytes)", bytes.len()),
        }
    }
}

/// 用户选中的文件
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub size_bytes: u64,
    pub content: FileContent,
}

impl SelectedFile {
    /// 从内存字节创建
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size_bytes: bytes.len() as u64,
            content: FileContent::Bytes(Arc::new(bytes)),
        }
    }

    /// 从磁盘路径创建，只读取元数据
    pub async fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            size_bytes: metadata.len(),
            content: FileContent::Path(path.to_path_buf()),
        })
    }

    /// 以 KB 显示的文件大小
    pub fn size_kb(&self) -> String {
        format!("{:.2} KB", self.size_bytes as f64 / 1024.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_from_bytes_reads_back() {
        let file = SelectedFile::from_bytes("a.cpp", b"int main() {}".to_vec());
        assert_eq!(file.size_bytes, 13);
        assert_eq!(file.content.read().await.unwrap(), b"int main() {}".to_vec());
    }

    #[tokio::test]
    async fn test_from_path_defers_read() {
        let dir = std::env::temp_dir().join("complexity_client_selected_file");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("sample.hpp");
        tokio::fs::write(&path, vec![b'x'; 120]).await.unwrap();

        let file = SelectedFile::from_path(&path).await.unwrap();
        assert_eq!(file.name, "sample.hpp");
        assert_eq!(file.size_bytes, 120);

        // 删除后再读取才会失败
        tokio::fs::remove_file(&path).await.unwrap();
        assert!(matches!(
            file.content.read().await,
            Err(AppError::File(_))
        ));
    }

    #[test]
    fn test_size_kb() {
        let file = SelectedFile::from_bytes("big.cpp", vec![0; 2048]);
        assert_eq!(file.size_kb(), "2.00 KB");
    }
}
