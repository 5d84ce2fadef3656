//! 报告保存 - 基础设施层
//!
//! 相当于浏览器里的"另存为"动作：通过临时引用读取字节并落盘。

use crate::error::{AppError, AppResult};
use crate::infrastructure::blob::TransientBlob;
use std::future::Future;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::info;

/// 保存动作
pub trait ReportSaver: Send + Sync {
    /// 以建议的文件名保存，返回实际保存位置
    fn save(
        &self,
        blob: &TransientBlob,
        file_name: &str,
    ) -> impl Future<Output = AppResult<PathBuf>> + Send;
}

/// 保存到指定目录
pub struct DirectorySaver {
    dir: PathBuf,
}

impl DirectorySaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ReportSaver for DirectorySaver {
    async fn save(&self, blob: &TransientBlob, file_name: &str) -> AppResult<PathBuf> {
        let bytes = blob.read()?;

        // 只接受单个普通路径分量，保证写入位置在保存目录内
        let mut components = Path::new(file_name).components();
        let name = match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => name,
            _ => {
                return Err(AppError::file_write_failed(
                    file_name,
                    io::Error::new(io::ErrorKind::InvalidInput, "文件名不能包含目录"),
                ))
            }
        };
        let path = self.dir.join(name);

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::file_write_failed(self.dir.display().to_string(), e))?;
        tokio::fs::write(&path, bytes.as_slice())
            .await
            .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;

        info!("💾 报告已保存: {} ({} 字节)", path.display(), bytes.len());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::BlobStore;
    use std::time::Duration;

    #[tokio::test]
    async fn test_saves_into_directory() {
        let dir = std::env::temp_dir().join("complexity_client_saver_test");
        let saver = DirectorySaver::new(&dir);
        let store = BlobStore::new();
        let blob = store.acquire(b"%PDF-1.4 report".to_vec(), Duration::from_millis(100));

        let path = saver.save(&blob, "a_analysis.pdf").await.unwrap();
        assert_eq!(path, dir.join("a_analysis.pdf"));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"%PDF-1.4 report".to_vec());
    }

    #[tokio::test]
    async fn test_rejects_names_outside_directory() {
        let dir = std::env::temp_dir().join("complexity_client_saver_escape");
        let saver = DirectorySaver::new(&dir);
        let store = BlobStore::new();
        let blob = store.acquire(b"%PDF".to_vec(), Duration::from_millis(100));

        for name in [
            "/tmp/escape_analysis.pdf",
            "../escape_analysis.pdf",
            "nested/escape_analysis.pdf",
            "..",
        ] {
            assert!(matches!(
                saver.save(&blob, name).await,
                Err(AppError::File(_))
            ));
        }
        assert!(!std::env::temp_dir().join("escape_analysis.pdf").exists());
    }

    #[tokio::test]
    async fn test_revoked_blob_fails() {
        let saver = DirectorySaver::new(std::env::temp_dir());
        let store = BlobStore::new();
        let blob = store.acquire(vec![1], Duration::from_millis(100));
        store.revoke(blob.url());

        assert!(matches!(
            saver.save(&blob, "gone.pdf").await,
            Err(AppError::File(_))
        ));
    }
}
