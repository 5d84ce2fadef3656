//! 报告的临时二进制引用
//!
//! 导出成功后报告字节先登记为一个临时引用，保存动作通过引用读取。
//! 引用在 `TransientBlob` 被丢弃后延迟释放，不会在保存动作开始读取前失效。

use crate::error::{AppError, AppResult, FileError};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

/// 临时引用地址
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobUrl(String);

impl fmt::Display for BlobUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    blobs: HashMap<BlobUrl, Arc<Vec<u8>>>,
}

/// 临时引用登记表
#[derive(Debug, Clone, Default)]
pub struct BlobStore {
    registry: Arc<Mutex<Registry>>,
}

impl BlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记字节并返回引用地址
    pub fn create(&self, bytes: Vec<u8>) -> BlobUrl {
        let mut registry = self.lock();
        registry.next_id += 1;
        let url = BlobUrl(format!("blob:complexity-client/{}", registry.next_id));
        registry.blobs.insert(url.clone(), Arc::new(bytes));
        url
    }

    pub fn resolve(&self, url: &BlobUrl) -> Option<Arc<Vec<u8>>> {
        self.lock().blobs.get(url).cloned()
    }

    /// 释放引用，返回之前是否存在
    pub fn revoke(&self, url: &BlobUrl) -> bool {
        self.lock().blobs.remove(url).is_some()
    }

    /// 当前未释放的引用数
    pub fn live_count(&self) -> usize {
        self.lock().blobs.len()
    }

    /// 登记字节，得到一个带延迟释放的作用域句柄
    pub fn acquire(&self, bytes: Vec<u8>, release_delay: Duration) -> TransientBlob {
        TransientBlob {
            url: self.create(bytes),
            store: self.clone(),
            release_delay,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// 作用域内的临时引用，丢弃时延迟 `release_delay` 释放
#[derive(Debug)]
pub struct TransientBlob {
    store: BlobStore,
    url: BlobUrl,
    release_delay: Duration,
}

impl TransientBlob {
    pub fn url(&self) -> &BlobUrl {
        &self.url
    }

    /// 通过引用读取字节
    pub fn read(&self) -> AppResult<Arc<Vec<u8>>> {
        self.store.resolve(&self.url).ok_or_else(|| {
            AppError::File(FileError::BlobRevoked {
                url: self.url.to_string(),
            })
        })
    }
}

impl Drop for TransientBlob {
    fn drop(&mut self) {
        let store = self.store.clone();
        let url = self.url.clone();
        let delay = self.release_delay;

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    store.revoke(&url);
                    debug!("已释放临时引用 {}", url);
                });
            }
            Err(_) => {
                store.revoke(&url);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_release_is_deferred() {
        let store = BlobStore::new();
        let blob = store.acquire(b"%PDF-1.7".to_vec(), Duration::from_millis(100));
        let url = blob.url().clone();
        assert_eq!(blob.read().unwrap().as_slice(), b"%PDF-1.7");

        drop(blob);
        // 丢弃后仍可读取，直到延迟结束
        assert!(store.resolve(&url).is_some());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(store.resolve(&url).is_some());

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(store.resolve(&url).is_none());
        assert_eq!(store.live_count(), 0);
    }

    #[test]
    fn test_release_without_runtime_is_immediate() {
        let store = BlobStore::new();
        let blob = store.acquire(vec![1, 2, 3], Duration::from_millis(100));
        assert_eq!(store.live_count(), 1);
        drop(blob);
        assert_eq!(store.live_count(), 0);
    }

    #[test]
    fn test_urls_are_unique() {
        let store = BlobStore::new();
        let a = store.create(vec![1]);
        let b = store.create(vec![1]);
        assert_ne!(a, b);
        assert!(store.revoke(&a));
        assert!(!store.revoke(&a));
        assert!(store.resolve(&b).is_some());
    }
}
