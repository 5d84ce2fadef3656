//! 存活标记
//!
//! 控制器销毁后，仍在途中的网络响应和计时器都必须被丢弃。
//! 这个标记由控制器持有并显式传给各组件，在响应到达时检查。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Liveness {
    alive: Arc<AtomicBool>,
}

impl Liveness {
    pub fn new() -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// 标记为已销毁，不可恢复
    pub fn shut_down(&self) {
        self.alive.store(false, Ordering::Release);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let liveness = Liveness::new();
        let handle = liveness.clone();
        assert!(handle.is_alive());

        liveness.shut_down();
        assert!(!handle.is_alive());
    }
}
