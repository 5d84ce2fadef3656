//! 提示消息通道 - 业务能力层
//!
//! 任何时刻只有一条提示。新提示立即替换旧提示并重新计时；
//! 计时器到期时用递增的 token 判断自己是否已经过期，
//! 避免旧计时器清掉新提示。

use crate::infrastructure::Liveness;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, warn};

/// 提示类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// 当前提示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub visible: bool,
}

impl Notification {
    fn hidden(kind: NotificationKind) -> Self {
        Self {
            message: String::new(),
            kind,
            visible: false,
        }
    }
}

#[derive(Debug)]
struct Slot {
    current: Notification,
    token: u64,
}

/// 提示消息通道
///
/// 由控制器持有，对外只暴露 notify / clear
#[derive(Debug, Clone)]
pub struct NotificationChannel {
    slot: Arc<Mutex<Slot>>,
    dwell: Duration,
    liveness: Liveness,
}

impl NotificationChannel {
    pub fn new(dwell: Duration, liveness: Liveness) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot {
                current: Notification::hidden(NotificationKind::Success),
                token: 0,
            })),
            dwell,
            liveness,
        }
    }

    /// 显示一条提示并重新开始计时
    pub fn notify(&self, message: impl Into<String>, kind: NotificationKind) {
        if !self.liveness.is_alive() {
            return;
        }

        let message = message.into();
        let token = {
            let mut slot = self.lock();
            slot.token += 1;
            slot.current = Notification {
                message: message.clone(),
                kind,
                visible: true,
            };
            slot.token
        };
        debug!("提示 #{} ({:?}): {}", token, kind, message);

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!("没有运行中的 tokio runtime，提示 #{} 不会自动消失", token);
            return;
        };

        let slot = Arc::clone(&self.slot);
        let liveness = self.liveness.clone();
        let dwell = self.dwell;
        handle.spawn(async move {
            tokio::time::sleep(dwell).await;
            if !liveness.is_alive() {
                return;
            }
            let mut slot = slot.lock().unwrap_or_else(|e| e.into_inner());
            if slot.token == token {
                let kind = slot.current.kind;
                slot.current = Notification::hidden(kind);
            }
        });
    }

    /// 立即隐藏当前提示，同时让所有在途计时器失效
    pub fn clear(&self) {
        if !self.liveness.is_alive() {
            return;
        }
        let mut slot = self.lock();
        slot.token += 1;
        let kind = slot.current.kind;
        slot.current = Notification::hidden(kind);
    }

    /// 当前提示的快照
    pub fn current(&self) -> Notification {
        self.lock().current.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    fn channel() -> (NotificationChannel, Liveness) {
        let liveness = Liveness::new();
        (
            NotificationChannel::new(Duration::from_millis(3000), liveness.clone()),
            liveness,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_notification_expires_after_dwell() {
        let (channel, _liveness) = channel();
        channel.notify("Analysis completed successfully!", NotificationKind::Success);

        sleep(Duration::from_millis(2999)).await;
        assert!(channel.current().visible);

        sleep(Duration::from_millis(2)).await;
        let current = channel.current();
        assert!(!current.visible);
        assert_eq!(current.kind, NotificationKind::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_timer_does_not_clear_newer_notification() {
        let (channel, _liveness) = channel();
        channel.notify("first", NotificationKind::Success);

        sleep(Duration::from_millis(2000)).await;
        channel.notify("second", NotificationKind::Error);

        // 第一条的计时器在 3000ms 到期
        sleep(Duration::from_millis(1500)).await;
        let current = channel.current();
        assert!(current.visible);
        assert_eq!(current.message, "second");
        assert_eq!(current.kind, NotificationKind::Error);

        // 第二条在 5000ms 到期
        sleep(Duration::from_millis(1600)).await;
        assert!(!channel.current().visible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_freezes_channel() {
        let (channel, liveness) = channel();
        channel.notify("pending", NotificationKind::Success);
        liveness.shut_down();

        sleep(Duration::from_millis(3100)).await;
        assert_eq!(channel.current().message, "pending");

        channel.notify("ignored", NotificationKind::Error);
        assert_eq!(channel.current().message, "pending");
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_hides_immediately() {
        let (channel, _liveness) = channel();
        channel.notify("bye", NotificationKind::Error);
        channel.clear();
        assert!(!channel.current().visible);

        channel.notify("again", NotificationKind::Success);
        sleep(Duration::from_millis(100)).await;
        assert_eq!(channel.current().message, "again");
    }

    #[test]
    fn test_notify_without_runtime_still_shows() {
        let (channel, _liveness) = channel();
        channel.notify("no runtime", NotificationKind::Success);
        assert!(channel.current().visible);
    }
}
