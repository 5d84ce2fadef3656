//! 流程状态机
//!
//! ```text
//! Idle --select--> FileSelected --submit--> Submitting --ok--> Resulted --export--> Exporting
//!  ^                  |                        |                 |   ^                  |
//!  +------clear-------+                        |                 |   +----finished------+
//!  +---------------------failed----------------+                 |
//!  +-----------------------------reset---------------------------+
//! ```
//!
//! 没有终止状态，一个会话内可以反复分析。

use std::fmt;

/// 流程状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowState {
    /// 没有选择，也没有结果
    #[default]
    Idle,
    /// 已选择文件
    FileSelected,
    /// 分析请求进行中
    Submitting,
    /// 持有分析结果
    Resulted,
    /// 持有结果且导出请求进行中
    Exporting,
}

/// 触发状态变化的事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowEvent {
    Select,
    Clear,
    Submit,
    SubmitSucceeded,
    SubmitFailed,
    Reset,
    Export,
    ExportFinished,
}

impl WorkflowState {
    /// 查转移表，不允许的转移返回 None
    pub fn next(self, event: WorkflowEvent) -> Option<WorkflowState> {
        use WorkflowEvent as E;
        use WorkflowState as S;

        match (self, event) {
            (S::Idle | S::FileSelected, E::Select) => Some(S::FileSelected),
            (S::Idle | S::FileSelected, E::Clear) => Some(S::Idle),
            (S::FileSelected, E::Submit) => Some(S::Submitting),
            (S::Submitting, E::SubmitSucceeded) => Some(S::Resulted),
            (S::Submitting, E::SubmitFailed) => Some(S::Idle),
            (S::Resulted, E::Reset) => Some(S::Idle),
            (S::Resulted, E::Export) => Some(S::Exporting),
            (S::Exporting, E::ExportFinished) => Some(S::Resulted),
            _ => None,
        }
    }

    /// 是否有网络请求在途
    pub fn is_busy(self) -> bool {
        matches!(self, WorkflowState::Submitting | WorkflowState::Exporting)
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use WorkflowEvent as E;
    use WorkflowState as S;

    #[test]
    fn test_happy_path_cycle() {
        let mut state = S::default();
        for (event, expected) in [
            (E::Select, S::FileSelected),
            (E::Submit, S::Submitting),
            (E::SubmitSucceeded, S::Resulted),
            (E::Export, S::Exporting),
            (E::ExportFinished, S::Resulted),
            (E::Reset, S::Idle),
        ] {
            state = state.next(event).unwrap();
            assert_eq!(state, expected);
        }
    }

    #[test]
    fn test_failure_returns_to_idle() {
        assert_eq!(S::Submitting.next(E::SubmitFailed), Some(S::Idle));
        assert_eq!(S::FileSelected.next(E::Clear), Some(S::Idle));
    }

    #[test]
    fn test_busy_states_reject_overlap() {
        assert_eq!(S::Submitting.next(E::Submit), None);
        assert_eq!(S::Submitting.next(E::Export), None);
        assert_eq!(S::Exporting.next(E::Export), None);
        assert_eq!(S::Exporting.next(E::Submit), None);
        assert_eq!(S::Exporting.next(E::Reset), None);
        assert_eq!(S::Submitting.next(E::Select), None);
    }

    #[test]
    fn test_submit_requires_selection() {
        assert_eq!(S::Idle.next(E::Submit), None);
        assert_eq!(S::Resulted.next(E::Submit), None);
        assert_eq!(S::Idle.next(E::Export), None);
    }

    #[test]
    fn test_flags() {
        assert!(S::Exporting.is_busy());
        assert!(!S::Resulted.is_busy());
    }
}
