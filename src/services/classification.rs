//! 分级规则 - 业务能力层
//!
//! 纯函数，把复杂度分数和复杂度标签映射为展示用的等级。
//! 三种分级互相独立：圈复杂度低的函数仍可能是高时间复杂度。

use std::fmt;

/// 圈复杂度等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Simple,
    Moderate,
    Complex,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Simple, Tier::Moderate, Tier::Complex];

    /// 阈值说明
    pub fn range_label(self) -> &'static str {
        match self {
            Tier::Simple => "Complexity ≤ 3",
            Tier::Moderate => "Complexity 4-6",
            Tier::Complex => "Complexity ≥ 7",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Tier::Simple => "Simple",
            Tier::Moderate => "Moderate",
            Tier::Complex => "Complex",
        };
        f.write_str(text)
    }
}

/// 时间/空间复杂度严重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        };
        f.write_str(text)
    }
}

const SIMPLE_MAX: i64 = 3;
const MODERATE_MAX: i64 = 6;

/// 圈复杂度 → 等级：≤3 Simple，4..=6 Moderate，>6 Complex
pub fn tier(complexity: i64) -> Tier {
    if complexity <= SIMPLE_MAX {
        Tier::Simple
    } else if complexity <= MODERATE_MAX {
        Tier::Moderate
    } else {
        Tier::Complex
    }
}

/// 时间复杂度标签 → 严重程度
///
/// 先匹配更差的模式，所以同时包含 "O(n)" 和 "O(n^2)" 的标签是 High
pub fn time_severity(label: Option<&str>) -> Severity {
    let label = label.unwrap_or(crate::models::DEFAULT_COMPLEXITY_LABEL);
    if label.contains("O(n^2)") || label.contains("O(2^n)") {
        Severity::High
    } else if label.contains("O(n)") {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// 空间复杂度标签 → 严重程度
///
/// 两条规则都没命中的标签（如 "O(log n)"）为 Medium
pub fn space_severity(label: Option<&str>) -> Severity {
    let label = label.unwrap_or(crate::models::DEFAULT_COMPLEXITY_LABEL);
    if label.contains("O(n)") || label.contains("O(n^2)") {
        Severity::High
    } else if label.contains("O(1)") {
        Severity::Low
    } else {
        Severity::Medium
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(tier(i64::MIN), Tier::Simple);
        assert_eq!(tier(0), Tier::Simple);
        assert_eq!(tier(3), Tier::Simple);
        assert_eq!(tier(4), Tier::Moderate);
        assert_eq!(tier(6), Tier::Moderate);
        assert_eq!(tier(7), Tier::Complex);
        assert_eq!(tier(i64::MAX), Tier::Complex);
    }

    #[test]
    fn test_tier_is_total_over_range() {
        for c in -50..=50 {
            let t = tier(c);
            assert!(Tier::ALL.contains(&t));
        }
    }

    #[test]
    fn test_time_worse_patterns_win() {
        assert_eq!(time_severity(Some("O(n^2)")), Severity::High);
        assert_eq!(time_severity(Some("O(2^n)")), Severity::High);
        assert_eq!(time_severity(Some("O(n) then O(n^2)")), Severity::High);
        assert_eq!(time_severity(Some("O(n) + O(2^n)")), Severity::High);
        assert_eq!(time_severity(Some("O(n)")), Severity::Medium);
        assert_eq!(time_severity(Some("O(log n)")), Severity::Low);
        assert_eq!(time_severity(Some("O(1)")), Severity::Low);
    }

    #[test]
    fn test_space_rules() {
        assert_eq!(space_severity(Some("O(n)")), Severity::High);
        assert_eq!(space_severity(Some("O(n^2)")), Severity::High);
        assert_eq!(space_severity(Some("O(1)")), Severity::Low);
        assert_eq!(space_severity(Some("O(log n)")), Severity::Medium);
        assert_eq!(space_severity(Some("")), Severity::Medium);
    }

    #[test]
    fn test_absent_label_equals_constant() {
        assert_eq!(time_severity(None), time_severity(Some("O(1)")));
        assert_eq!(space_severity(None), space_severity(Some("O(1)")));
        assert_eq!(time_severity(None), Severity::Low);
        assert_eq!(space_severity(None), Severity::Low);
    }

    #[test]
    fn test_classifications_independent() {
        // 圈复杂度低但时间复杂度高
        assert_eq!(tier(1), Tier::Simple);
        assert_eq!(time_severity(Some("O(2^n)")), Severity::High);
        assert_eq!(space_severity(Some("O(2^n)")), Severity::Medium);
    }
}
