//! 结果展示
//!
//! 把分析结果整理为汇总卡片和逐函数的行，逐行分级在本地独立计算，
//! 与服务端给出的汇总分桶可以不一致。

use crate::models::{AnalysisResult, FunctionMetric};
use crate::services::classification::{self, Severity, Tier};
use std::fmt;
use tracing::warn;

/// 汇总卡片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryCard {
    pub tier: Tier,
    pub count: u64,
}

/// 单个函数的展示行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionRow {
    pub name: String,
    pub complexity: u32,
    pub tier: Tier,
    pub time_label: String,
    pub time_severity: Severity,
    pub space_label: String,
    pub space_severity: Severity,
    pub issues: Vec<String>,
}

impl From<&FunctionMetric> for FunctionRow {
    fn from(metric: &FunctionMetric) -> Self {
        Self {
            name: metric.name.clone(),
            complexity: metric.complexity,
            tier: classification::tier(i64::from(metric.complexity)),
            time_label: metric.time_label().to_string(),
            time_severity: classification::time_severity(metric.time_complexity.as_deref()),
            space_label: metric.space_label().to_string(),
            space_severity: classification::space_severity(metric.space_complexity.as_deref()),
            issues: metric.issues.clone(),
        }
    }
}

/// 分析结果视图
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub file_name: String,
    pub cards: Vec<SummaryCard>,
    pub rows: Vec<FunctionRow>,
}

impl ResultView {
    pub fn new(result: &AnalysisResult) -> Self {
        if !result.summary_matches_functions() {
            warn!(
                "⚠️ 汇总分桶合计 {} 与函数数量 {} 不一致",
                result.summary.total(),
                result.functions.len()
            );
        }

        let cards = Tier::ALL
            .iter()
            .map(|&tier| SummaryCard {
                tier,
                count: match tier {
                    Tier::Simple => result.summary.simple,
                    Tier::Moderate => result.summary.moderate,
                    Tier::Complex => result.summary.complex,
                },
            })
            .collect();

        Self {
            file_name: result.file_name.clone().unwrap_or_default(),
            cards,
            rows: result.functions.iter().map(FunctionRow::from).collect(),
        }
    }

    /// 本地逐行分级得到的某等级函数数量
    pub fn row_count(&self, tier: Tier) -> usize {
        self.rows.iter().filter(|row| row.tier == tier).count()
    }
}

impl fmt::Display for ResultView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Analysis Results: {}", self.file_name)?;
        for card in &self.cards {
            writeln!(
                f,
                "  {:<9} {:>4}  ({})",
                card.tier.to_string(),
                card.count,
                card.tier.range_label()
            )?;
        }
        writeln!(f, "{}", "─".repeat(60))?;
        for row in &self.rows {
            writeln!(
                f,
                "{:<28} {:<9} ({:>2})  time {} [{}]  space {} [{}]",
                row.name,
                row.tier.to_string(),
                row.complexity,
                row.time_label,
                row.time_severity,
                row.space_label,
                row.space_severity
            )?;
            if row.issues.is_empty() {
                writeln!(f, "    No issues")?;
            }
            for issue in &row.issues {
                writeln!(f, "    - {}", issue)?;
            }
        }
        Ok(())
    }
}
