//! 分析结果模型
//!
//! 远程分析服务的响应不做形状假设，`AnalysisResult::from_json` 是一个全函数：
//! 任何 JSON 值都能得到结果，缺失或类型不对的字段使用默认值。

use serde::Serialize;
use serde_json::{Map, Value};

/// 未提供时间/空间复杂度时的约定值
pub const DEFAULT_COMPLEXITY_LABEL: &str = "O(1)";

/// 单个函数的分析指标
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionMetric {
    pub name: String,
    pub complexity: u32,
    #[serde(rename = "time_complexity", skip_serializing_if = "Option::is_none")]
    pub time_complexity: Option<String>,
    #[serde(rename = "space_complexity", skip_serializing_if = "Option::is_none")]
    pub space_complexity: Option<String>,
    pub issues: Vec<String>,
}

impl FunctionMetric {
    /// 创建没有复杂度标签和建议的函数指标
    pub fn new(name: impl Into<String>, complexity: u32) -> Self {
        Self {
            name: name.into(),
            complexity,
            time_complexity: None,
            space_complexity: None,
            issues: Vec::new(),
        }
    }

    /// 时间复杂度标签，缺失时为 "O(1)"
    pub fn time_label(&self) -> &str {
        self.time_complexity
            .as_deref()
            .unwrap_or(DEFAULT_COMPLEXITY_LABEL)
    }

    /// 空间复杂度标签，缺失时为 "O(1)"
    pub fn space_label(&self) -> &str {
        self.space_complexity
            .as_deref()
            .unwrap_or(DEFAULT_COMPLEXITY_LABEL)
    }

    fn from_json(value: &Value) -> Self {
        Self {
            name: value
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            complexity: value
                .get("complexity")
                .map(read_count)
                .unwrap_or(0)
                .min(u64::from(u32::MAX)) as u32,
            time_complexity: value
                .get("time_complexity")
                .and_then(Value::as_str)
                .map(str::to_string),
            space_complexity: value
                .get("space_complexity")
                .and_then(Value::as_str)
                .map(str::to_string),
            issues: value
                .get("issues")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

/// 服务端统计的复杂度分桶
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisSummary {
    pub simple: u64,
    pub moderate: u64,
    pub complex: u64,
}

impl AnalysisSummary {
    /// 三个分桶之和，溢出时饱和在 u64::MAX
    pub fn total(&self) -> u64 {
        self.simple
            .saturating_add(self.moderate)
            .saturating_add(self.complex)
    }

    fn from_json(value: Option<&Value>) -> Self {
        let count = |key: &str| {
            value
                .and_then(|v| v.get(key))
                .map(read_count)
                .unwrap_or(0)
        };
        Self {
            simple: count("simple"),
            moderate: count("moderate"),
            complex: count("complex"),
        }
    }
}

/// 一次成功提交的分析结果
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    /// 服务端返回的文件名，非字符串时为 None
    pub file_name: Option<String>,
    pub summary: AnalysisSummary,
    pub functions: Vec<FunctionMetric>,
    /// 原始响应中的全部字段，导出时原样透传
    raw: Map<String, Value>,
}

impl AnalysisResult {
    /// 从任意 JSON 值构建结果
    pub fn from_json(value: Value) -> Self {
        let raw = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        let file_name = raw
            .get("file_name")
            .and_then(Value::as_str)
            .map(str::to_string);
        let summary = AnalysisSummary::from_json(raw.get("summary"));
        let functions = raw
            .get("functions_detail")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(FunctionMetric::from_json).collect())
            .unwrap_or_default();

        Self {
            file_name,
            summary,
            functions,
            raw,
        }
    }

    /// 服务端分桶总数是否与函数数量一致（不一致时仍可正常展示）
    pub fn summary_matches_functions(&self) -> bool {
        self.summary.total() == self.functions.len() as u64
    }

    /// 构建报告请求体
    ///
    /// 保留原始响应的所有字段，再写入基础文件名和规范化后的函数列表、分桶
    pub fn to_report_payload(&self, base_name: &str) -> Value {
        let mut payload = self.raw.clone();
        payload.insert("file_name".to_string(), Value::String(base_name.to_string()));
        payload.insert(
            "functions_detail".to_string(),
            serde_json::to_value(&self.functions).unwrap_or(Value::Array(Vec::new())),
        );
        payload.insert(
            "summary".to_string(),
            serde_json::to_value(self.summary).unwrap_or(Value::Object(Map::new())),
        );
        Value::Object(payload)
    }
}

/// 读取非负整数，负数、非数字均视为 0
fn read_count(value: &Value) -> u64 {
    if let Some(n) = value.as_u64() {
        return n;
    }
    match value.as_f64() {
        Some(f) if f.is_finite() && f > 0.0 => f as u64,
        _ => 0,
    }
}
