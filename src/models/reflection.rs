use serde::{Deserialize, Deserializer, Serialize};

/// 反思步骤的结论：当前结构化信息是否足够完整
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReflectionResult {
    pub is_satisfactory: bool,
    #[serde(default)]
    pub missing_information: Vec<String>,
    /// 建议下一轮使用的搜索关键词
    #[serde(default, alias = "search_queries")]
    pub additional_search_suggestions: Vec<String>,
    #[serde(default)]
    pub reasoning: String,
    /// 0-1 之间的置信度，超出范围时截断
    #[serde(default, deserialize_with = "de_confidence")]
    pub confidence_score: f64,
}

impl ReflectionResult {
    /// 未执行反思时的占位结果
    pub fn pending() -> Self {
        Self {
            is_satisfactory: false,
            missing_information: Vec::new(),
            additional_search_suggestions: Vec::new(),
            reasoning: String::new(),
            confidence_score: 0.0,
        }
    }
}

fn de_confidence<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0);
    // 有的模型会给 0-10 或 0-100 的分数
    let normalized = if raw > 10.0 {
        raw / 100.0
    } else if raw > 1.0 {
        raw / 10.0
    } else {
        raw
    };
    Ok(normalized.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_is_normalized() {
        let r: ReflectionResult =
            serde_json::from_str(r#"{"is_satisfactory": true, "confidence_score": 85}"#).unwrap();
        assert!((r.confidence_score - 0.85).abs() < 1e-9);

        let r: ReflectionResult =
            serde_json::from_str(r#"{"is_satisfactory": true, "confidence_score": 7}"#).unwrap();
        assert!((r.confidence_score - 0.7).abs() < 1e-9);

        let r: ReflectionResult =
            serde_json::from_str(r#"{"is_satisfactory": false, "confidence_score": -1}"#).unwrap();
        assert_eq!(r.confidence_score, 0.0);
    }

    #[test]
    fn test_missing_lists_default_to_empty() {
        let r: ReflectionResult =
            serde_json::from_str(r#"{"is_satisfactory": false, "reasoning": "no dates"}"#).unwrap();
        assert!(r.missing_information.is_empty());
        assert!(r.additional_search_suggestions.is_empty());
        assert_eq!(r.reasoning, "no dates");
    }
}
