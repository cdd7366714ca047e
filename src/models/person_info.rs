//! 结构化人物信息
//!
//! LLM 按 schema 抽取出的结果。模型的输出格式并不稳定（数字写成字符串、
//! 列表写成单个字符串、公司写成纯文本等），这里的反序列化尽量宽松。

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// 过往任职经历
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorRole {
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// 任职时长，例如 "2019-2022" 或 "3 years"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

/// 结构化人物信息，每轮调研整体替换，不做字段级合并
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonInfo {
    #[serde(default, deserialize_with = "de_years")]
    pub years_of_experience: Option<u32>,
    #[serde(default, deserialize_with = "de_opt_text")]
    pub current_company: Option<String>,
    #[serde(default, alias = "role", deserialize_with = "de_opt_text")]
    pub current_role: Option<String>,
    #[serde(default, deserialize_with = "de_prior_roles")]
    pub prior_companies: Vec<PriorRole>,
    #[serde(default, deserialize_with = "de_text_list")]
    pub education: Vec<String>,
    #[serde(default, deserialize_with = "de_text_list")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "de_text_list")]
    pub notable_achievements: Vec<String>,
}

impl PersonInfo {
    /// 返回仍为空的字段名
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.years_of_experience.is_none() {
            missing.push("years_of_experience");
        }
        if self.current_company.is_none() {
            missing.push("current_company");
        }
        if self.current_role.is_none() {
            missing.push("current_role");
        }
        if self.prior_companies.is_empty() {
            missing.push("prior_companies");
        }
        if self.education.is_empty() {
            missing.push("education");
        }
        if self.skills.is_empty() {
            missing.push("skills");
        }
        if self.notable_achievements.is_empty() {
            missing.push("notable_achievements");
        }
        missing
    }
}

/// 模型常用的"未知"占位写法
fn is_placeholder(text: &str) -> bool {
    matches!(
        text.trim().to_ascii_lowercase().as_str(),
        "" | "unknown" | "unclear" | "n/a" | "na" | "none" | "null" | "not found"
    )
}

fn clean_text(text: &str) -> Option<String> {
    if is_placeholder(text) {
        None
    } else {
        Some(text.trim().to_string())
    }
}

fn de_opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => clean_text(&s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn de_years<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let raw = match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.round() as u64)
        }),
        // "12", "12+", "about 12 years"；"since 2015" 这类年份不算
        Value::String(s) => s
            .split(|c: char| !c.is_ascii_digit())
            .find(|part| !part.is_empty())
            .filter(|digits| digits.len() < 4)
            .and_then(|digits| digits.parse().ok()),
        _ => None,
    };
    Ok(raw.and_then(plausible_years))
}

/// 超过职业生涯上限的数字多半是年份或模型胡写
const MAX_YEARS_OF_EXPERIENCE: u64 = 80;

fn plausible_years(years: u64) -> Option<u32> {
    if years > MAX_YEARS_OF_EXPERIENCE {
        return None;
    }
    u32::try_from(years).ok()
}

fn de_text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => clean_text(s),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Value::String(s) => clean_text(&s).into_iter().collect(),
        _ => Vec::new(),
    })
}

fn de_prior_roles<'de, D>(deserializer: D) -> Result<Vec<PriorRole>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let items = match value {
        Value::Array(items) => items,
        Value::String(_) | Value::Object(_) => vec![value],
        _ => return Ok(Vec::new()),
    };
    Ok(items.iter().filter_map(prior_role_from_value).collect())
}

fn prior_role_from_value(value: &Value) -> Option<PriorRole> {
    match value {
        Value::String(s) => clean_text(s).map(|company| PriorRole {
            company,
            role: None,
            duration: None,
        }),
        Value::Object(map) => Some(PriorRole {
            company: pick(map, &["company", "name", "employer", "organization"])?,
            role: pick(map, &["role", "title", "position"]),
            duration: pick(map, &["duration", "dates", "period", "years"]),
        }),
        _ => None,
    }
}

/// 按顺序取第一个非空的字段值
fn pick(map: &serde_json::Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| map.get(*k))
        .find_map(|v| match v {
            Value::String(s) => clean_text(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parses_well_formed_record() {
        let info: PersonInfo = serde_json::from_value(json!({
            "years_of_experience": 12,
            "current_company": "Ferrous Systems",
            "current_role": "Staff Engineer",
            "prior_companies": [
                {"company": "Mozilla", "role": "Engineer", "duration": "2015-2019"}
            ],
            "education": ["BSc Computer Science, TU Berlin"],
            "skills": ["Rust", "Embedded"],
            "notable_achievements": []
        }))
        .unwrap();

        assert_eq!(info.years_of_experience, Some(12));
        assert_eq!(info.prior_companies[0].company, "Mozilla");
        assert_eq!(info.prior_companies[0].duration.as_deref(), Some("2015-2019"));
        assert_eq!(info.missing_fields(), vec!["notable_achievements"]);
    }

    #[test]
    fn test_tolerates_loose_model_output() {
        let info: PersonInfo = serde_json::from_value(json!({
            "years_of_experience": "about 8 years",
            "current_company": "Unknown",
            "role": "CTO",
            "prior_companies": ["Acme Corp", {"name": "Globex", "title": "VP"}],
            "education": "MIT",
            "skills": null
        }))
        .unwrap();

        assert_eq!(info.years_of_experience, Some(8));
        assert_eq!(info.current_company, None);
        assert_eq!(info.current_role.as_deref(), Some("CTO"));
        assert_eq!(info.prior_companies.len(), 2);
        assert_eq!(info.prior_companies[1].role.as_deref(), Some("VP"));
        assert_eq!(info.education, vec!["MIT".to_string()]);
        assert!(info.skills.is_empty());

        let info: PersonInfo =
            serde_json::from_value(json!({"years_of_experience": "since 2015"})).unwrap();
        assert_eq!(info.years_of_experience, None);

        let info: PersonInfo =
            serde_json::from_value(json!({"years_of_experience": 4_294_967_308u64})).unwrap();
        assert_eq!(info.years_of_experience, None);

        let info: PersonInfo =
            serde_json::from_value(json!({"years_of_experience": 2015})).unwrap();
        assert_eq!(info.years_of_experience, None);

        let info: PersonInfo =
            serde_json::from_value(json!({"years_of_experience": 7.6})).unwrap();
        assert_eq!(info.years_of_experience, Some(8));
    }

    #[test]
    fn test_empty_object_is_all_missing() {
        let info: PersonInfo = serde_json::from_str("{}").unwrap();
        assert_eq!(info, PersonInfo::default());
        assert_eq!(info.missing_fields().len(), 7);
    }
}
