//! 从 LLM 回复中提取 JSON
//!
//! 模型经常把 JSON 包在 ```json 代码块里，或者在前后加解释文字。

use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::OnceLock;

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)```(?:json|JSON)?\s*(.*?)```").expect("fence regex is valid")
    })
}

/// 提取回复中的第一个 JSON 对象
pub fn extract_json_object(response: &str) -> Option<Value> {
    let trimmed = response.trim();

    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(trimmed) {
        return Some(value);
    }

    for cap in fence_regex().captures_iter(trimmed) {
        if let Some(body) = cap.get(1) {
            if let Some(value) = first_object(body.as_str()) {
                return Some(value);
            }
        }
    }

    first_object(trimmed)
}

/// 提取并反序列化为指定类型
pub fn parse_json_reply<T: DeserializeOwned>(response: &str) -> Option<T> {
    extract_json_object(response).and_then(|value| serde_json::from_value(value).ok())
}

/// 从每个 `{` 开始尝试解析一个完整对象，忽略其后的文字
fn first_object(text: &str) -> Option<Value> {
    text.match_indices('{').find_map(|(start, _)| {
        let mut stream = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
        match stream.next() {
            Some(Ok(value @ Value::Object(_))) => Some(value),
            _ => None,
        }
    })
}
