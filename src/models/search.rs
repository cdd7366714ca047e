use serde::{Deserialize, Serialize};

/// 单条网页搜索结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub title: String,
    pub url: String,
    /// 搜索引擎摘取的相关片段
    #[serde(default)]
    pub content: String,
    /// 页面原文（可能很长，也可能缺失）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// 搜索 API 的一次响应
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub results: Vec<SearchResult>,
}
