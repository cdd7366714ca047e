//! 网页搜索服务 - 业务能力层
//!
//! 负责逐个执行搜索关键词、按 URL 去重，并把结果整理成提示词里的来源文本

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

use crate::clients::TavilyClient;
use crate::error::Result;
use crate::models::SearchResult;

/// 搜索服务
pub struct SearchService {
    client: Arc<TavilyClient>,
    max_search_results: usize,
    max_tokens_per_source: usize,
}

impl SearchService {
    pub fn new(
        client: Arc<TavilyClient>,
        max_search_results: usize,
        max_tokens_per_source: usize,
    ) -> Self {
        Self {
            client,
            max_search_results,
            max_tokens_per_source,
        }
    }

    /// 依次执行所有关键词并合并去重
    ///
    /// 任何一次搜索失败都直接返回错误
    pub async fn search_all(&self, queries: &[String]) -> Result<Vec<SearchResult>> {
        let mut all_results = Vec::new();

        for (i, query) in queries.iter().enumerate() {
            info!("🔍 搜索 {}/{}: {}", i + 1, queries.len(), query);
            let response = self.client.search(query, self.max_search_results).await?;
            all_results.extend(response.results);
        }

        let total = all_results.len();
        let unique = dedupe_by_url(all_results);
        debug!("搜索结果去重: {} → {}", total, unique.len());

        Ok(unique)
    }

    /// 把搜索结果整理成来源文本
    pub fn format_sources(&self, sources: &[SearchResult]) -> String {
        format_sources(sources, self.max_tokens_per_source)
    }
}

/// 按 URL 去重，保留首次出现的结果和原有顺序
pub fn dedupe_by_url(results: Vec<SearchResult>) -> Vec<SearchResult> {
    let mut seen = HashSet::new();
    results
        .into_iter()
        .filter(|r| seen.insert(r.url.clone()))
        .collect()
}

/// 原文按每 token 约 4 个字符截断
fn format_sources(sources: &[SearchResult], max_tokens_per_source: usize) -> String {
    let char_limit = max_tokens_per_source.saturating_mul(4);
    let mut text = String::from("Sources:\n\n");

    for source in sources {
        text.push_str(&format!("Source {}:\n===\n", source.title));
        text.push_str(&format!("URL: {}\n===\n", source.url));
        text.push_str(&format!(
            "Most relevant content from source: {}\n===\n",
            source.content
        ));

        let raw = source.raw_content.as_deref().unwrap_or("");
        if raw.is_empty() {
            debug!("来源没有原文: {}", source.url);
        }
        let raw = if raw.chars().count() > char_limit {
            raw.chars().take(char_limit).collect::<String>() + "... [truncated]"
        } else {
            raw.to_string()
        };
        text.push_str(&format!(
            "Full source content limited to {} tokens: {}\n\n",
            max_tokens_per_source, raw
        ));
    }

    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(url: &str, title: &str, raw: Option<&str>) -> SearchResult {
        SearchResult {
            title: title.to_string(),
            url: url.to_string(),
            content: format!("snippet for {}", title),
            raw_content: raw.map(str::to_string),
            score: None,
        }
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence_and_order() {
        let results = vec![
            result("https://a", "first a", None),
            result("https://b", "b", None),
            result("https://a", "second a", None),
            result("https://c", "c", None),
        ];
        let unique = dedupe_by_url(results);
        let titles: Vec<&str> = unique.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["first a", "b", "c"]);
    }

    #[test]
    fn test_format_sources_truncates_raw_content() {
        let long = "x".repeat(50);
        let text = format_sources(&[result("https://a", "A", Some(&long))], 10);
        assert!(text.starts_with("Sources:"));
        assert!(text.contains(&format!("{}... [truncated]", "x".repeat(40))));
        assert!(!text.contains(&"x".repeat(41)));
    }

    #[test]
    fn test_format_sources_with_huge_budget_keeps_everything() {
        let text = format_sources(&[result("https://a", "A", Some("short body"))], usize::MAX);
        assert!(text.ends_with("short body"));
        assert!(!text.contains("[truncated]"));
    }

    #[test]
    fn test_format_sources_handles_missing_raw_content() {
        let text = format_sources(&[result("https://a", "A", None)], 1000);
        assert!(text.contains("URL: https://a"));
        assert!(text.ends_with("limited to 1000 tokens:"));
    }
}
