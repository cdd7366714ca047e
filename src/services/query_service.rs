//! 搜索关键词生成 - 业务能力层
//!
//! 只负责"根据人物信息写出搜索关键词"，不关心流程

use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::clients::LlmClient;
use crate::error::Result;
use crate::models::{ExtractionSchema, ResearchRequest};
use crate::services::prompts;

#[derive(Debug, Deserialize)]
struct Queries {
    #[serde(default)]
    queries: Vec<String>,
}

/// 搜索关键词生成服务
pub struct QueryService {
    llm: Arc<LlmClient>,
    max_search_queries: usize,
}

impl QueryService {
    pub fn new(llm: Arc<LlmClient>, max_search_queries: usize) -> Self {
        Self {
            llm,
            max_search_queries,
        }
    }

    /// 生成搜索关键词
    ///
    /// # 参数
    /// - `request`: 调研请求（人物 + 用户备注）
    /// - `schema`: 抽取 schema
    /// - `missing_information`: 上一轮反思指出的缺失信息，首轮为空
    ///
    /// # 返回
    /// 去重后最多 `max_search_queries` 个关键词；模型回复无法解析时退回到基于人物信息的单个关键词
    pub async fn generate_queries(
        &self,
        request: &ResearchRequest,
        schema: &ExtractionSchema,
        missing_information: &[String],
    ) -> Result<Vec<String>> {
        let system_message = prompts::query_writer_prompt(
            &request.person.describe(),
            &schema.to_prompt_json(),
            request.notes_or_placeholder(),
            self.max_search_queries,
            missing_information,
        );

        let response = self
            .llm
            .chat(prompts::QUERY_WRITER_USER_MESSAGE, Some(&system_message))
            .await?;

        let queries = match crate::utils::json::parse_json_reply::<Queries>(&response) {
            Some(parsed) => cap_queries(parsed.queries, self.max_search_queries),
            None => Vec::new(),
        };

        if queries.is_empty() {
            warn!(
                "无法从 LLM 回复中解析出搜索关键词，使用默认关键词: {}",
                crate::utils::truncate_text(&response, 120)
            );
            return Ok(vec![fallback_query(request)]);
        }

        debug!("生成 {} 个搜索关键词: {:?}", queries.len(), queries);
        Ok(queries)
    }
}

/// 去掉空白和重复项，并截断到上限
pub fn cap_queries(queries: Vec<String>, max: usize) -> Vec<String> {
    if max == 0 {
        return Vec::new();
    }
    let mut kept: Vec<String> = Vec::new();
    for query in queries {
        let query = query.trim().to_string();
        if query.is_empty() || kept.iter().any(|q| q.eq_ignore_ascii_case(&query)) {
            continue;
        }
        kept.push(query);
        if kept.len() == max {
            break;
        }
    }
    kept
}

/// 由已知人物信息拼出的兜底关键词
pub fn fallback_query(request: &ResearchRequest) -> String {
    let person = &request.person;
    [
        person.name.as_deref(),
        person.company.as_deref(),
        person.role.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .chain(std::iter::once(person.email.as_str()))
    .collect::<Vec<_>>()
    .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Person;

    #[test]
    fn test_cap_queries_dedupes_and_limits() {
        let queries = vec![
            "Ada Lovelace".to_string(),
            "  ".to_string(),
            "ada lovelace".to_string(),
            "Ada Lovelace Analytical Engines".to_string(),
            "Ada Lovelace LinkedIn".to_string(),
        ];
        assert_eq!(
            cap_queries(queries, 2),
            vec!["Ada Lovelace", "Ada Lovelace Analytical Engines"]
        );
    }

    #[test]
    fn test_cap_queries_zero_limit_keeps_nothing() {
        let queries = vec!["Ada Lovelace".to_string(), "Ada Lovelace CV".to_string()];
        assert!(cap_queries(queries, 0).is_empty());
    }

    #[test]
    fn test_fallback_query_uses_known_fields() {
        let request = ResearchRequest::new(
            Person::new("ada@example.com")
                .with_name("Ada Lovelace")
                .with_company("Analytical Engines"),
        );
        assert_eq!(
            fallback_query(&request),
            "Ada Lovelace Analytical Engines ada@example.com"
        );

        let bare = ResearchRequest::new(Person::new("x@example.com"));
        assert_eq!(fallback_query(&bare), "x@example.com");
    }
}
