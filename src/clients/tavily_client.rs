/// 网页搜索 API 客户端
///
/// 封装 Tavily 兼容的 `POST /search` 接口
use crate::config::Config;
use crate::error::{ApiError, AppError, Result};
use crate::models::SearchResponse;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// 搜索请求体
#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    max_results: usize,
    include_raw_content: bool,
    topic: &'a str,
    /// 只返回最近若干天内的结果
    #[serde(skip_serializing_if = "Option::is_none")]
    days: Option<u32>,
}

/// 搜索客户端
pub struct TavilyClient {
    http: Client,
    api_key: String,
    api_base_url: String,
    days: Option<u32>,
}

impl TavilyClient {
    /// 创建新的搜索客户端
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| AppError::api_request_failed(&config.tavily_api_base_url, e))?;

        Ok(Self {
            http,
            api_key: config.tavily_api_key.clone(),
            api_base_url: config.tavily_api_base_url.trim_end_matches('/').to_string(),
            days: (config.search_days > 0).then_some(config.search_days),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/search", self.api_base_url)
    }

    /// 执行一次搜索
    ///
    /// # 参数
    /// - `query`: 搜索关键词
    /// - `max_results`: 最多返回条数
    ///
    /// # 返回
    /// 返回搜索 API 的原始响应，失败时不重试
    pub async fn search(&self, query: &str, max_results: usize) -> Result<SearchResponse> {
        let endpoint = self.endpoint();
        debug!("搜索: {} (最多 {} 条)", query, max_results);

        let body = SearchRequest {
            query,
            max_results,
            include_raw_content: true,
            topic: "general",
            days: self.days,
        };

        let response = self
            .http
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(&endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("搜索 API 返回错误 {}: {}", status, body);
            return Err(ApiError::BadResponse {
                endpoint,
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let parsed: SearchResponse = response.json().await.map_err(|e| ApiError::JsonParseFailed {
            source: Box::new(e),
        })?;

        debug!("搜索 '{}' 返回 {} 条结果", query, parsed.results.len());
        Ok(parsed)
    }
}
