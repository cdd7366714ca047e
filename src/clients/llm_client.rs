//! LLM API 客户端
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点和模型
//! - 兼容 OpenAI API 的服务（如 Azure、OpenRouter、本地网关等）

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use tracing::{debug, warn};

use crate::clients::rate_limiter::RateLimiter;
use crate::config::Config;
use crate::error::{AppError, LlmError, Result};

/// LLM 客户端
///
/// 只负责把一条系统消息 + 一条用户消息发给模型并取回文本，
/// 不关心提示词内容，也不做重试。所有调用先经过共享的限速器。
pub struct LlmClient {
    client: Client<OpenAIConfig>,
    model_name: String,
    max_tokens: u32,
    rate_limiter: RateLimiter,
}

impl LlmClient {
    /// 创建新的 LLM 客户端
    pub fn new(config: &Config) -> Self {
        // 配置 OpenAI 客户端（兼容 OpenAI API 的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
            model_name: config.llm_model_name.clone(),
            max_tokens: 2048,
            rate_limiter: RateLimiter::new(config.llm_requests_per_second, config.llm_max_burst),
        }
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// 发送聊天请求
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容
    /// - `system_message`: 系统消息（可选）
    ///
    /// # 返回
    /// 返回 LLM 的响应内容（已去除首尾空白）
    pub async fn chat(&self, user_message: &str, system_message: Option<&str>) -> Result<String> {
        debug!("调用 LLM API，模型: {}", self.model_name);
        debug!("用户消息长度: {} 字符", user_message.len());

        let mut messages = Vec::with_capacity(2);

        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()
                .map_err(|e| AppError::llm_api_failed(&self.model_name, e))?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(user_message)
            .build()
            .map_err(|e| AppError::llm_api_failed(&self.model_name, e))?;
        messages.push(ChatCompletionRequestMessage::User(user_msg));

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .temperature(0.0)
            .max_tokens(self.max_tokens)
            .build()
            .map_err(|e| AppError::llm_api_failed(&self.model_name, e))?;

        self.rate_limiter.acquire().await;
        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            AppError::llm_api_failed(&self.model_name, e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| LlmError::EmptyContent {
                model: self.model_name.clone(),
            })?;

        Ok(content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base: &str) -> Config {
        Config {
            llm_api_key: "sk-test".to_string(),
            llm_api_base_url: base.to_string(),
            llm_model_name: "test-model".to_string(),
            llm_requests_per_second: 0.0,
            ..Config::default()
        }
    }

    fn completion(content: &str) -> serde_json::Value {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1_700_000_000u32,
            "model": "test-model",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        })
    }

    #[tokio::test]
    async fn test_chat_returns_trimmed_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("  hello \n")))
            .expect(1)
            .mount(&server)
            .await;

        let client = LlmClient::new(&test_config(&server.uri()));
        let reply = client.chat("hi", Some("be brief")).await.unwrap();
        assert_eq!(reply, "hello");
    }

    #[tokio::test]
    async fn test_calls_beyond_burst_are_spaced_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
            .expect(3)
            .mount(&server)
            .await;

        let config = Config {
            llm_requests_per_second: 10.0,
            llm_max_burst: 1,
            ..test_config(&server.uri())
        };
        let client = LlmClient::new(&config);

        let start = std::time::Instant::now();
        for _ in 0..3 {
            client.chat("hi", None).await.unwrap();
        }
        // 第一次用掉突发额度，后两次各等约 100ms
        assert!(start.elapsed() >= std::time::Duration::from_millis(180));
    }

    #[tokio::test]
    async fn test_blank_content_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("   ")))
            .mount(&server)
            .await;

        let client = LlmClient::new(&test_config(&server.uri()));
        let err = client.chat("hi", None).await.unwrap_err();
        assert!(matches!(err, AppError::Llm(LlmError::EmptyContent { .. })));
    }
}
