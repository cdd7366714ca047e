//! 反思服务 - 业务能力层
//!
//! 判断当前结构化信息是否完整，只给出结论，不决定流程走向

use std::sync::Arc;
use tracing::{debug, warn};

use crate::clients::LlmClient;
use crate::error::{AppError, Result};
use crate::models::{ExtractionSchema, Person, PersonInfo, ReflectionResult};
use crate::services::prompts;
use crate::utils::{json::parse_json_reply, truncate_text};

/// 反思服务
pub struct ReflectionService {
    llm: Arc<LlmClient>,
}

impl ReflectionService {
    pub fn new(llm: Arc<LlmClient>) -> Self {
        Self { llm }
    }

    /// 评估结构化信息的完整度
    pub async fn reflect(
        &self,
        person: &Person,
        schema: &ExtractionSchema,
        info: &PersonInfo,
    ) -> Result<ReflectionResult> {
        let extracted = serde_json::to_string_pretty(info)?;
        let system_message =
            prompts::reflection_prompt(&person.describe(), &schema.to_prompt_json(), &extracted);

        let response = self
            .llm
            .chat(prompts::REFLECTION_USER_MESSAGE, Some(&system_message))
            .await?;

        let reflection: ReflectionResult = parse_json_reply(&response).ok_or_else(|| {
            warn!("反思结果无法解析: {}", truncate_text(&response, 200));
            AppError::invalid_json("reflection", truncate_text(&response, 500))
        })?;

        debug!(
            "反思结论: satisfactory={}, confidence={:.2}, 缺失 {} 项",
            reflection.is_satisfactory,
            reflection.confidence_score,
            reflection.missing_information.len()
        );
        Ok(reflection)
    }
}
