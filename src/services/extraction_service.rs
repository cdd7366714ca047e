//! 结构化抽取服务 - 业务能力层
//!
//! 把累计的调研笔记转成 `PersonInfo`

use std::sync::Arc;
use tracing::{debug, warn};

use crate::clients::LlmClient;
use crate::error::{AppError, Result};
use crate::models::{ExtractionSchema, Person, PersonInfo};
use crate::services::prompts;
use crate::utils::{json::parse_json_reply, truncate_text};

/// 结构化抽取服务
pub struct ExtractionService {
    llm: Arc<LlmClient>,
}

impl ExtractionService {
    pub fn new(llm: Arc<LlmClient>) -> Self {
        Self { llm }
    }

    /// 从笔记中抽取结构化信息
    ///
    /// 回复中找不到可用的 JSON 时返回 `LlmError::InvalidJson`
    pub async fn extract(
        &self,
        person: &Person,
        schema: &ExtractionSchema,
        formatted_notes: &str,
    ) -> Result<PersonInfo> {
        let system_message = prompts::extraction_prompt(
            &person.describe(),
            &schema.to_prompt_json(),
            formatted_notes,
        );

        let response = self
            .llm
            .chat(prompts::EXTRACTION_USER_MESSAGE, Some(&system_message))
            .await?;

        let info: PersonInfo = parse_json_reply(&response).ok_or_else(|| {
            warn!("结构化抽取结果无法解析: {}", truncate_text(&response, 200));
            AppError::invalid_json("extraction", truncate_text(&response, 500))
        })?;

        debug!("抽取完成，仍缺失字段: {:?}", info.missing_fields());
        Ok(info)
    }
}
