//! 调研笔记服务 - 业务能力层
//!
//! 把一轮搜索得到的网页内容整理成自由文本笔记

use std::sync::Arc;
use tracing::debug;

use crate::clients::LlmClient;
use crate::error::Result;
use crate::models::{ExtractionSchema, ResearchRequest};
use crate::services::prompts;

/// 调研笔记服务
pub struct NotesService {
    llm: Arc<LlmClient>,
}

impl NotesService {
    pub fn new(llm: Arc<LlmClient>) -> Self {
        Self { llm }
    }

    /// 根据来源文本整理一轮调研笔记
    pub async fn take_notes(
        &self,
        request: &ResearchRequest,
        schema: &ExtractionSchema,
        sources: &str,
    ) -> Result<String> {
        let prompt = prompts::notes_prompt(
            &request.person.describe(),
            &schema.to_prompt_json(),
            sources,
            request.notes_or_placeholder(),
        );

        let notes = self.llm.chat(&prompt, None).await?;
        debug!("笔记长度: {} 字符", notes.len());
        Ok(notes)
    }
}

/// 把多轮笔记编号拼接成一段文本
pub fn format_all_notes(notes: &[String]) -> String {
    let separator = "=".repeat(60);
    notes
        .iter()
        .enumerate()
        .map(|(i, note)| {
            format!(
                "{sep}\nNote {}:\n{sep}\nNotes from research:\n{}",
                i + 1,
                note,
                sep = separator
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
