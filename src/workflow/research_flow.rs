//! 人物调研流程 - 流程层
//!
//! 核心职责：定义"调研一个人"的完整流程
//!
//! 流程顺序：
//! 1. 生成搜索关键词
//! 2. 逐个搜索 → 整理笔记
//! 3. 结构化抽取（整体替换上一轮结果）
//! 4. 反思：信息完整则结束，否则在重试次数内回到第 1 步
//!
//! 抽取最多执行 `max_reflection_steps + 1` 次。

use std::sync::Arc;
use tracing::{info, warn};

use crate::clients::{LlmClient, TavilyClient};
use crate::config::Config;
use crate::error::Result;
use crate::models::{ExtractionSchema, ResearchOutput, ResearchRequest};
use crate::services::query_service::cap_queries;
use crate::services::{
    format_all_notes, ExtractionService, NotesService, QueryService, ReflectionService,
    SearchService,
};
use crate::utils::truncate_text;
use crate::workflow::research_ctx::{route_after_reflection, ResearchState, Route};

/// 人物调研流程
///
/// - 编排完整的调研流程
/// - 决定何时重新调研、何时结束
/// - 只依赖业务能力（services），不直接调用外部 API
pub struct ResearchFlow {
    query_service: QueryService,
    search_service: SearchService,
    notes_service: NotesService,
    extraction_service: ExtractionService,
    reflection_service: ReflectionService,
    schema: ExtractionSchema,
    max_search_queries: usize,
    max_reflection_steps: usize,
    include_search_results: bool,
    verbose_logging: bool,
}

impl ResearchFlow {
    /// 创建新的调研流程，使用默认抽取 schema
    pub fn new(config: &Config) -> Result<Self> {
        let llm = Arc::new(LlmClient::new(config));
        let tavily = Arc::new(TavilyClient::new(config)?);

        Ok(Self {
            query_service: QueryService::new(llm.clone(), config.max_search_queries),
            search_service: SearchService::new(
                tavily,
                config.max_search_results,
                config.max_tokens_per_source,
            ),
            notes_service: NotesService::new(llm.clone()),
            extraction_service: ExtractionService::new(llm.clone()),
            reflection_service: ReflectionService::new(llm),
            schema: ExtractionSchema::default(),
            max_search_queries: config.max_search_queries,
            max_reflection_steps: config.max_reflection_steps,
            include_search_results: config.include_search_results,
            verbose_logging: config.verbose_logging,
        })
    }

    /// 替换抽取 schema
    pub fn with_schema(mut self, schema: ExtractionSchema) -> Self {
        self.schema = schema;
        self
    }

    /// 调研一个人
    ///
    /// 网络或模型调用失败时直接返回错误，不做重试
    pub async fn run(&self, request: ResearchRequest) -> Result<ResearchOutput> {
        let mut state = ResearchState::new(request, self.schema.clone());

        info!("{} 📝 生成搜索关键词...", state);
        state.search_queries = self
            .query_service
            .generate_queries(&state.request, &state.schema, &[])
            .await?;

        loop {
            state.research_iterations += 1;
            self.research_once(&mut state).await?;

            match route_after_reflection(&state, self.max_reflection_steps) {
                Route::Finish => break,
                Route::Retry => {
                    state.reflection_steps_taken += 1;
                    warn!(
                        "{} 🔁 信息不完整，重新调研 ({}/{})",
                        state, state.reflection_steps_taken, self.max_reflection_steps
                    );
                    state.search_queries = self.next_queries(&state).await?;
                }
            }
        }

        self.log_outcome(&state);
        Ok(state.into_output(self.include_search_results))
    }

    /// 执行一轮：搜索 → 笔记 → 抽取 → 反思
    async fn research_once(&self, state: &mut ResearchState) -> Result<()> {
        let results = self.search_service.search_all(&state.search_queries).await?;
        info!("{} ✓ 搜索完成，共 {} 个来源", state, results.len());

        if self.verbose_logging {
            for (i, r) in results.iter().take(3).enumerate() {
                info!("{}   {}. {} ({})", state, i + 1, r.title, r.url);
            }
        }

        let sources = self.search_service.format_sources(&results);
        let notes = self
            .notes_service
            .take_notes(&state.request, &state.schema, &sources)
            .await?;
        state.record_research(results, notes);

        info!("{} 🧩 抽取结构化信息...", state);
        let info = self
            .extraction_service
            .extract(
                &state.request.person,
                &state.schema,
                &format_all_notes(&state.completed_notes),
            )
            .await?;

        info!("{} 🤔 反思信息完整度...", state);
        let reflection = self
            .reflection_service
            .reflect(&state.request.person, &state.schema, &info)
            .await?;
        state.structured_info = Some(info);
        info!(
            "{} 反思结论: {} (置信度 {:.2}) - {}",
            state,
            if reflection.is_satisfactory { "完整" } else { "不完整" },
            reflection.confidence_score,
            truncate_text(&reflection.reasoning, 120)
        );
        state.reflection = Some(reflection);

        Ok(())
    }

    /// 下一轮的关键词：优先采用反思给出的建议，否则带着缺失信息重新生成
    async fn next_queries(&self, state: &ResearchState) -> Result<Vec<String>> {
        let suggested = cap_queries(state.suggested_queries().to_vec(), self.max_search_queries);
        if !suggested.is_empty() {
            info!("{} 📝 采用反思建议的 {} 个关键词", state, suggested.len());
            return Ok(suggested);
        }

        info!("{} 📝 根据缺失信息重新生成关键词...", state);
        self.query_service
            .generate_queries(&state.request, &state.schema, state.missing_information())
            .await
    }

    fn log_outcome(&self, state: &ResearchState) {
        let satisfied = state
            .reflection
            .as_ref()
            .map(|r| r.is_satisfactory)
            .unwrap_or(false);

        if satisfied {
            info!("{} ✅ 调研完成", state);
        } else {
            warn!(
                "{} ⚠️ 已达到重试上限，返回最后一次抽取结果 (缺失: {:?})",
                state,
                state.missing_information()
            );
        }
    }
}
