//! 调研上下文
//!
//! 一次调研过程中流转的全部状态，以及反思之后的路由判断

use std::fmt::Display;

use crate::models::{
    ExtractionSchema, PersonInfo, ReflectionResult, ResearchOutput, ResearchRequest,
    SearchResult,
};
use crate::services::dedupe_by_url;

/// 反思之后的下一步
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// 重新生成关键词，再调研一轮
    Retry,
    /// 结束调研，输出结果
    Finish,
}

/// 单次调研的状态，每次调用 `ResearchFlow::run` 都重新创建
#[derive(Debug, Clone)]
pub struct ResearchState {
    pub request: ResearchRequest,
    pub schema: ExtractionSchema,
    /// 本轮使用的搜索关键词
    pub search_queries: Vec<String>,
    /// 每轮一条，按轮次追加
    pub completed_notes: Vec<String>,
    /// 所有轮次的搜索结果（已按 URL 去重）
    pub search_results: Vec<SearchResult>,
    /// 最近一次抽取结果，每轮整体替换
    pub structured_info: Option<PersonInfo>,
    pub reflection: Option<ReflectionResult>,
    /// 已触发的重新调研次数，不超过配置的上限
    pub reflection_steps_taken: usize,
    /// 已完成的调研轮数
    pub research_iterations: usize,
}

impl ResearchState {
    pub fn new(request: ResearchRequest, schema: ExtractionSchema) -> Self {
        Self {
            request,
            schema,
            search_queries: Vec::new(),
            completed_notes: Vec::new(),
            search_results: Vec::new(),
            structured_info: None,
            reflection: None,
            reflection_steps_taken: 0,
            research_iterations: 0,
        }
    }

    /// 记录一轮搜索的结果和笔记
    pub fn record_research(&mut self, results: Vec<SearchResult>, notes: String) {
        let mut merged = std::mem::take(&mut self.search_results);
        merged.extend(results);
        self.search_results = dedupe_by_url(merged);
        self.completed_notes.push(notes);
    }

    /// 反思给出的下一轮关键词建议
    pub fn suggested_queries(&self) -> &[String] {
        self.reflection
            .as_ref()
            .map(|r| r.additional_search_suggestions.as_slice())
            .unwrap_or(&[])
    }

    /// 反思指出的缺失信息
    pub fn missing_information(&self) -> &[String] {
        self.reflection
            .as_ref()
            .map(|r| r.missing_information.as_slice())
            .unwrap_or(&[])
    }

    /// 转为最终输出
    pub fn into_output(self, include_search_results: bool) -> ResearchOutput {
        ResearchOutput {
            person: self.request.person,
            structured_info: self.structured_info.unwrap_or_default(),
            reflection: self.reflection.unwrap_or_else(ReflectionResult::pending),
            raw_notes: self.completed_notes,
            research_iterations: self.research_iterations,
            search_results: include_search_results.then_some(self.search_results),
        }
    }
}

impl Display for ResearchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{} 第{}轮 重试{}次]",
            self.request.person.label(),
            self.research_iterations,
            self.reflection_steps_taken
        )
    }
}

/// 根据反思结果决定是否再调研一轮
///
/// 信息完整时结束；不完整时只要重试次数还没用完就重试
pub fn route_after_reflection(state: &ResearchState, max_reflection_steps: usize) -> Route {
    match &state.reflection {
        Some(reflection) if !reflection.is_satisfactory => {
            if state.reflection_steps_taken < max_reflection_steps {
                Route::Retry
            } else {
                Route::Finish
            }
        }
        _ => Route::Finish,
    }
}
