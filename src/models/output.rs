use serde::{Deserialize, Serialize};

use super::{Person, PersonInfo, ReflectionResult, SearchResult};

/// 一次调研的最终输出
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchOutput {
    pub person: Person,
    pub structured_info: PersonInfo,
    /// 最后一次反思的结论
    pub reflection: ReflectionResult,
    /// 每轮调研的原始笔记
    pub raw_notes: Vec<String>,
    /// 实际执行的调研轮数（至少为 1）
    pub research_iterations: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_results: Option<Vec<SearchResult>>,
}
