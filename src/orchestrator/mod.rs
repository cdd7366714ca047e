//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量调研和资源调度，是整个系统的"指挥中心"。
//!
//! ### `batch_processor` - 批量调研处理器
//! - 管理应用生命周期（配置校验、日志文件、运行）
//! - 批量加载调研请求（Vec<ResearchRequest>）
//! - 控制并发数量（Semaphore）
//! - 写出每个人的调研结果 JSON
//! - 输出全局统计信息
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<ResearchRequest>)
//!     ↓
//! workflow::ResearchFlow (处理单个人)
//!     ↓
//! services (能力层：query / search / notes / extraction / reflection)
//!     ↓
//! clients (外部 API：LLM / Tavily)
//! ```

pub mod batch_processor;

pub use batch_processor::{
    assign_output_names, output_file_name, write_output, App, ProcessingStats,
};
