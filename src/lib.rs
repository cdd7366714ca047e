//! # People Research
//!
//! 一个用于自动调研人物职业背景的 Rust 应用程序：
//! 生成搜索关键词 → 网页搜索 → 整理笔记 → 结构化抽取 → 反思完整度 → 必要时重试
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 外部接口层（Clients）
//! - `clients/` - 只封装外部 API，不含业务逻辑
//! - `LlmClient` - OpenAI 兼容的聊天接口
//! - `TavilyClient` - 网页搜索接口
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，每个服务对应一次外部调用
//! - `QueryService` / `SearchService` / `NotesService` / `ExtractionService` / `ReflectionService`
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"调研一个人"的完整流程
//! - `ResearchState` - 单次调研的状态（含有上限的重试计数）
//! - `ResearchFlow` - 流程编排（query → search → notes → extract → reflect → retry?）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量调研，控制并发并写出结果

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, Result};
pub use models::{Person, PersonInfo, ReflectionResult, ResearchOutput, ResearchRequest};
pub use orchestrator::App;
pub use workflow::{ResearchFlow, ResearchState, Route};
