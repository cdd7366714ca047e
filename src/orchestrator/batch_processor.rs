//! 批量调研处理器 - 编排层
//!
//! 1. **应用初始化**：校验配置、初始化日志文件、创建调研流程
//! 2. **批量加载**：扫描并加载所有调研请求
//! 3. **并发控制**：使用 Semaphore 限制同时调研的人数
//! 4. **结果落盘**：每个人一个 JSON 文件
//! 5. **全局统计**：汇总成功 / 失败数量

use crate::config::Config;
use crate::error::{AppError, Result as AppResult};
use crate::models::{load_all_requests, ResearchOutput, ResearchRequest};
use crate::utils::logging;
use crate::workflow::ResearchFlow;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    flow: Arc<ResearchFlow>,
}

/// 处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingStats {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        config.validate().context("配置校验失败")?;

        logging::init_log_file(&config.output_log_file)?;
        logging::log_startup(config.max_concurrent_requests, config.max_reflection_steps);

        let flow = ResearchFlow::new(&config).context("创建调研流程失败")?;

        Ok(Self {
            config,
            flow: Arc::new(flow),
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<ProcessingStats> {
        info!("\n📁 正在扫描待调研的请求...");
        let requests = load_all_requests(&self.config.input_folder)
            .await
            .with_context(|| format!("无法加载调研请求: {}", self.config.input_folder))?;

        if requests.is_empty() {
            warn!("⚠️ 没有找到待调研的TOML文件，程序结束");
            return Ok(ProcessingStats::default());
        }

        logging::log_requests_loaded(requests.len(), self.config.max_concurrent_requests);

        let stats = self.process_all(requests).await;

        logging::print_final_stats(
            stats.success,
            stats.failed,
            stats.total,
            &self.config.output_log_file,
        );

        Ok(stats)
    }

    /// 并发调研所有请求
    async fn process_all(&self, requests: Vec<ResearchRequest>) -> ProcessingStats {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_requests));
        let mut stats = ProcessingStats {
            total: requests.len(),
            ..Default::default()
        };

        let total = stats.total;
        let file_names = assign_output_names(&requests);
        let mut handles = Vec::with_capacity(total);
        for (idx, (request, file_name)) in requests.into_iter().zip(file_names).enumerate() {
            let semaphore = semaphore.clone();
            let flow = self.flow.clone();
            let output_folder = self.config.output_folder.clone();
            let log_file = self.config.output_log_file.clone();
            let label = request.person.label().to_string();

            let handle = tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| AppError::Other(e.to_string()))?;
                info!("[{}/{}] 开始调研 {}", idx + 1, total, request.person);
                process_single(&flow, request, &file_name, &output_folder, &log_file).await
            });
            handles.push((label, handle));
        }

        let (labels, handles): (Vec<_>, Vec<_>) = handles.into_iter().unzip();
        let results = futures::future::join_all(handles).await;

        for (label, result) in labels.into_iter().zip(results) {
            match result {
                Ok(Ok(path)) => {
                    info!("✓ {} 调研结果已保存: {}", label, path.display());
                    stats.success += 1;
                }
                Ok(Err(e)) => {
                    error!("❌ {} 调研失败: {}", label, e);
                    if let Err(log_err) = logging::append_log_line(
                        &self.config.output_log_file,
                        &format!("❌ {} 调研失败: {}", label, e),
                    )
                    .await
                    {
                        warn!("写入运行日志失败: {}", log_err);
                    }
                    stats.failed += 1;
                }
                Err(e) => {
                    error!("❌ {} 任务执行失败: {}", label, e);
                    stats.failed += 1;
                }
            }
        }

        stats
    }
}

/// 调研单个人并写出结果
async fn process_single(
    flow: &ResearchFlow,
    request: ResearchRequest,
    file_name: &str,
    output_folder: &str,
    log_file: &str,
) -> AppResult<PathBuf> {
    let label = request.person.label().to_string();

    let output = flow.run(request).await?;
    let path = write_output(Path::new(output_folder), file_name, &output).await?;

    logging::append_log_line(
        log_file,
        &format!(
            "✓ {} | 调研 {} 轮 | 完整: {} | {}",
            label,
            output.research_iterations,
            output.reflection.is_satisfactory,
            path.display()
        ),
    )
    .await?;

    Ok(path)
}

/// 输出文件名：优先使用请求文件名，否则由邮箱生成
pub fn output_file_name(request: &ResearchRequest) -> String {
    let stem = request
        .file_path
        .as_deref()
        .and_then(|p| Path::new(p).file_stem())
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| request.person.email.clone());

    let slug: String = stem
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    format!("{}.json", slug)
}

/// 为整批请求分配互不相同的输出文件名
///
/// 不同的请求文件可能得到相同的文件名（如 `ada.lovelace.toml` 与 `ada_lovelace.toml`），
/// 后出现的加上 `-2`、`-3` 等后缀
pub fn assign_output_names(requests: &[ResearchRequest]) -> Vec<String> {
    let mut taken = HashSet::new();
    requests
        .iter()
        .map(|request| {
            let base = output_file_name(request);
            let stem = base.trim_end_matches(".json").to_string();
            let mut name = base;
            let mut n = 2;
            while !taken.insert(name.clone()) {
                name = format!("{}-{}.json", stem, n);
                n += 1;
            }
            if n > 2 {
                warn!("⚠️ {} 的输出文件名重复，改为 {}", request.person, name);
            }
            name
        })
        .collect()
}

/// 把调研结果写成格式化 JSON
pub async fn write_output(
    folder: &Path,
    file_name: &str,
    output: &ResearchOutput,
) -> AppResult<PathBuf> {
    let folder_str = folder.display().to_string();
    tokio::fs::create_dir_all(folder)
        .await
        .map_err(|e| AppError::file_write_failed(&folder_str, e))?;

    let path = folder.join(file_name);
    let json = serde_json::to_string_pretty(output)?;
    tokio::fs::write(&path, json)
        .await
        .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;

    Ok(path)
}
