/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use crate::error::{AppError, Result};
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 日志
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 debug 或 info 级别。
/// 重复调用时静默忽略。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n人物调研日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header).map_err(|e| AppError::file_write_failed(log_file_path, e))
}

/// 向日志文件追加一行
///
/// 批量调研时多个任务并发调用，使用异步文件操作
pub async fn append_log_line(log_file_path: &str, line: &str) -> Result<()> {
    use tokio::io::AsyncWriteExt;

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .await
        .map_err(|e| AppError::file_write_failed(log_file_path, e))?;

    let entry = format!(
        "[{}] {}\n",
        chrono::Local::now().format("%H:%M:%S"),
        line
    );
    file.write_all(entry.as_bytes())
        .await
        .map_err(|e| AppError::file_write_failed(log_file_path, e))
}

/// 记录程序启动信息
///
/// # 参数
/// - `max_concurrent`: 最大并发数
/// - `max_reflection_steps`: 最多重新调研次数
pub fn log_startup(max_concurrent: usize, max_reflection_steps: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 人物调研模式");
    info!("📊 最大并发数: {}", max_concurrent);
    info!("🔁 最多重新调研次数: {}", max_reflection_steps);
    info!("{}", "=".repeat(60));
}

/// 记录请求加载信息
pub fn log_requests_loaded(total: usize, max_concurrent: usize) {
    info!("✓ 找到 {} 个待调研的对象", total);
    info!("📋 最多同时调研 {} 个\n", max_concurrent);
}

/// 打印最终统计信息
///
/// # 参数
/// - `success`: 成功数量
/// - `failed`: 失败数量
/// - `total`: 总数
/// - `log_file_path`: 日志文件路径
pub fn print_final_stats(success: usize, failed: usize, total: usize, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部调研完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, total);
    info!("❌ 失败: {}", failed);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（按字符计）
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text_counts_chars() {
        assert_eq!(truncate_text("短文本", 10), "短文本");
        assert_eq!(truncate_text("人物调研日志", 2), "人物...");
    }

    #[tokio::test]
    async fn test_log_file_header_and_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");
        let path = path.to_str().unwrap();

        init_log_file(path).unwrap();
        append_log_line(path, "✓ ada@example.com").await.unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("人物调研日志"));
        assert!(content.trim_end().ends_with("✓ ada@example.com"));
    }

    #[tokio::test]
    async fn test_append_to_missing_folder_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing/run.log");

        let err = append_log_line(path.to_str().unwrap(), "line")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("run.log"));
    }
}
