use anyhow::Result;
use people_research::utils::logging;
use people_research::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    let stats = App::initialize(config).await?.run().await?;

    if stats.failed > 0 {
        anyhow::bail!("{} 个调研任务失败", stats.failed);
    }

    Ok(())
}
