use anyhow::Result;
use complexity_client::utils::logging;
use complexity_client::{App, Config};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 待分析的文件来自命令行参数
    let paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();

    // 初始化并运行应用
    let _stats = App::initialize(config).await?.run(paths).await?;

    Ok(())
}
