use anyhow::Result;
use auto_image_mapper::orchestrator::App;
use auto_image_mapper::utils::logging;
use auto_image_mapper::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env();

    // 命令行参数作为图片名；为空时进入批量模式扫描图片目录
    let image_names: Vec<String> = std::env::args().skip(1).collect();

    // 初始化并运行应用
    App::initialize(config).await?.run(image_names).await?;

    Ok(())
}
