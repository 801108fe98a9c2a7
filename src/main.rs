use clap::Parser;
use section_index::config::{Config, Overrides};
use section_index::index::IndexService;
use section_index::query::IndexServer;
use section_index::source::{FixtureDocument, FixtureSource};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "section-index", version, about = "Cached section index over a media library")]
struct Args {
    /// TOML 配置文件（默认 ~/.config/section-index/config.toml）
    #[arg(long)]
    config: Option<PathBuf>,

    /// 空 = 首页 + 保存过滤器；frontpage = 仅首页；否则为逗号分隔的过滤器 id
    #[arg(long, env = "SECTION_INDEX_FILTERS")]
    filters: Option<String>,

    #[arg(long, env = "SECTION_INDEX_LOG_LEVEL")]
    log_level: Option<String>,

    #[arg(long)]
    port: Option<u16>,

    /// 录制的上游数据（JSON）
    #[arg(long)]
    fixture: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::load(args.config.as_deref())?.apply(Overrides {
        filters: args.filters,
        log_level: args.log_level,
        listen_port: args.port,
        fixture_path: args.fixture,
    });

    // RUST_LOG 优先，其次是配置中的 log_level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting section-index");

    let source = match &config.fixture_path {
        Some(path) => FixtureSource::load(path).await?,
        None => {
            tracing::warn!("No fixture configured, serving an empty library");
            FixtureSource::new(FixtureDocument::default())
        }
    };

    let service = Arc::new(IndexService::new(Arc::new(source), config.build_mode()));

    // 启动即预热一次，首个请求不必等待构建
    let warm = service.clone();
    tokio::spawn(async move {
        let sections = warm.get_index().await;
        info!("Index warmed: {} sections", sections.len());
    });

    let server = IndexServer::new(service);
    tokio::spawn(server.run(config.listen_port));

    info!(
        "section-index ready. Query via: http://localhost:{}/index",
        config.listen_port
    );

    tokio::signal::ctrl_c().await?;
    info!("Shutting down...");

    Ok(())
}
