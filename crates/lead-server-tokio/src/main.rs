use anyhow::Context;
use clap::Parser;
use lead_core::{
    config::{Config, UnknownCategoryPolicy},
    pipeline::AppCore,
};
use lead_server_tokio::{router, AppState};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// [vectorizer, classifier] artifact（.json / .json.gz）
    #[arg(long, env = "LEAD_ARTIFACT", default_value = "pipeline_v1.json")]
    artifact: PathBuf,

    #[arg(long, env = "LEAD_ADDR", default_value = "0.0.0.0:8000")]
    addr: SocketAddr,

    /// probability >= threshold -> converted
    #[arg(long, env = "LEAD_THRESHOLD", default_value_t = 0.5)]
    threshold: f64,

    /// lead_source 未见过的取值：ignore | reject
    #[arg(long, env = "LEAD_UNKNOWN_CATEGORY", default_value_t = UnknownCategoryPolicy::Ignore)]
    unknown_category: UnknownCategoryPolicy,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // metrics
    let prom = PrometheusBuilder::new()
        .install_recorder()
        .context("install prometheus recorder")?;

    // artifact 加载失败 -> 直接退出，不监听端口
    let cfg = Config {
        artifact_path: args.artifact,
        decision_threshold: args.threshold,
        unknown_category: args.unknown_category,
    };
    let core = Arc::new(AppCore::load(cfg).context("startup")?);
    tracing::info!(
        threshold = core.cfg.decision_threshold,
        unknown_category = %core.cfg.unknown_category,
        "core ready"
    );

    let app = router(AppState { core, prom });

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("bind {}", args.addr))?;
    tracing::info!("lead-server-tokio listening on http://{}", args.addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(err = %e, "ctrl_c handler failed");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
