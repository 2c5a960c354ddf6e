use anyhow::{Context, Result};
use clap::Parser;
use daily_insights::bot::{self, BotState};
use daily_insights::{
    create_router, AnalyzerClient, AppState, Collector, Config, DailyBuffer, GeminiAnalyzer,
    Orchestrator, SourcePoller, StorageBackendFactory, StorageClient,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "daily-insights")]
#[command(about = "Collect notes through the day, get AI insights on /analyze")]
struct Args {
    /// Config file (extension optional)
    #[arg(short, long, default_value = "config/daily-insights")]
    config: String,

    /// Don't start the HTTP control API
    #[arg(long)]
    no_http: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!("Allowed chat: {}", cfg.telegram.allowed_chat_id);
    info!("Source bot configured: {}", cfg.telegram.source_bot_token.is_some());
    info!("Analyzer model: {}", cfg.analyzer.model);

    let buffer = DailyBuffer::shared(cfg.collector.offset()?);

    let collector = Arc::new(Collector::new(
        Arc::clone(&buffer),
        cfg.telegram.allowed_chat_id,
        cfg.collector.ignored_texts.clone(),
    ));

    let analyzer: Arc<dyn AnalyzerClient> = Arc::new(GeminiAnalyzer::new(&cfg.analyzer)?);
    let storage: Arc<dyn StorageClient> = Arc::from(
        StorageBackendFactory::create(&cfg.storage).context("Failed to create storage backend")?,
    );

    let orchestrator = Arc::new(Orchestrator::new(
        buffer,
        analyzer,
        storage,
        cfg.telegram.allowed_chat_id,
    ));

    if cfg.service.http.enabled && !args.no_http {
        let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind HTTP server to {}", addr))?;
        let state = AppState::new(Arc::clone(&collector), Arc::clone(&orchestrator))
            .with_auth_token(cfg.service.http.auth_token.clone());
        let router = create_router(state);

        info!(
            "HTTP API listening on {} (auth {})",
            addr,
            if cfg.service.http.auth_token.is_some() { "on" } else { "off" }
        );
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                error!("HTTP server stopped: {}", e);
            }
        });
    }

    if let Some(token) = cfg.telegram.source_bot_token.clone() {
        let poller = SourcePoller::new(
            token,
            Arc::clone(&collector),
            Duration::from_secs(cfg.telegram.poll_interval_secs),
        );
        tokio::spawn(poller.run());
    }

    let state = Arc::new(BotState {
        collector,
        orchestrator,
    });

    bot::run(cfg.telegram.bot_token.clone(), state).await
}
