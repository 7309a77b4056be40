mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::AuthState,
};
use reelstore_ingest::{FixtureResolver, LiveResolver, ReelSync, SourceResolver, SyncOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(reelstore_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = reelstore_db::PoolConfig::from_app_config(&config);
    let pool = reelstore_db::connect_pool(&config.database_url, pool_config).await?;
    reelstore_db::run_migrations(&pool).await?;

    // Demo mode swaps the whole resolution layer for fixtures; otherwise
    // the live resolver is primary and fixtures only back up a failed
    // profile resolution (also gated on demo_mode, inside ReelSync).
    let resolver: Arc<dyn SourceResolver> = if config.demo_mode {
        tracing::warn!("demo mode enabled; serving fixture content instead of live fetches");
        Arc::new(FixtureResolver::new())
    } else {
        Arc::new(LiveResolver::new(
            "https://www.instagram.com",
            config.ingest_request_timeout_secs,
            &config.ingest_user_agent,
            config.ingest_max_posts,
        )?)
    };

    let sync = Arc::new(ReelSync::new(
        pool.clone(),
        resolver,
        SyncOptions {
            demo_mode: config.demo_mode,
            default_affiliate_link: config.default_affiliate_link.clone(),
        },
    ));
    let graph = Arc::new(reelstore_ingest::InstagramGraph::new(
        config.ingest_request_timeout_secs,
    )?);

    let auth = AuthState::from_env(matches!(
        config.env,
        reelstore_core::Environment::Development
    ))?;
    let app = build_app(
        AppState {
            pool,
            config: Arc::clone(&config),
            sync,
            graph,
        },
        auth,
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
