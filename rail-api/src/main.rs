use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use rail_api::{app, AppState, AuthConfig};
use rail_store::{app_config::Config, seed, RedisClient, Repositories};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "rail_api=debug,rail_booking=debug,rail_catalog=debug,rail_store=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Rail API on port {}", config.server.port);

    let repos = Repositories::connect(&config.database)
        .await
        .context("Failed to initialize storage")?;

    if config.catalog.seed_on_startup {
        seed::seed_trains(repos.trains.as_ref())
            .await
            .context("Failed to seed train catalog")?;
    }

    let mut app_state = AppState::new(repos, &config.business_rules, AuthConfig::new(&config.auth.jwt_secret));

    if let Some(url) = &config.redis.url {
        let redis_client = RedisClient::new(url)
            .await
            .context("Failed to connect to Redis")?;
        app_state = app_state.with_rate_limit(Arc::new(redis_client), config.rate_limit.clone());
    }

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
