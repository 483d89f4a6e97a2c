use std::{env, net::IpAddr};

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use assent_server::{
    load, shutdown_signal, version, App, AppConfig, AppRouter, AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = env::args().collect::<Vec<_>>();
    let config =
        if args.len() == 3 && (args[1] == "-c" || args[1] == "--config") {
            load(&args[2])?
        } else {
            AppConfig::parse()
        };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    debug!("{:#?}", &config);
    info!("{}", version());
    run_server(config).await
}

async fn run_server(config: AppConfig) -> Result<()> {
    info!("configuration parsed, initializing application...");
    let app = App::new(config.clone())
        .context("could not initialize application")?;

    let router = AppRouter::build(AppState(app.into()));
    let listener = TcpListener::bind((
        config
            .endpoint
            .parse::<IpAddr>()
            .context("could not parse endpoint")?,
        config.port,
    ))
    .await
    .context("could not bind to endpoint")?;

    info!("api server, listening on {}:{}", config.endpoint, config.port);
    axum::serve(
        listener,
        axum::ServiceExt::<axum::extract::Request>::into_make_service(router),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("error while starting API server")?;

    Ok(())
}
