mod bootstrap;
mod map;
mod routes;
mod state;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use clap::Parser;
use farm_control::Session;
use farm_gateway::{PowerClient, ReadingQuery};
use farm_world::{build_initial_state, load_content};
use tracing_subscriber::EnvFilter;

use crate::map::MapView;
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "farm_daemon", about = "Kilimotek farm dashboard server")]
struct Args {
    #[arg(long, default_value = "./content")]
    content_dir: String,
    #[arg(long, default_value_t = 3001)]
    port: u16,
    /// Origin allowed to call the API from a browser.
    #[arg(long, default_value = "http://localhost:5173")]
    cors_origin: String,
    /// Skip the startup fetch and serve the fallback reading.
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let content = load_content(&args.content_dir)?;
    let cors_origin: HeaderValue = args
        .cors_origin
        .parse()
        .with_context(|| format!("invalid --cors-origin: {}", args.cors_origin))?;

    let app_state = AppState::new(
        Session::new(build_initial_state(&content)),
        MapView::from_content(&content),
    );

    if args.offline {
        tracing::info!("offline mode; skipping climate fetch");
        let events = {
            let mut session = app_state.session.lock();
            session.fail_reading("climate fetch disabled (--offline)");
            session.drain_events()
        };
        app_state.publish(events);
    } else {
        let client = PowerClient::from_def(&content.gateway).context("building HTTP client")?;
        let query = ReadingQuery::for_site(&content.site, content.gateway.variant);
        tracing::info!(
            site = %content.site.name,
            endpoint = client.endpoint(),
            "fetching climate reading"
        );
        tokio::spawn(bootstrap::run_startup_fetch(app_state.clone(), client, query));
    }

    let router = routes::make_router_with_cors(app_state, cors_origin);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port))
        .await
        .with_context(|| format!("binding port {}", args.port))?;
    tracing::info!(
        content_version = %content.content_version,
        zones = content.zones.len(),
        "farm_daemon listening on http://{}",
        listener.local_addr().context("reading local address")?,
    );
    axum::serve(listener, router).await.context("serving HTTP")?;
    Ok(())
}
