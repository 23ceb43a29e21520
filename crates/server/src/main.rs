use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use math_core::Clock;
use storage::sqlite::SqliteStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

use server::config::Args;
use server::{AppState, SessionLayer, build_app};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let key = args.signing_key();

    let sessions = match &args.database_url {
        Some(url) => {
            let store = SqliteStore::open(url).await?;
            info!(%url, "session documents stored in sqlite");
            SessionLayer::store(Clock::default(), Arc::new(store))
        }
        None => {
            info!("session documents ride in the signed cookie");
            SessionLayer::cookie(Clock::default())
        }
    };

    let app = build_app(AppState { sessions, key });

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    info!("listening on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
