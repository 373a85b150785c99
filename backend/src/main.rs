use std::net::SocketAddr;

use tracing::{info, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging; domain code logs through the `log` facade and is
    // captured by the tracing subscriber
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let state = calendar_kids_backend::initialize_backend().await?;
    let app = calendar_kids_backend::create_router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
