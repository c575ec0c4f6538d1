use tokio::net::TcpListener;
use tracing::{Instrument, error, info, info_span};

use crate::config::Config;
use crate::http::connection::{Connection, Outcome};

/// Accepts connections forever, serving them one at a time.
pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.server.listen_addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    serve(listener, cfg).await
}

/// Runs the accept loop on an already bound listener.
///
/// Each connection is driven to completion before the next `accept`.
pub async fn serve(listener: TcpListener, cfg: &Config) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("Failed to accept connection: {}", e);
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let mut conn = Connection::new(
            socket,
            cfg.framing.buffer_capacity,
            cfg.framing.read_chunk_size,
        );

        match conn.run().instrument(info_span!("conn", %peer)).await {
            Ok(Outcome::Responded(_)) => {}
            Ok(outcome) => info!(?outcome, "Closed connection from {} without response", peer),
            Err(e) => error!("Connection error from {}: {}", peer, e),
        }
    }
}
