//! TCP listener and process lifetime.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::connection::ConnectionHandler;
use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::oven::Oven;
use crate::simulation::SimulationEngine;

/// Pause after a failed accept, so a persistent error such as running out of
/// file descriptors does not spin the loop.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// The oven server: one listening socket, one simulation, many clients.
pub struct OvenServer {
    /// Bound listening socket.
    listener: TcpListener,
    /// Shared oven.
    oven: Oven,
    /// Simulation driving the oven.
    engine: SimulationEngine,
    /// Startup configuration.
    config: ServerConfig,
}

impl OvenServer {
    /// Validate `config` and bind the listening socket.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AddressInUse`] if the port is taken, [`Error::Bind`]
    /// for any other bind failure, or [`Error::InvalidParameter`] for an
    /// invalid configuration.
    pub async fn bind(config: ServerConfig) -> Result<Self> {
        config.validate()?;

        let addr = config.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::from_bind(&addr, e))?;

        let oven = Oven::new();
        let engine = SimulationEngine::new(oven.clone(), config.thermal, config.tick_interval);

        Ok(Self {
            listener,
            oven,
            engine,
            config,
        })
    }

    /// The address actually bound.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Get a handle to the shared oven.
    pub fn oven(&self) -> Oven {
        self.oven.clone()
    }

    /// Get the simulation engine.
    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    /// Serve clients until the process exits.
    pub async fn run(self) -> Result<()> {
        self.serve(std::future::pending()).await
    }

    /// Serve clients until `shutdown` resolves.
    ///
    /// The simulation starts before the first connection is accepted. On
    /// shutdown the simulation stops and open connections are dropped.
    pub async fn serve<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let span = info_span!("oven", tag = %self.config.tag);
        self.serve_inner(shutdown).instrument(span).await
    }

    async fn serve_inner<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        self.engine.start();

        let local_addr = self.local_addr()?;
        info!("Reflow oven simulator listening on {}", local_addr);

        let mut connections = JoinSet::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, peer)) => {
                            let id = Uuid::new_v4();
                            let span = info_span!("conn", %peer, %id);
                            let handler = ConnectionHandler::new(stream, self.oven.clone());
                            connections.spawn(
                                async move {
                                    info!("New connection");
                                    match handler.run().await {
                                        Ok(()) => info!("Connection closed"),
                                        Err(Error::Io(e))
                                            if e.kind() == std::io::ErrorKind::ConnectionReset =>
                                        {
                                            info!("Client forcibly closed the connection")
                                        }
                                        Err(e) => warn!("Connection ended with error: {}", e),
                                    }
                                }
                                .instrument(span),
                            );
                        }
                        Err(e) => {
                            error!("Unable to accept connection: {}", e);
                            tokio::time::sleep(ACCEPT_BACKOFF).await;
                        }
                    }
                }
                Some(joined) = connections.join_next(), if !connections.is_empty() => {
                    if let Err(e) = joined {
                        error!("Connection task failed: {}", e);
                    }
                }
            }
        }

        self.engine.stop().await;
        debug!("Dropping {} open connection(s)", connections.len());
        connections.shutdown().await;

        info!("Server stopped");
        Ok(())
    }
}
