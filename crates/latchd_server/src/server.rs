//! The accept loop and server lifecycle.

use crate::actuator::Actuator;
use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::handler::{handle_connection, HandlerContext};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

/// The access-control server.
///
/// Owns the handler context (configuration, store and log handles, actuator)
/// and runs the accept loop: one spawned task per connection, no cap on the
/// number in flight, since request volume is bounded by the physical reader
/// hardware, not by network clients.
///
/// # Example
///
/// ```no_run
/// use latchd_server::{AccessServer, ServerConfig, SimulatedActuator};
/// use std::sync::Arc;
///
/// # async fn run() -> latchd_server::ServerResult<()> {
/// let config = ServerConfig::default();
/// let server = AccessServer::new(config, Arc::new(SimulatedActuator::new()));
/// server.run().await
/// # }
/// ```
pub struct AccessServer {
    ctx: Arc<HandlerContext>,
}

impl AccessServer {
    /// Creates a server from its configuration and a selected actuator.
    ///
    /// The actuator backend has already forced the locked state when it was
    /// constructed; the server re-asserts it on shutdown.
    pub fn new(config: ServerConfig, actuator: Arc<dyn Actuator>) -> Self {
        let ctx = Arc::new(HandlerContext::new(config, actuator));
        Self { ctx }
    }

    /// Returns the handler context shared with connections.
    #[must_use]
    pub fn context(&self) -> Arc<HandlerContext> {
        Arc::clone(&self.ctx)
    }

    /// Binds the configured address and serves until ctrl-c.
    ///
    /// # Errors
    ///
    /// Returns an error if the listening socket cannot be bound; this is
    /// fatal and the server never starts accepting.
    pub async fn run(self) -> ServerResult<()> {
        let listener = TcpListener::bind(self.ctx.config.bind_addr).await?;
        self.serve(listener, async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
    }

    /// Serves connections on an already-bound listener until `shutdown`
    /// resolves.
    ///
    /// Accept faults are logged and the loop continues; only shutdown ends
    /// it. On the way out the actuator is forced locked and its pin
    /// resources released before the listener is dropped, so the door is
    /// never left open across a server lifecycle boundary.
    ///
    /// # Errors
    ///
    /// Currently infallible after bind; the signature leaves room for
    /// listener-level faults to become fatal.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()>,
    {
        if let Ok(addr) = listener.local_addr() {
            info!(%addr, "listening for reader connections");
        }
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let ctx = Arc::clone(&self.ctx);
                        tokio::spawn(handle_connection(stream, peer, ctx));
                    }
                    Err(e) => error!(error = %e, "accept failed"),
                },
                () = &mut shutdown => break,
            }
        }

        info!("shutting down, engaging lock");
        self.ctx.actuator.force_locked();
        self.ctx.actuator.release();
        drop(listener);
        Ok(())
    }
}
