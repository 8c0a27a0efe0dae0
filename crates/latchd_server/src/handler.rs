//! Per-connection protocol handling.

use crate::actuator::Actuator;
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use latchd_core::{AccessLogEntry, AuditLog, CardStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{error, info, warn};

/// Upper bound on a single credential payload.
const MAX_CREDENTIAL_BYTES: usize = 1024;

/// Shared state injected into every connection handler.
pub struct HandlerContext {
    /// Server configuration.
    pub config: ServerConfig,
    /// Authorization list handle. Re-read on every check, never cached.
    pub store: CardStore,
    /// Audit log (shared across all handlers; appends are serialized inside).
    pub audit: Arc<AuditLog>,
    /// Lock actuator backend selected at startup.
    pub actuator: Arc<dyn Actuator>,
}

impl HandlerContext {
    /// Creates a handler context from the server's collaborators.
    pub fn new(config: ServerConfig, actuator: Arc<dyn Actuator>) -> Self {
        let store = CardStore::new(&config.cards_path);
        let audit = Arc::new(AuditLog::new(&config.log_path));
        Self {
            config,
            store,
            audit,
            actuator,
        }
    }
}

/// Handles one accepted connection from a reader device.
///
/// Every fault is contained here: it is logged and the connection is closed
/// when the stream drops, so a misbehaving reader can never take down the
/// accept loop or leak a socket.
pub async fn handle_connection(mut stream: TcpStream, peer: SocketAddr, ctx: Arc<HandlerContext>) {
    info!(%peer, "connection accepted");
    match serve(&mut stream, &ctx).await {
        Ok(Some(authorized)) => info!(%peer, authorized, "attempt handled"),
        Ok(None) => info!(%peer, "connection delivered no credential"),
        Err(e) => warn!(%peer, error = %e, "connection failed"),
    }
}

/// Runs the credential protocol over any byte stream.
///
/// Returns the decision, or `None` when the peer delivered no credential
/// (in which case nothing is logged: there was nothing to evaluate).
pub(crate) async fn serve<S>(stream: &mut S, ctx: &HandlerContext) -> ServerResult<Option<bool>>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    // One bounded read; the protocol has no framing beyond it.
    let mut buf = [0u8; MAX_CREDENTIAL_BYTES];
    let n = timeout(ctx.config.read_timeout, stream.read(&mut buf))
        .await
        .map_err(|_| ServerError::ReadTimeout)??;

    let credential = std::str::from_utf8(&buf[..n])?.trim();
    if credential.is_empty() {
        return Ok(None);
    }

    let authorized = ctx.store.is_authorized(credential);

    // Exactly one entry per delivered credential, recorded before any
    // actuation side effect. A failed append is a transient storage fault:
    // the decision stands and the reader still gets its reply.
    if let Err(e) = ctx
        .audit
        .append(AccessLogEntry::now(credential, authorized))
    {
        error!(error = %e, "audit append failed");
    }

    if authorized {
        let actuator = Arc::clone(&ctx.actuator);
        let hold = ctx.config.unlock_duration;
        // Best-effort, unsupervised: the reply must not wait on the unlock
        // cycle, and the fail-safe relock belongs to the shutdown path.
        tokio::task::spawn_blocking(move || actuator.unlock_cycle(hold));
    }

    let response: &[u8] = if authorized { b"AUTHORIZED" } else { b"DENIED" };
    stream.write_all(response).await?;
    stream.flush().await?;

    Ok(Some(authorized))
}
