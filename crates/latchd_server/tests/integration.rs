//! End-to-end tests driving a real listener with TCP reader clients.

use latchd_core::{CardFile, CardStore};
use latchd_server::{AccessServer, HandlerContext, ServerConfig, SimulatedActuator};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

struct TestServer {
    addr: std::net::SocketAddr,
    actuator: Arc<SimulatedActuator>,
    ctx: Arc<HandlerContext>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<latchd_server::ServerResult<()>>,
    _dir: TempDir,
}

impl TestServer {
    async fn start() -> Self {
        let dir = TempDir::new().unwrap();

        let config = ServerConfig::new("127.0.0.1:0".parse().unwrap())
            .with_unlock_duration(Duration::from_millis(20))
            .with_read_timeout(Duration::from_millis(500))
            .with_cards_path(dir.path().join("authorized_cards.json"))
            .with_log_path(dir.path().join("access_log.json"));

        let actuator = Arc::new(SimulatedActuator::new());
        let server = AccessServer::new(config, Arc::clone(&actuator) as _);
        let ctx = server.context();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(server.serve(listener, async {
            let _ = rx.await;
        }));

        Self {
            addr,
            actuator,
            ctx,
            shutdown: Some(tx),
            handle,
            _dir: dir,
        }
    }

    async fn attempt(&self, credential: &str) -> String {
        let mut stream = TcpStream::connect(self.addr).await.unwrap();
        stream.write_all(credential.as_bytes()).await.unwrap();
        let mut reply = Vec::new();
        stream.read_to_end(&mut reply).await.unwrap();
        String::from_utf8(reply).unwrap()
    }

    async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.handle.await.unwrap().unwrap();
    }
}

#[tokio::test]
async fn admin_card_unlocks_the_door() {
    let server = TestServer::start().await;
    server.ctx.store.save(&CardFile::default_cards()).unwrap();

    let reply = server.attempt("0x1a2b3c4d").await;
    assert_eq!(reply, "AUTHORIZED");

    let entries = server.ctx.audit.read();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].card_id, "0x1a2b3c4d");
    assert!(entries[0].authorized);

    // The unlock cycle is unsupervised; wait for it to run.
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(server.actuator.unlock_events(), vec![Duration::from_millis(20)]);
    assert!(server.actuator.is_locked());

    server.stop().await;
}

#[tokio::test]
async fn missing_store_denies_everything() {
    let server = TestServer::start().await;

    let reply = server.attempt("0x1a2b3c4d").await;
    assert_eq!(reply, "DENIED");

    let entries = server.ctx.audit.read();
    assert_eq!(entries.len(), 1);
    assert!(!entries[0].authorized);
    assert!(server.actuator.unlock_events().is_empty());

    server.stop().await;
}

#[tokio::test]
async fn revocation_takes_effect_without_restart() {
    let server = TestServer::start().await;
    server.ctx.store.save(&CardFile::default_cards()).unwrap();

    assert_eq!(server.attempt("0x1a2b3c4d").await, "AUTHORIZED");

    // Edit through a second handle, as the admin tool would.
    let admin = CardStore::new(server.ctx.store.path());
    admin.set_authorized("0x1a2b3c4d", false).unwrap();

    assert_eq!(server.attempt("0x1a2b3c4d").await, "DENIED");

    server.stop().await;
}

#[tokio::test]
async fn concurrent_attempts_each_get_logged() {
    let server = TestServer::start().await;
    let n = 20;

    let mut tasks = Vec::new();
    for i in 0..n {
        let addr = server.addr;
        tasks.push(tokio::spawn(async move {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            stream
                .write_all(format!("0xcard{i:02}").as_bytes())
                .await
                .unwrap();
            let mut reply = Vec::new();
            stream.read_to_end(&mut reply).await.unwrap();
            assert_eq!(reply, b"DENIED");
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let entries = server.ctx.audit.read();
    assert_eq!(entries.len(), n);
    let mut ids: Vec<_> = entries.iter().map(|e| e.card_id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), n);

    server.stop().await;
}

#[tokio::test]
async fn empty_connection_leaves_no_trace() {
    let server = TestServer::start().await;

    let mut stream = TcpStream::connect(server.addr).await.unwrap();
    stream.shutdown().await.unwrap();
    let mut reply = Vec::new();
    stream.read_to_end(&mut reply).await.unwrap();
    assert!(reply.is_empty());

    // Give the handler time to finish before inspecting the log.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(server.ctx.audit.is_empty());

    server.stop().await;
}

#[tokio::test]
async fn shutdown_leaves_the_lock_engaged() {
    let server = TestServer::start().await;
    let actuator = Arc::clone(&server.actuator);

    server.stop().await;
    assert!(actuator.is_locked());
}
