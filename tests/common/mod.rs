//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use todo_service::{HttpServer, ServiceConfig, Shutdown};

/// A running server on an ephemeral port. Stops when dropped.
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// SDK client pointed at this server, bypassing any system proxy.
    pub fn client(&self) -> todo_sdk::TodoClient {
        todo_sdk::TodoClient::with_client(&self.url(), http_client())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the service with the given config, bound to 127.0.0.1 on a free port.
pub async fn start_server(config: ServiceConfig) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let (_, config_updates) = mpsc::unbounded_channel();
    let server = HttpServer::new(config);

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    wait_until_ready(addr).await;
    TestServer { addr, shutdown }
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

async fn wait_until_ready(addr: SocketAddr) {
    let client = http_client();
    for _ in 0..50 {
        if client
            .get(format!("http://{}/health", addr))
            .send()
            .await
            .is_ok()
        {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("server on {} never became ready", addr);
}
