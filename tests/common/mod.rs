//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use request_gate::config::GateConfig;
use request_gate::http::HttpServer;
use request_gate::lifecycle::Shutdown;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// A gate served on an ephemeral local port.
pub struct TestGate {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<()>,
}

impl TestGate {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Trigger shutdown and wait for the server task to finish.
    pub async fn stop(self) {
        self.shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server did not shut down")
            .expect("server task panicked");
    }
}

/// Start a gate for `config` on 127.0.0.1 with a random port.
pub async fn start_gate(config: GateConfig) -> TestGate {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config);

    let handle = tokio::spawn(async move {
        server
            .run(listener, server_shutdown)
            .await
            .expect("server failed");
    });

    TestGate {
        addr,
        shutdown,
        handle,
    }
}

/// Client that never pools connections or uses a system proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

/// Send one request and return (status, body).
pub async fn send(
    client: &reqwest::Client,
    gate: &TestGate,
    method: reqwest::Method,
    path: &str,
) -> (u16, String) {
    let res = client
        .request(method, gate.url(path))
        .send()
        .await
        .expect("gate unreachable");
    let status = res.status().as_u16();
    (status, res.text().await.unwrap())
}
