//! Concurrent admissions never exceed the ceiling.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use axum::http::Method;
use request_gate::config::GateConfig;
use request_gate::gate::{Reply, RequestGate, UpstreamHandler};

mod common;

#[derive(Default)]
struct Recorder {
    calls: AtomicUsize,
}

impl UpstreamHandler for Recorder {
    fn handle(&self, _route: &str, _method: &Method) -> Reply {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Reply::new(200, "Ok")
    }
}

#[test]
fn test_threads_racing_on_one_route() {
    let recorder = Arc::new(Recorder::default());
    let gate = RequestGate::new(recorder.clone(), 25);

    let admitted = AtomicUsize::new(0);
    thread::scope(|s| {
        for _ in 0..16 {
            s.spawn(|| {
                for _ in 0..50 {
                    if gate.handle("/hot", &Method::GET).status == 200 {
                        admitted.fetch_add(1, Ordering::SeqCst);
                    }
                }
            });
        }
    });

    assert_eq!(admitted.load(Ordering::SeqCst), 25);
    assert_eq!(recorder.calls.load(Ordering::SeqCst), 25);
    assert_eq!(gate.admitted("/hot", &Method::GET), 25);
}

#[test]
fn test_threads_on_separate_routes() {
    let gate = RequestGate::new(Arc::new(Recorder::default()), 3);

    thread::scope(|s| {
        for i in 0..8 {
            let gate = &gate;
            s.spawn(move || {
                let route = format!("/route/{}", i);
                for _ in 0..10 {
                    gate.handle(&route, &Method::GET);
                }
            });
        }
    });

    assert_eq!(gate.tracked_routes(), 8);
    for i in 0..8 {
        assert_eq!(gate.admitted(&format!("/route/{}", i), &Method::GET), 3);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_http_requests() {
    let mut config = GateConfig::default();
    config.gate.ceiling = 10;
    let gate = common::start_gate(config).await;
    let client = common::client();

    let mut tasks = Vec::new();
    for _ in 0..40 {
        let client = client.clone();
        let url = gate.url("/app/status");
        tasks.push(tokio::spawn(async move {
            client.get(url).send().await.unwrap().status().as_u16()
        }));
    }

    let mut ok = 0;
    let mut forbidden = 0;
    for task in tasks {
        match task.await.unwrap() {
            200 => ok += 1,
            403 => forbidden += 1,
            other => panic!("unexpected status {}", other),
        }
    }

    assert_eq!(ok, 10);
    assert_eq!(forbidden, 30);

    gate.stop().await;
}
