mod common;
use crate::common::{init_tracing, with_timeout};

use std::error::Error;
use std::fs;
use std::sync::Arc;

use tempfile::tempdir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;

use config_watcher::fs::RealFileSystem;
use config_watcher::metrics::{server, MetricsSink, PrometheusMetrics};
use config_watcher::watch::FingerprintEngine;

type TestResult = Result<(), Box<dyn Error>>;

async fn http_get(addr: std::net::SocketAddr, path: &str) -> std::io::Result<String> {
    let mut stream = TcpStream::connect(addr).await?;
    let request = format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await?;

    let mut response = String::new();
    stream.read_to_string(&mut response).await?;
    Ok(response)
}

#[tokio::test]
async fn endpoint_exposes_fingerprint_metrics() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    fs::write(dir.path().join("a.conf"), "X")?;

    let metrics = Arc::new(PrometheusMetrics::new()?);
    let engine = FingerprintEngine::new(Arc::new(RealFileSystem), metrics.clone());
    let fingerprint = engine.compute(dir.path()).await;
    metrics.fingerprint_changed();
    metrics.process_restarted();

    let listener = server::bind("127.0.0.1:0".parse()?).await?;
    let addr = listener.local_addr()?;
    let cancel = CancellationToken::new();
    let task = tokio::spawn(server::serve(listener, metrics, cancel.clone()));

    let response = with_timeout(http_get(addr, "/metrics")).await?;

    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains("cfgw_hash_calculated_total 1"));
    assert!(response.contains("cfgw_hash_updates_total 1"));
    assert!(response.contains("cfgw_process_restarts_total 1"));
    assert!(response.contains(&format!("total_hash=\"{}\"", fingerprint.as_str())));
    let file = dir.path().join("a.conf");
    assert!(response.contains(&format!("file=\"{}\"", file.display())));

    cancel.cancel();
    with_timeout(task).await??;
    Ok(())
}

#[tokio::test]
async fn cancellation_stops_the_listener() -> TestResult {
    init_tracing();

    let metrics = Arc::new(PrometheusMetrics::new()?);
    let listener = server::bind("127.0.0.1:0".parse()?).await?;
    let addr = listener.local_addr()?;
    let cancel = CancellationToken::new();
    let task = tokio::spawn(server::serve(listener, metrics, cancel.clone()));

    cancel.cancel();
    with_timeout(task).await??;

    assert!(TcpStream::connect(addr).await.is_err());
    Ok(())
}

#[tokio::test]
async fn binding_a_taken_port_fails() -> TestResult {
    init_tracing();

    let first = server::bind("127.0.0.1:0".parse()?).await?;
    let addr = first.local_addr()?;

    let err = server::bind(addr).await.unwrap_err();
    assert!(format!("{err:#}").contains("binding metrics listener"));
    Ok(())
}
