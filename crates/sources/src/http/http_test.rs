//! HTTP source tests

use std::collections::HashSet;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode};
use parking_lot::Mutex;
use relay_sinks::syslog_udp::{SyslogSinkError, SyslogTransport, UdpTransport};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, UdpSocket};
use tokio::time::timeout;
use tower::ServiceExt;

use super::*;

/// Transport that records datagrams instead of sending them
#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<Vec<u8>>>,
}

impl RecordingTransport {
    fn sent(&self) -> Vec<Vec<u8>> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl SyslogTransport for RecordingTransport {
    async fn send(&self, datagram: &[u8]) -> Result<usize, SyslogSinkError> {
        self.sent.lock().push(datagram.to_vec());
        Ok(datagram.len())
    }

    fn destination(&self) -> &str {
        "recording"
    }
}

/// Which step a failing transport fails at
#[derive(Clone, Copy)]
enum FailAt {
    Dial,
    Write,
}

/// Transport that always fails
struct FailingTransport(FailAt);

#[async_trait]
impl SyslogTransport for FailingTransport {
    async fn send(&self, _datagram: &[u8]) -> Result<usize, SyslogSinkError> {
        Err(match self.0 {
            FailAt::Dial => SyslogSinkError::dial(
                "failing",
                io::Error::new(io::ErrorKind::AddrNotAvailable, "no sockets left"),
            ),
            FailAt::Write => SyslogSinkError::write(
                "failing",
                io::Error::new(io::ErrorKind::Other, "write failed"),
            ),
        })
    }

    fn destination(&self) -> &str {
        "failing"
    }
}

fn router_with(transport: Arc<dyn SyslogTransport>) -> axum::Router {
    build_router(Arc::new(HandlerState {
        source_id: "test-http".into(),
        transport,
    }))
}

fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(body.into())
        .unwrap()
}

async fn body_len(response: axum::response::Response) -> usize {
    axum::body::to_bytes(response.into_body(), 1024)
        .await
        .unwrap()
        .len()
}

/// Bind a UDP listener on an ephemeral loopback port
async fn udp_listener() -> (UdpSocket, String) {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = socket.local_addr().unwrap().to_string();
    (socket, addr)
}

async fn recv_datagram(socket: &UdpSocket) -> Vec<u8> {
    let mut buf = vec![0u8; 65_536];
    let (len, _) = timeout(Duration::from_secs(2), socket.recv_from(&mut buf))
        .await
        .expect("timed out waiting for datagram")
        .unwrap();
    buf.truncate(len);
    buf
}

// =============================================================================
// Handler Tests (recording transport)
// =============================================================================

#[tokio::test]
async fn test_relay_body() {
    let transport = Arc::new(RecordingTransport::default());
    let app = router_with(transport.clone());

    let response = app.oneshot(post("/", "test message")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(body_len(response).await, 0);

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].starts_with(b"<14>"));
    assert!(sent[0].ends_with(b" http-to-syslog: test message"));
}

#[tokio::test]
async fn test_relay_empty_body() {
    let transport = Arc::new(RecordingTransport::default());
    let app = router_with(transport.clone());

    let response = app.oneshot(post("/", Body::empty())).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].ends_with(b"http-to-syslog: "));
}

#[tokio::test]
async fn test_relay_binary_body_verbatim() {
    let transport = Arc::new(RecordingTransport::default());
    let app = router_with(transport.clone());

    let body: &'static [u8] = b"multi\nline\r\n\x00\xff body";
    let response = app
        .oneshot(post("/", Bytes::from_static(body)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(transport.sent()[0].ends_with(body));
}

#[tokio::test]
async fn test_relay_body_larger_than_axum_default_limit() {
    let transport = Arc::new(RecordingTransport::default());
    let app = router_with(transport.clone());

    // axum's DefaultBodyLimit is 2 MiB; the relay reads past it
    let body = vec![b'a'; 3 * 1024 * 1024];
    let response = app.oneshot(post("/", body.clone())).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].len() > body.len());
    assert!(sent[0].ends_with(&body));
}

#[tokio::test]
async fn test_any_method_and_path_is_relayed() {
    let transport = Arc::new(RecordingTransport::default());
    let app = router_with(transport.clone());

    for (method, uri) in [
        ("GET", "/"),
        ("PUT", "/logs"),
        ("DELETE", "/a/b/c?x=1"),
        ("PATCH", "/health"),
        ("POST", "/v1/events"),
    ] {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(format!("{method} {uri}")))
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT, "{method} {uri}");
    }

    let sent = transport.sent();
    assert_eq!(sent.len(), 5);
    assert!(sent[2].ends_with(b"http-to-syslog: DELETE /a/b/c?x=1"));
}

#[tokio::test]
async fn test_body_read_failure_relays_empty_message() {
    let transport = Arc::new(RecordingTransport::default());
    let app = router_with(transport.clone());

    let chunks: Vec<Result<Bytes, io::Error>> = vec![
        Ok(Bytes::from_static(b"partial")),
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "client went away")),
    ];
    let body = Body::from_stream(futures_util::stream::iter(chunks));

    let response = app.oneshot(post("/", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].ends_with(b"http-to-syslog: "));
}

#[tokio::test]
async fn test_dial_failure_returns_500() {
    let app = router_with(Arc::new(FailingTransport(FailAt::Dial)));

    let response = app.oneshot(post("/", "hello")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_len(response).await, 0);
}

#[tokio::test]
async fn test_write_failure_returns_500() {
    let app = router_with(Arc::new(FailingTransport(FailAt::Write)));

    let response = app.oneshot(post("/", "hello")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_len(response).await, 0);
}

#[tokio::test]
async fn test_server_keeps_serving_after_failure() {
    let app = router_with(Arc::new(FailingTransport(FailAt::Write)));

    for _ in 0..3 {
        let response = app.clone().oneshot(post("/", "again")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

// =============================================================================
// Handler Tests (real UDP)
// =============================================================================

#[tokio::test]
async fn test_relay_to_udp_listener() {
    let (socket, addr) = udp_listener().await;
    let app = router_with(Arc::new(UdpTransport::new(addr)));

    let response = app.oneshot(post("/", "test message")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let datagram = recv_datagram(&socket).await;
    assert!(datagram.starts_with(b"<14>"));
    assert!(datagram.ends_with(b"http-to-syslog: test message"));
}

#[tokio::test]
async fn test_no_udp_listener_still_204() {
    let (socket, addr) = udp_listener().await;
    drop(socket);

    let app = router_with(Arc::new(UdpTransport::new(addr)));
    let response = app.oneshot(post("/", "into the void")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_unopenable_destination_returns_500() {
    let app = router_with(Arc::new(UdpTransport::new("255.255.255.255:4242")));

    let response = app.oneshot(post("/", "hello")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_concurrent_requests_do_not_interleave() {
    let (socket, addr) = udp_listener().await;
    let app = router_with(Arc::new(UdpTransport::new(addr)));

    let mut handles = Vec::new();
    for i in 0..100 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            let body = format!("request-{i:03}-{}", "x".repeat(i));
            app.oneshot(post("/", body)).await.unwrap().status()
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::NO_CONTENT);
    }

    let mut bodies = HashSet::new();
    for _ in 0..100 {
        let datagram = recv_datagram(&socket).await;
        let text = String::from_utf8(datagram).unwrap();
        let (_, body) = text.split_once(" http-to-syslog: ").unwrap();
        bodies.insert(body.to_string());
    }

    let expected: HashSet<String> = (0..100)
        .map(|i| format!("request-{i:03}-{}", "x".repeat(i)))
        .collect();
    assert_eq!(bodies, expected);
}

// =============================================================================
// Source Tests
// =============================================================================

#[tokio::test]
async fn test_bind_reports_local_addr() {
    let source = HttpRelaySource::new(
        HttpSourceConfig::with_listen("127.0.0.1:0"),
        Arc::new(RecordingTransport::default()),
    );
    assert_eq!(source.source_id(), "http");

    let bound = source.bind().await.unwrap();
    assert!(bound.local_addr().ip().is_loopback());
    assert_ne!(bound.local_addr().port(), 0);
}

#[tokio::test]
async fn test_bind_without_host_listens_on_all_interfaces() {
    let (socket, destination) = udp_listener().await;
    let source = HttpRelaySource::new(
        HttpSourceConfig::with_listen(":0"),
        Arc::new(UdpTransport::new(destination)),
    );

    let bound = source.bind().await.unwrap();
    assert!(bound.local_addr().ip().is_unspecified());
    let port = bound.local_addr().port();
    assert_ne!(port, 0);

    let cancel = CancellationToken::new();
    let server = tokio::spawn(bound.serve(cancel.clone()));

    // Reachable over IPv4 loopback whichever any-address was bound
    let mut stream = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
    stream
        .write_all(
            b"POST / HTTP/1.1\r\nHost: relay\r\nContent-Length: 5\r\nConnection: close\r\n\r\nhello",
        )
        .await
        .unwrap();
    let mut response = Vec::new();
    timeout(Duration::from_secs(2), stream.read_to_end(&mut response))
        .await
        .expect("timed out waiting for response")
        .unwrap();
    assert!(response.starts_with(b"HTTP/1.1 204"));

    assert!(recv_datagram(&socket).await.ends_with(b"http-to-syslog: hello"));

    cancel.cancel();
    server.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_bind_failure() {
    let source = HttpRelaySource::new(
        HttpSourceConfig::with_listen("not-an-address"),
        Arc::new(RecordingTransport::default()),
    );

    let err = source.bind().await.err().unwrap();
    assert!(matches!(err, HttpSourceError::Bind { .. }));
    assert!(err.to_string().contains("not-an-address"));
}

#[tokio::test]
async fn test_run_stops_on_cancel() {
    let source = HttpRelaySource::new(
        HttpSourceConfig::with_listen("127.0.0.1:0"),
        Arc::new(RecordingTransport::default()),
    );

    let cancel = CancellationToken::new();
    let handle = tokio::spawn(source.run(cancel.clone()));

    cancel.cancel();
    let result = timeout(Duration::from_secs(2), handle)
        .await
        .expect("source did not stop")
        .unwrap();
    assert!(result.is_ok());
}
