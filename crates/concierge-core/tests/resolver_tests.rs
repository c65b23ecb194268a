//! HTTP resolver tests against single-shot local mock services.

use std::{
    io::{Read, Write},
    net::{TcpListener, TcpStream},
    thread,
    time::Duration,
};

use concierge_core::{HttpIntentResolver, IntentResolver, PlanningRequest, WorkflowError};

/// Spawns a one-request HTTP service on a local port. Reads the full
/// request, writes `reply`, then either closes the connection or holds
/// it open to simulate a stalled response body.
fn spawn_service(reply: String, hold_open: bool) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock service");
    let addr = listener.local_addr().expect("local addr");
    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            read_request(&mut stream);
            let _ = stream.write_all(reply.as_bytes());
            if hold_open {
                thread::sleep(Duration::from_secs(5));
            }
        }
    });
    format!("http://{addr}/resolve")
}

/// Reads until the request headers and declared body length have arrived.
fn read_request(stream: &mut TcpStream) {
    let mut request = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = stream.read(&mut buf).expect("read request");
        if n == 0 {
            return;
        }
        request.extend_from_slice(&buf[..n]);
        if let Some(headers_end) = request.windows(4).position(|w| w == b"\r\n\r\n") {
            let headers = String::from_utf8_lossy(&request[..headers_end]).to_lowercase();
            let body_len = headers
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if request.len() >= headers_end + 4 + body_len {
                return;
            }
        }
    }
}

fn request() -> PlanningRequest {
    PlanningRequest {
        user_message: "ride to the airport".to_string(),
        session: Some("token".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn resolve_times_out_when_body_stalls() {
    // Headers promise a body that never arrives.
    let endpoint = spawn_service(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n"
            .to_string(),
        true,
    );
    let resolver = HttpIntentResolver::new(endpoint).with_timeout(Duration::from_millis(200));

    let outcome = tokio::time::timeout(Duration::from_secs(2), resolver.resolve(&request())).await;

    let err = outcome
        .expect("resolve must return within its configured timeout")
        .expect_err("stalled body must surface as a network error");
    assert!(matches!(err, WorkflowError::Network { .. }));
    assert!(err.to_string().contains("timed out"));
}

#[tokio::test]
async fn resolve_maps_non_2xx_to_network_error() {
    let body = "service busy";
    let reply = format!(
        "HTTP/1.1 503 Service Unavailable\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let endpoint = spawn_service(reply, false);
    let resolver = HttpIntentResolver::new(endpoint);

    let err = resolver
        .resolve(&request())
        .await
        .expect_err("non-2xx must fail");
    assert!(matches!(err, WorkflowError::Network { .. }));
    let message = err.to_string();
    assert!(message.contains("503"));
    assert!(message.contains("service busy"));
}

#[tokio::test]
async fn resolve_parses_success_payload() {
    let body = r#"{"success":true,"bookingId":"bk-9","bookingType":"ride"}"#;
    let reply = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let endpoint = spawn_service(reply, false);
    let resolver = HttpIntentResolver::new(endpoint);

    let response = resolver
        .resolve(&request())
        .await
        .expect("complete response parses");
    assert!(response.success);
    assert_eq!(response.booking_id.as_deref(), Some("bk-9"));
}
