use std::collections::VecDeque;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use mj_console::client::{ApiClient, Role};
use mj_console::record::{LogRecord, TaskAction, TaskStatus};
use mj_console::viewer::LogViewer;

/// Minimal canned-response HTTP server: records every raw request and
/// answers with queued bodies (or an empty success envelope).
struct Fixture {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
    responses: Arc<Mutex<VecDeque<String>>>,
    stop: Arc<AtomicBool>,
}

impl Fixture {
    fn spawn() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind fixture");
        let addr = listener.local_addr().expect("fixture addr");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let responses = Arc::new(Mutex::new(VecDeque::new()));
        let stop = Arc::new(AtomicBool::new(false));

        {
            let requests = Arc::clone(&requests);
            let responses = Arc::clone(&responses);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                for conn in listener.incoming() {
                    if stop.load(Ordering::SeqCst) {
                        break;
                    }
                    let Ok(mut stream) = conn else { continue };
                    let raw = read_request(&mut stream);
                    if raw.is_empty() {
                        continue;
                    }
                    requests.lock().expect("requests lock").push(raw);
                    let body = responses
                        .lock()
                        .expect("responses lock")
                        .pop_front()
                        .unwrap_or_else(|| {
                            r#"{"success":true,"message":"","data":[]}"#.to_string()
                        });
                    let resp = format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    );
                    let _ = stream.write_all(resp.as_bytes());
                }
            });
        }

        Self {
            addr,
            requests,
            responses,
            stop,
        }
    }

    fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn push_response(&self, body: String) {
        self.responses.lock().expect("responses lock").push_back(body);
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        // Unblock the accept loop.
        let _ = TcpStream::connect(self.addr);
    }
}

fn read_request(stream: &mut TcpStream) -> String {
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .expect("read timeout");
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let header_end = find_header_end(&buf);
        if let Some(end) = header_end {
            let headers = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
            let content_length = headers
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + content_length {
                break;
            }
        }
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
            Err(_) => break,
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

fn rec(id: i64) -> LogRecord {
    LogRecord {
        id,
        mj_id: format!("task-{id}"),
        channel_id: id % 5,
        submit_time: Some(1_700_000_000_000 + id * 1000),
        finish_time: Some(1_700_000_030_000 + id * 1000),
        action: TaskAction::Imagine,
        code: 1,
        status: TaskStatus::Success,
        progress: Some("100%".into()),
        image_url: None,
        prompt: format!("prompt {id}"),
        prompt_en: format!("prompt {id}"),
        fail_reason: None,
    }
}

fn ok_body(records: &[LogRecord]) -> String {
    serde_json::json!({
        "success": true,
        "message": "",
        "data": records,
    })
    .to_string()
}

fn viewer(fixture: &Fixture, role: Role) -> LogViewer {
    let client = ApiClient::new(&fixture.base_url(), None).expect("client");
    LogViewer::new(client, role, 10)
}

#[test]
fn admin_route_carries_every_filter_field() {
    let fx = Fixture::spawn();
    let mut v = viewer(&fx, Role::Admin);
    v.filters.channel_id = "7".into();
    v.filters.mj_id = "abc".into();
    v.filters.start_timestamp = 1000;
    v.filters.end_timestamp = 2000;

    fx.push_response(ok_body(&[rec(1), rec(2)]));
    v.load(0).expect("load");

    let reqs = fx.requests();
    assert_eq!(reqs.len(), 1);
    assert!(
        reqs[0].starts_with(
            "GET /api/mj/?p=0&channel_id=7&mj_id=abc&start_timestamp=1000&end_timestamp=2000"
        ),
        "unexpected request: {}",
        reqs[0]
    );
    assert_eq!(v.pager().len(), 2);
    assert_eq!(v.pager().records()[0].id, 1);
}

#[test]
fn self_route_omits_the_channel_parameter() {
    let fx = Fixture::spawn();
    let mut v = viewer(&fx, Role::User);
    v.filters.mj_id = "abc".into();
    v.filters.start_timestamp = 1000;
    v.filters.end_timestamp = 2000;

    v.load(0).expect("load");

    let reqs = fx.requests();
    assert!(
        reqs[0].starts_with("GET /api/mj/self/?p=0&mj_id=abc&start_timestamp=1000"),
        "unexpected request: {}",
        reqs[0]
    );
    assert!(!reqs[0].contains("channel_id"));
}

#[test]
fn mount_refresh_uses_the_default_window() {
    let fx = Fixture::spawn();
    let mut v = viewer(&fx, Role::Admin);
    let start = v.filters.start_timestamp;
    let end = v.filters.end_timestamp;
    assert_eq!(end - start, 2_592_000_000 + 3_600_000);

    v.refresh().expect("refresh");

    let reqs = fx.requests();
    assert!(reqs[0].contains("p=0&"));
    assert!(reqs[0].contains(&format!("start_timestamp={start}")));
    assert!(reqs[0].contains(&format!("end_timestamp={end}")));
    assert_eq!(v.pager().active_page(), 1);
}

#[test]
fn forward_pagination_fetches_and_appends() {
    let fx = Fixture::spawn();
    let mut v = viewer(&fx, Role::Admin);

    let page0: Vec<LogRecord> = (0..10).map(rec).collect();
    fx.push_response(ok_body(&page0));
    v.refresh().expect("refresh");
    assert_eq!(v.pager().estimated_total(), 20);

    let page1: Vec<LogRecord> = (10..14).map(rec).collect();
    fx.push_response(ok_body(&page1));
    v.go_to_page(2).expect("page 2");

    let reqs = fx.requests();
    assert!(reqs[1].starts_with("GET /api/mj/?p=1&"));
    assert_eq!(v.pager().len(), 14);
    assert_eq!(v.pager().active_page(), 2);
    assert_eq!(v.pager().estimated_total(), 24);
    assert_eq!(v.visible_rows().len(), 4);
    // Prefix untouched by the append.
    assert_eq!(v.pager().records()[0].id, 0);

    // Page 2 is now in-window: going back and forth is purely local.
    v.go_to_page(1).expect("page 1");
    v.go_to_page(2).expect("page 2 again");
    assert_eq!(fx.requests().len(), 2);
}

#[test]
fn query_action_replaces_the_cache_entirely() {
    let fx = Fixture::spawn();
    let mut v = viewer(&fx, Role::Admin);

    fx.push_response(ok_body(&(0..10).map(rec).collect::<Vec<_>>()));
    v.refresh().expect("first refresh");
    fx.push_response(ok_body(&(10..14).map(rec).collect::<Vec<_>>()));
    v.go_to_page(2).expect("page 2");
    assert_eq!(v.pager().len(), 14);

    fx.push_response(ok_body(&[rec(100), rec(101), rec(102)]));
    v.refresh().expect("second refresh");

    let ids: Vec<i64> = v.pager().records().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![100, 101, 102]);
    assert_eq!(v.pager().active_page(), 1);
    assert_eq!(v.pager().estimated_total(), 13);
}

#[test]
fn envelope_failure_surfaces_message_and_keeps_cache() {
    let fx = Fixture::spawn();
    let mut v = viewer(&fx, Role::Admin);

    fx.push_response(ok_body(&(0..10).map(rec).collect::<Vec<_>>()));
    v.refresh().expect("refresh");

    fx.push_response(r#"{"success":false,"message":"无权查看","data":null}"#.to_string());
    let err = v.go_to_page(2).expect_err("应当失败");
    assert!(err.to_string().contains("无权查看"));
    assert_eq!(v.pager().len(), 10, "cache must be left untouched");
    assert_eq!(v.pager().estimated_total(), 20);
}

#[test]
fn action_filter_change_triggers_a_refresh() {
    let fx = Fixture::spawn();
    let mut v = viewer(&fx, Role::Admin);

    fx.push_response(ok_body(&(0..10).map(rec).collect::<Vec<_>>()));
    v.refresh().expect("refresh");
    fx.push_response(ok_body(&[rec(50)]));
    v.set_action_filter(Some(TaskAction::Upscale))
        .expect("filter refresh");

    assert_eq!(fx.requests().len(), 2);
    assert_eq!(v.pager().len(), 1);
    assert_eq!(v.pager().active_page(), 1);

    // Same value again: no refetch.
    v.set_action_filter(Some(TaskAction::Upscale)).expect("noop");
    assert_eq!(fx.requests().len(), 2);
}

#[test]
fn bearer_token_rides_on_requests() {
    let fx = Fixture::spawn();
    let client = ApiClient::new(&fx.base_url(), Some("sk-test".into())).expect("client");
    let mut v = LogViewer::new(client, Role::Admin, 10);

    v.load(0).expect("load");
    let reqs = fx.requests();
    assert!(
        reqs[0].to_ascii_lowercase().contains("authorization: bearer sk-test"),
        "missing auth header: {}",
        reqs[0]
    );
}

#[test]
fn purge_returns_the_count_from_the_envelope() {
    let fx = Fixture::spawn();
    let client = ApiClient::new(&fx.base_url(), None).expect("client");

    fx.push_response(r#"{"success":true,"message":"","data":42}"#.to_string());
    let purged = client.purge_logs(1_700_000_000).expect("purge");
    assert_eq!(purged, 42);

    let reqs = fx.requests();
    assert!(reqs[0].starts_with("DELETE /api/log/?target_timestamp=1700000000"));
}

#[test]
fn set_option_puts_key_and_value() {
    let fx = Fixture::spawn();
    let client = ApiClient::new(&fx.base_url(), None).expect("client");

    fx.push_response(r#"{"success":true,"message":"","data":null}"#.to_string());
    client
        .set_option("mj_notify_enabled", "true")
        .expect("set option");

    let reqs = fx.requests();
    assert!(reqs[0].starts_with("PUT /api/option/"));
    assert!(reqs[0].contains(r#""key":"mj_notify_enabled""#));
    assert!(reqs[0].contains(r#""value":"true""#));
}
