use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use academy_core::{
    AdminClient, AdminError, BulkDeleteCoordinator, CatalogRow, DeleteClient, DeleteOutcome,
    SelectedItem, SelectionTracker, TableId, TableRefresher,
};
use reqwest::blocking::Client;

fn client(timeout: Duration) -> AdminClient {
    let http = Client::builder()
        .timeout(timeout)
        .no_proxy()
        .build()
        .unwrap();
    AdminClient::from_http(http, "tok3n")
}

/// Read one HTTP request (headers plus Content-Length body)
fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..pos]).to_string();
            let len = head
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, v)| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= pos + 4 + len {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

/// Serve `responses.len()` connections with canned responses, returning the raw requests
fn serve(responses: Vec<(&'static str, &'static str)>) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let mut requests = Vec::new();
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().unwrap();
            requests.push(read_request(&mut stream));
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
        }
        requests
    });
    (format!("http://{}", addr), handle)
}

fn item(endpoint: &str, id: u64) -> SelectedItem {
    SelectedItem::new(TableId::Lessons, id, format!("Lesson {}", id), endpoint)
}

#[test]
fn test_delete_success_posts_form() {
    let (base, server) = serve(vec![("200 OK", r#"{"success": true}"#)]);
    let outcome = client(Duration::from_secs(5)).delete(&item(&format!("{}/delete", base), 42));
    assert_eq!(outcome, DeleteOutcome::Deleted);

    let requests = server.join().unwrap();
    let request = &requests[0];
    assert!(request.starts_with("POST /delete"));
    assert!(request.contains("IdToDelete=42"));
    assert!(request.contains("tok3n=1"));
}

#[test]
fn test_delete_refused() {
    let (base, server) = serve(vec![(
        "200 OK",
        r#"{"success": false, "message": "in use"}"#,
    )]);
    let outcome = client(Duration::from_secs(5)).delete(&item(&base, 1));
    assert_eq!(
        outcome,
        DeleteOutcome::Refused {
            reason: Some("in use".to_string())
        }
    );
    server.join().unwrap();
}

#[test]
fn test_server_error_is_transport_failure() {
    let (base, server) = serve(vec![("500 Internal Server Error", r#"{"success": true}"#)]);
    let outcome = client(Duration::from_secs(5)).delete(&item(&base, 1));
    match outcome {
        DeleteOutcome::Transport { error } => assert!(error.contains("500")),
        other => panic!("expected transport failure, got {:?}", other),
    }
    server.join().unwrap();
}

#[test]
fn test_garbage_body_is_transport_failure() {
    let (base, server) = serve(vec![("200 OK", "<html>login</html>")]);
    let outcome = client(Duration::from_secs(5)).delete(&item(&base, 1));
    assert!(matches!(outcome, DeleteOutcome::Transport { .. }));
    server.join().unwrap();
}

#[test]
fn test_connection_refused_is_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let outcome = client(Duration::from_secs(5)).delete(&item(&format!("http://{}", addr), 1));
    assert!(matches!(outcome, DeleteOutcome::Transport { .. }));
}

#[test]
fn test_slow_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            read_request(&mut stream);
            thread::sleep(Duration::from_secs(2));
        }
    });

    let outcome =
        client(Duration::from_millis(200)).delete(&item(&format!("http://{}", addr), 1));
    assert_eq!(outcome, DeleteOutcome::TimedOut);
}

#[test]
fn test_fetch_rows() {
    let (base, server) = serve(vec![(
        "200 OK",
        r#"[{"Id": 3, "SeriesName": "Basics", "LessonCount": 2,
             "ViewLessonsLink": "/v/3", "EditLink": "/e/3", "DeleteLink": "/d"}]"#,
    )]);
    let rows = client(Duration::from_secs(5))
        .fetch_rows(TableId::Series, &format!("{}/series", base))
        .unwrap();
    assert_eq!(rows.len(), 1);
    match &rows[0] {
        CatalogRow::Series(s) => assert_eq!(s.series_name, "Basics"),
        other => panic!("expected series, got {:?}", other),
    }

    let requests = server.join().unwrap();
    assert!(requests[0].starts_with("GET /series"));
}

#[test]
fn test_fetch_rows_status_error() {
    let (base, server) = serve(vec![("404 Not Found", "[]")]);
    let err = client(Duration::from_secs(5))
        .fetch_rows(TableId::Lessons, &base)
        .unwrap_err();
    assert!(matches!(err, AdminError::Status { status: 404, .. }));
    server.join().unwrap();
}

struct NoopRefresher(Vec<TableId>);

impl TableRefresher for NoopRefresher {
    fn refresh(&mut self, table: TableId) {
        self.0.push(table);
    }
}

#[test]
fn test_bulk_delete_over_http() {
    let (base, server) = serve(vec![
        ("200 OK", r#"{"success": true}"#),
        ("200 OK", r#"{"success": false}"#),
    ]);
    let endpoint = format!("{}/delete", base);
    let mut coordinator = BulkDeleteCoordinator::new(
        Arc::new(client(Duration::from_secs(5))),
        Duration::from_secs(10),
    );
    let mut tracker = SelectionTracker::new();
    let mut refresher = NoopRefresher(Vec::new());
    tracker.toggle(item(&endpoint, 1), true);
    tracker.toggle(item(&endpoint, 2), true);

    coordinator.request(TableId::Lessons, &tracker).unwrap();
    assert_eq!(coordinator.confirm(TableId::Lessons, &tracker).unwrap(), 2);

    let start = Instant::now();
    let reports = loop {
        let reports = coordinator.poll(&mut tracker, &mut refresher);
        if !reports.is_empty() {
            break reports;
        }
        assert!(start.elapsed() < Duration::from_secs(10));
        thread::sleep(Duration::from_millis(10));
    };

    assert_eq!(reports[0].expected, 2);
    assert_eq!(reports[0].failed, 1);
    assert!(tracker.is_empty());
    assert_eq!(refresher.0, vec![TableId::Lessons]);
    assert_eq!(server.join().unwrap().len(), 2);
}
