//! End-to-end tests of the fetch → parse → report pipeline against a
//! one-shot HTTP server on localhost.
//!
//! Each server answers exactly one request with a canned status and body,
//! and hands the request line back so tests can check the wire shape.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use littlefalls_service::ingest::{http, nwps, usgs};
use littlefalls_service::model::{FetchError, NwisError, NwpsError};

const NWIS_FIXTURE: &str = include_str!("../src/ingest/fixtures/nwis_little_falls.json");

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

/// Serves one response, returning the base URL and a receiver for the
/// request line (e.g. `GET /path HTTP/1.1`).
fn serve_once(status: u16, body: String) -> (String, Receiver<String>) {
    let declared = body.len();
    serve_raw(status, declared, body)
}

/// Like `serve_once`, but advertises `declared` bytes of body and closes the
/// connection after writing `body`, however long it actually is.
fn serve_raw(status: u16, declared: usize, body: String) -> (String, Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind localhost");
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();
        loop {
            let mut header = String::new();
            if reader.read_line(&mut header).unwrap() == 0 || header == "\r\n" {
                break;
            }
        }
        tx.send(request_line.trim_end().to_string()).unwrap();

        let mut stream = stream;
        let response = format!(
            "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status, declared, body
        );
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
    });

    (format!("http://{}", addr), rx)
}

fn stageflow_json(count: usize) -> String {
    let data: Vec<String> = (0..count)
        .map(|i| {
            format!(
                r#"{{ "validTime": "2024-06-30T{:02}:00:00Z", "generatedTime": "2024-06-30T23:00:00Z", "primary": 3.5, "secondary": {}.0 }}"#,
                i, i
            )
        })
        .collect();
    format!(
        r#"{{ "issuedTime": "2024-06-30T23:00:00Z", "primaryName": "Stage", "primaryUnits": "ft",
             "secondaryName": "Flow", "secondaryUnits": "kcfs", "data": [{}] }}"#,
        data.join(",")
    )
}

// ---------------------------------------------------------------------------
// HTTP Fetch
// ---------------------------------------------------------------------------

#[test]
fn test_fetch_returns_body_on_200() {
    let (base, _rx) = serve_once(200, "{\"ok\":true}".to_string());
    let client = http::build_client().unwrap();
    let body = http::fetch(&client, &format!("{}/anything", base)).unwrap();
    assert_eq!(body, b"{\"ok\":true}");
}

#[test]
fn test_fetch_reports_status_code() {
    let (base, _rx) = serve_once(503, "Service Unavailable".to_string());
    let client = http::build_client().unwrap();
    assert_eq!(
        http::fetch(&client, &format!("{}/", base)),
        Err(FetchError::Status(503))
    );
}

#[test]
fn test_fetch_truncated_body_is_body_error() {
    let (base, _rx) = serve_raw(200, 1000, "{\"partial\"".to_string());
    let client = http::build_client().unwrap();
    let result = http::fetch(&client, &format!("{}/", base));
    assert!(
        matches!(result, Err(FetchError::Body(_))),
        "expected body error, got {:?}",
        result
    );
}

// ---------------------------------------------------------------------------
// NWIS
// ---------------------------------------------------------------------------

#[test]
fn test_nwis_request_shape_and_summary() {
    let (base, rx) = serve_once(200, NWIS_FIXTURE.to_string());
    let client = http::build_client().unwrap();

    let text = usgs::site_report(&client, &format!("{}/nwis/iv/", base), "01646500");

    assert_eq!(
        rx.recv().unwrap(),
        "GET /nwis/iv/?format=json&parameterCd=00065,00060,00010&sites=01646500 HTTP/1.1"
    );
    assert!(text.starts_with("POTOMAC RIVER NEAR WASH, DC LITTLE FALLS PUMP STA\n"));
    assert!(text.contains("Flow CFS       : 1570"));
}

#[test]
fn test_nwis_503_is_status_error_not_parse_error() {
    let (base, _rx) = serve_once(503, "<html>down</html>".to_string());
    let client = http::build_client().unwrap();

    let result = usgs::fetch_gauge_data(&client, &format!("{}/nwis/iv/", base), "01646500");
    assert!(
        matches!(result, Err(NwisError::Fetch(FetchError::Status(503)))),
        "expected status 503, got {:?}",
        result.map(|_| ())
    );
}

#[test]
fn test_nwis_report_renders_failure_inline() {
    let (base, _rx) = serve_once(503, String::new());
    let client = http::build_client().unwrap();
    let text = usgs::site_report(&client, &format!("{}/nwis/iv/", base), "01646500");
    assert_eq!(text, "Failed to get site: status error: 503");
}

#[test]
fn test_nwis_truncated_body_renders_inline() {
    let (base, _rx) = serve_raw(200, 1000, NWIS_FIXTURE[..200].to_string());
    let client = http::build_client().unwrap();

    let result = usgs::fetch_gauge_data(&client, &format!("{}/nwis/iv/", base), "01646500");
    assert!(matches!(result, Err(NwisError::Fetch(FetchError::Body(_)))));

    let (base, _rx) = serve_raw(200, 1000, NWIS_FIXTURE[..200].to_string());
    let text = usgs::site_report(&client, &format!("{}/nwis/iv/", base), "01646500");
    assert!(text.starts_with("Failed to get site: read body: "), "got {}", text);
}

#[test]
fn test_nwis_garbage_body_is_parse_error() {
    let (base, _rx) = serve_once(200, "not json".to_string());
    let client = http::build_client().unwrap();
    let result = usgs::fetch_gauge_data(&client, &format!("{}/nwis/iv/", base), "01646500");
    assert!(matches!(result, Err(NwisError::ParseError(_))));
}

// ---------------------------------------------------------------------------
// NWPS
// ---------------------------------------------------------------------------

#[test]
fn test_observed_report_over_http() {
    let (base, rx) = serve_once(200, stageflow_json(15));
    let client = http::build_client().unwrap();

    let text = nwps::observed_report(&client, &format!("{}/nwps/v1", base), "brkm2");

    assert_eq!(
        rx.recv().unwrap(),
        "GET /nwps/v1/gauges/brkm2/stageflow/observed HTTP/1.1"
    );
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 12);
    assert!(lines[1].ends_with("ft:3.50 kcfs:14.00"));
    assert!(lines[11].ends_with("ft:3.50 kcfs:4.00"));
}

#[test]
fn test_forecast_report_over_http() {
    let (base, rx) = serve_once(200, stageflow_json(15));
    let client = http::build_client().unwrap();

    let text = nwps::forecast_report(&client, &format!("{}/nwps/v1", base), "brkm2");

    assert!(rx.recv().unwrap().contains("/stageflow/forecast "));
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 16);
    assert!(lines[1].ends_with("kcfs:0.00"));
    assert!(lines[15].ends_with("kcfs:14.00"));
}

#[test]
fn test_forecast_failure_is_text() {
    let (base, _rx) = serve_once(404, String::new());
    let client = http::build_client().unwrap();
    let text = nwps::forecast_report(&client, &format!("{}/nwps/v1", base), "zzzz9");
    assert_eq!(text, "Failed to get Site info: status error: 404\n");
}

#[test]
fn test_nwps_fetch_product_parse_error() {
    let (base, _rx) = serve_once(200, "\"not a product\"".to_string());
    let client = http::build_client().unwrap();
    let result = nwps::fetch_product(
        &client,
        &format!("{}/nwps/v1", base),
        "brkm2",
        nwps::Product::Observed,
    );
    assert!(matches!(result, Err(NwpsError::ParseError(_))));
}
