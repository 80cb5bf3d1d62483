//! Integration tests for FeedLoader using wiremock.
//!
//! These tests drive the loader end to end against a mock export endpoint.

use eventfeed_sheets::{ColumnMap, EventSource, FeedError, FeedLoader, RowParser};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Wrap a payload the way the export endpoint does.
fn envelope(json: serde_json::Value) -> String {
    format!(
        "/*O_o*/\ngoogle.visualization.Query.setResponse({});",
        json
    )
}

/// Helper to build a form-response row (timestamp column first, publish flag last).
fn form_row(date: &str, sort: Option<&str>, title: &str, publish: &str) -> serde_json::Value {
    serde_json::json!({
        "c": [
            {"v": "Date(2024,0,1,8,0,0)", "f": "1/1/2024 8:00:00"},
            {"v": date},
            sort.map(|s| serde_json::json!({"v": s})),
            {"v": title},
            {"v": format!("About {}", title)},
            null,
            null,
            {"v": publish}
        ]
    })
}

async fn serve(body: String) -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gviz/tq"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&mock_server)
        .await;
    mock_server
}

fn loader(server: &MockServer, columns: ColumnMap) -> FeedLoader {
    let endpoint = format!("{}/gviz/tq", server.uri());
    FeedLoader::new(&endpoint, RowParser::new(columns)).unwrap()
}

#[tokio::test]
async fn test_records_sorted_most_recent_first() {
    let body = envelope(serde_json::json!({
        "status": "ok",
        "table": {"rows": [
            form_row("Date(2024,2,5)", None, "Cleanup", "yes"),
            form_row("Date(2024,2,15)", None, "Garden", "yes"),
            form_row("Date(2024,1,28)", None, "Playground", "no")
        ]}
    }));
    let server = serve(body).await;

    let records = loader(&server, ColumnMap::form_responses()).fetch().await.unwrap();

    let dates: Vec<_> = records.iter().map(|r| r.display_date.as_str()).collect();
    assert_eq!(dates, vec!["March 15, 2024", "March 5, 2024", "February 28, 2024"]);
    assert!(records[0].published);
    assert!(!records[2].published);
    assert_eq!(records[2].alt, "Playground");
    assert_eq!(records[2].image, "images/placeholder.png");
}

#[tokio::test]
async fn test_sort_date_column_overrides_display_date() {
    let body = envelope(serde_json::json!({
        "table": {"rows": [
            form_row("Date(2024,2,5)", Some("Date(2024,5,1)"), "Summer Kickoff", "yes"),
            form_row("Date(2024,2,15)", None, "Garden", "yes")
        ]}
    }));
    let server = serve(body).await;

    let records = loader(&server, ColumnMap::form_responses()).fetch().await.unwrap();

    assert_eq!(records[0].title, "Summer Kickoff");
    assert_eq!(records[0].display_date, "March 5, 2024");
}

#[tokio::test]
async fn test_equal_sort_keys_keep_feed_order() {
    let body = envelope(serde_json::json!({
        "table": {"rows": [
            form_row("Date(2024,2,5)", None, "First", "yes"),
            form_row("Date(2024,2,5)", None, "Second", "yes"),
            form_row("Date(2024,2,5)", None, "Third", "yes")
        ]}
    }));
    let server = serve(body).await;

    let records = loader(&server, ColumnMap::form_responses()).fetch().await.unwrap();

    let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Second", "Third"]);
}

#[tokio::test]
async fn test_truncated_rows_use_defaults() {
    // Trailing empty cells are dropped from the export entirely
    let body = envelope(serde_json::json!({
        "table": {"rows": [
            {"c": [null, {"v": "Date(2024,2,15)"}, null, {"v": "Short Row"}]}
        ]}
    }));
    let server = serve(body).await;

    let records = loader(&server, ColumnMap::form_responses()).fetch().await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].description, "");
    assert_eq!(records[0].alt, "Short Row");
    assert!(!records[0].published);
}

#[tokio::test]
async fn test_malformed_body_loads_empty() {
    let server = serve("google.visualization.Query.setResponse(".to_string()).await;
    let loader = loader(&server, ColumnMap::form_responses());

    assert!(matches!(loader.fetch().await, Err(FeedError::Envelope(_))));
    assert!(loader.load().await.is_empty());
}

#[tokio::test]
async fn test_invalid_json_loads_empty() {
    let server = serve("cb({\"table\": {\"rows\": [{\"c\": [}]}});".to_string()).await;
    let loader = loader(&server, ColumnMap::form_responses());

    let err = loader.fetch().await.unwrap_err();
    assert!(err.is_parse());
    assert!(loader.load().await.is_empty());
}

#[tokio::test]
async fn test_server_error_loads_empty() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let loader = loader(&mock_server, ColumnMap::form_responses());

    let err = loader.fetch().await.unwrap_err();
    assert!(err.is_network());
    assert!(loader.load().await.is_empty());
}

#[tokio::test]
async fn test_every_load_refetches() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gviz/tq"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope(serde_json::json!({
            "table": {"rows": [form_row("Date(2024,2,5)", None, "Cleanup", "yes")]}
        }))))
        .expect(2)
        .mount(&mock_server)
        .await;

    let loader = loader(&mock_server, ColumnMap::form_responses());
    let first = loader.load().await;
    let second = loader.load().await;

    assert_eq!(first, second);
}
