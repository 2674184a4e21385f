use std::sync::Arc;

use crate::tests::utils::{get, listing, test_app, FakeApi};
use serde_json::Value;

fn spread_api() -> Arc<FakeApi> {
    Arc::new(FakeApi::with_pages(vec![
        vec![
            listing("IN1", 500_000.0, 43.14, -80.26),
            listing("OUT1", 510_000.0, 43.40, -80.26),
        ],
        vec![
            listing("IN2", 520_000.0, 43.12, -80.30),
            listing("FAR", 530_000.0, 49.0, -123.0),
        ],
    ]))
}

const VIEWPORT: &str = "north=43.2&south=43.1&east=-80.2&west=-80.35";

fn json_body(app: &crate::app::App, uri: &str) -> (u16, Value) {
    let (status, body) = get(app, uri);
    (status, serde_json::from_str(&body).unwrap())
}

#[test]
fn zoomed_in_map_returns_only_pins_in_view() {
    let api = spread_api();
    let app = test_app(api.clone());

    let (status, json) = json_body(&app, &format!("/api/map?{VIEWPORT}&zoom=12"));

    assert_eq!(status, 200);
    assert_eq!(json["total"], 4);
    assert_eq!(json["filtering"], true);
    let ids: Vec<&str> = json["pins"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["mlsNumber"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["IN1", "IN2"]);
    assert_eq!(json["pins"][0]["href"], "/property/IN1");
    assert_eq!(json["pins"][0]["price"], "$500,000");
    assert_eq!(json["pagination"]["count"], 2);
    assert_eq!(api.requested_pages(), vec![1, 2]);
}

#[test]
fn zoomed_out_map_returns_everything_in_service_area() {
    let app = test_app(spread_api());

    let (_, json) = json_body(&app, &format!("/api/map?{VIEWPORT}&zoom=8"));
    assert_eq!(json["filtering"], false);
    assert_eq!(json["pins"].as_array().unwrap().len(), 4);
}

#[test]
fn no_viewport_means_no_filtering() {
    let app = test_app(spread_api());

    let (status, json) = json_body(&app, "/api/map");
    assert_eq!(status, 200);
    assert_eq!(json["pins"].as_array().unwrap().len(), 4);
}

#[test]
fn partial_viewport_is_a_json_bad_request() {
    let app = test_app(spread_api());

    let (status, json) = json_body(&app, "/api/map?north=43.2&zoom=12");
    assert_eq!(status, 400);
    assert!(json["error"].as_str().unwrap().contains("south"));
    assert_eq!(json["retryable"], false);
}

#[test]
fn first_page_failure_is_a_json_upstream_error() {
    let api = spread_api();
    api.fail_page(1);
    let app = test_app(api);

    let (status, json) = json_body(&app, "/api/map");
    assert_eq!(status, 502);
    assert_eq!(json["retryable"], true);
}
