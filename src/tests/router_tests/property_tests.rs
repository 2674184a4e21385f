use std::sync::Arc;

use crate::tests::utils::{get, listing, test_app, FakeApi};
use serde_json::json;

fn sample_api() -> Arc<FakeApi> {
    Arc::new(FakeApi::with_pages(vec![vec![
        listing("H100", 649_900.0, 43.14, -80.26),
        listing("H200", 720_000.0, 43.15, -80.27),
        json!({ "mlsNumber": "L1", "class": "ResidentialProperty", "type": "Lease", "listPrice": 2400 }),
    ]]))
}

#[test]
fn details_page_renders_listing_and_similar() {
    let app = test_app(sample_api());

    let (status, body) = get(&app, "/property/H100");

    assert_eq!(status, 200);
    assert!(body.contains("12 Dufferin Ave, Brantford, ON, N3T 1A1"));
    assert!(body.contains("$649,900"));
    assert!(body.contains("3 + 1"));
    assert!(body.contains("Sunny bungalow"));
    assert!(body.contains("Similar listings"));
    assert!(body.contains(r#"href="/property/H200""#));
    assert!(!body.contains(r#"href="/property/H100""#));
}

#[test]
fn excluded_listing_is_not_found() {
    let app = test_app(sample_api());

    let (status, body) = get(&app, "/property/L1");
    assert_eq!(status, 404);
    assert!(body.contains("no longer available"));
}

#[test]
fn missing_mls_is_not_found() {
    let app = test_app(sample_api());
    assert_eq!(get(&app, "/property/").0, 404);
    assert_eq!(get(&app, "/property/a/b").0, 404);
}

#[test]
fn upstream_auth_failure_offers_retry() {
    let api = sample_api();
    api.fail_auth();
    let app = test_app(api);

    let (status, body) = get(&app, "/property/H100");
    assert_eq!(status, 502);
    assert!(body.contains("Try again"));
}
