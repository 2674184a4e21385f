use std::sync::Arc;

use crate::tests::utils::{get, listing, test_app, FakeApi};
use serde_json::json;

fn lease(mls: &str) -> serde_json::Value {
    json!({ "mlsNumber": mls, "class": "ResidentialProperty", "type": "Lease", "listPrice": 2400 })
}

fn commercial(mls: &str) -> serde_json::Value {
    json!({ "mlsNumber": mls, "class": "CommercialProperty", "type": "Sale", "listPrice": 900000 })
}

#[test]
fn search_page_shows_reconciled_total_and_cards() {
    let api = Arc::new(FakeApi::with_pages(vec![vec![
        listing("H100", 649_900.0, 43.14, -80.26),
        lease("L1"),
        commercial("C1"),
        listing("H200", 1_250_000.0, 43.15, -80.27),
    ]]));
    let app = test_app(api);

    let (status, body) = get(&app, "/");

    assert_eq!(status, 200);
    assert!(body.contains("2 Properties Found"), "body: {body}");
    assert!(body.contains("Showing 1 - 2 of 2 results"));
    assert!(body.contains("$649,900"));
    assert!(body.contains("$1,250,000"));
    assert!(body.contains(r#"href="/property/H100""#));
    assert!(!body.contains("L1"));
    assert!(!body.contains("C1"));
}

#[test]
fn query_string_reaches_the_listings_source() {
    let api = Arc::new(FakeApi::with_pages(vec![vec![listing("H1", 500_000.0, 43.14, -80.26)]]));
    let app = test_app(api.clone());

    let (status, body) = get(&app, "/?q=Dufferin+Ave&beds=3%2B&price=0-500000&page=1");
    assert_eq!(status, 200);

    let first = &api.searches()[0];
    assert_eq!(first.query.as_deref(), Some("Dufferin Ave"));
    assert_eq!(first.bedrooms, Some(3));
    assert_eq!(first.price_range.and_then(|r| r.max), Some(500_000));

    assert!(body.contains(r#"value="Dufferin Ave""#));
    assert!(body.contains(r#"<option value="3+" selected>3+</option>"#));
}

#[test]
fn empty_results_say_so() {
    let app = test_app(Arc::new(FakeApi::with_pages(vec![])));

    let (status, body) = get(&app, "/");
    assert_eq!(status, 200);
    assert!(body.contains("0 Properties Found"));
    assert!(body.contains("No Properties Found"));
}

#[test]
fn upstream_failure_renders_inline_with_retry() {
    let api = Arc::new(FakeApi::with_pages(vec![vec![listing("H1", 500_000.0, 43.14, -80.26)]]));
    api.fail_page(1);
    let app = test_app(api);

    let (status, body) = get(&app, "/?beds=2&page=1");
    assert_eq!(status, 200);
    assert!(body.contains("Try again"));
    assert!(body.contains(r#"href="/?beds=2%2B""#));
    assert!(body.contains("filter-bar"));
    assert!(!body.contains("upstream exploded"));
}

#[test]
fn summary_never_undercounts_the_cards_shown() {
    let api = Arc::new(FakeApi::with_pages(vec![
        vec![listing("H1", 500_000.0, 43.14, -80.26)],
        vec![listing("H2", 525_000.0, 43.15, -80.27)],
    ]));
    api.fail_page(1);
    let app = test_app(api);

    let (status, body) = get(&app, "/?page=2");
    assert_eq!(status, 200);
    assert!(body.contains(r#"href="/property/H2""#));
    assert!(body.contains(">1 Properties Found<"), "body: {body}");
    assert!(!body.contains("of 0 results"));
}

#[test]
fn auth_failure_is_reported_as_such() {
    let api = Arc::new(FakeApi::with_pages(vec![]));
    api.fail_auth();
    let app = test_app(api);

    let (_, body) = get(&app, "/");
    assert!(body.contains("rejected our credentials"));
}

#[test]
fn later_pages_link_back_and_forward() {
    let pages: Vec<Vec<_>> = (0..3)
        .map(|p| {
            (0..100)
                .map(|i| listing(&format!("P{p}-{i}"), 400_000.0, 43.14, -80.26))
                .collect()
        })
        .collect();
    let app = test_app(Arc::new(FakeApi::with_pages(pages)));

    let (status, body) = get(&app, "/?page=2");
    assert_eq!(status, 200);
    assert!(body.contains("300 Properties Found"));
    assert!(body.contains("Showing 101 - 200 of 300 results"));
    assert!(body.contains(r#"href="/?page=3" rel="next""#));
    assert!(body.contains(r#"href="/" rel="prev""#));
}

#[test]
fn unknown_route_is_404() {
    let app = test_app(Arc::new(FakeApi::with_pages(vec![])));
    let (status, body) = get(&app, "/nope");
    assert_eq!(status, 404);
    assert!(body.contains("Error 404"));
}
