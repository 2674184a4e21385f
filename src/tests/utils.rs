use astra::{Body, Request, Response};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::io::Read;
use std::sync::{Arc, Mutex};

use crate::app::App;
use crate::config::Settings;
use crate::listings::client::{build_page, ListingsApi};
use crate::listings::criteria::FilterCriteria;
use crate::listings::envelope::RawPage;
use crate::listings::exclusion::ExclusionRules;
use crate::listings::listings_error::ListingsError;
use crate::listings::models::{Listing, Page, Pagination};
use crate::responses::error_to_response;
use crate::router::handle;

/// An eligible Brantford sale listing in upstream wire format.
pub fn listing(mls: &str, price: f64, lat: f64, lng: f64) -> Value {
    json!({
        "mlsNumber": mls,
        "class": "ResidentialProperty",
        "type": "Sale",
        "status": "A",
        "listPrice": price,
        "listDate": "2024-05-01T00:00:00.000Z",
        "address": {
            "streetNumber": "12",
            "streetName": "Dufferin",
            "streetSuffix": "Ave",
            "city": "Brantford",
            "state": "ON",
            "zip": "N3T 1A1"
        },
        "details": { "numBedrooms": 3, "numBedroomsPlus": 1, "numBathrooms": 2, "description": "Sunny bungalow" },
        "images": ["IMG-1.jpg"],
        "map": { "latitude": lat, "longitude": lng }
    })
}

#[derive(Default)]
struct FakeState {
    requested: Vec<u32>,
    searches: Vec<FilterCriteria>,
    failing: HashSet<u32>,
    num_pages: Option<u32>,
    auth_failure: bool,
}

/// In-memory listings source. Page `n` of every search is `pages[n - 1]`,
/// whatever the criteria.
pub struct FakeApi {
    pages: Vec<Vec<Value>>,
    rules: ExclusionRules,
    state: Mutex<FakeState>,
}

impl FakeApi {
    pub fn with_pages(pages: Vec<Vec<Value>>) -> Self {
        Self {
            pages,
            rules: ExclusionRules::default(),
            state: Mutex::new(FakeState::default()),
        }
    }

    pub fn requested_pages(&self) -> Vec<u32> {
        self.state.lock().unwrap().requested.clone()
    }

    pub fn searches(&self) -> Vec<FilterCriteria> {
        self.state.lock().unwrap().searches.clone()
    }

    /// Overrides the page count the fake reports.
    pub fn force_num_pages(&self, n: u32) {
        self.state.lock().unwrap().num_pages = Some(n);
    }

    pub fn fail_page(&self, page: u32) {
        self.state.lock().unwrap().failing.insert(page);
    }

    pub fn fail_auth(&self) {
        self.state.lock().unwrap().auth_failure = true;
    }

    fn auth_failed(&self) -> bool {
        self.state.lock().unwrap().auth_failure
    }

    fn all_eligible(&self) -> Vec<Listing> {
        let raw = RawPage {
            listings: self.pages.concat(),
            pagination: Pagination::empty(100),
        };
        build_page(raw, &self.rules).listings
    }
}

#[async_trait]
impl ListingsApi for FakeApi {
    async fn search(
        &self,
        criteria: &FilterCriteria,
        page: u32,
        page_size: u32,
    ) -> Result<Page, ListingsError> {
        let (failing, auth, forced) = {
            let mut state = self.state.lock().unwrap();
            state.requested.push(page);
            state.searches.push(criteria.clone());
            (state.failing.contains(&page), state.auth_failure, state.num_pages)
        };

        if auth {
            return Err(ListingsError::Auth { status: 401 });
        }
        if failing {
            return Err(ListingsError::Http {
                status: 500,
                body: "upstream exploded".to_string(),
            });
        }

        let listings = page
            .checked_sub(1)
            .and_then(|i| self.pages.get(i as usize))
            .cloned()
            .unwrap_or_default();

        let pagination = Pagination {
            page,
            num_pages: forced.unwrap_or(self.pages.len().max(1) as u32),
            page_size,
            count: self.pages.iter().map(Vec::len).sum::<usize>() as u64,
        };

        Ok(build_page(RawPage { listings, pagination }, &self.rules))
    }

    async fn listing(&self, mls_number: &str) -> Result<Listing, ListingsError> {
        if self.auth_failed() {
            return Err(ListingsError::Auth { status: 403 });
        }
        self.all_eligible()
            .into_iter()
            .find(|l| l.mls_number == mls_number)
            .ok_or_else(|| ListingsError::NotFound(mls_number.to_string()))
    }

    async fn similar_listings(&self, mls_number: &str) -> Page {
        if self.auth_failed() {
            return Page::empty(12);
        }
        let listings: Vec<Listing> = self
            .all_eligible()
            .into_iter()
            .filter(|l| l.mls_number != mls_number)
            .take(12)
            .collect();

        let mut page = Page::empty(12);
        page.pagination.count = listings.len() as u64;
        page.raw_count = listings.len();
        page.listings = listings;
        page
    }

    fn rules(&self) -> &ExclusionRules {
        &self.rules
    }
}

pub fn test_app(api: Arc<FakeApi>) -> App {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    App::new(Settings::default(), api, Arc::new(runtime))
}

/// Runs a GET through the router the way the server does and returns status and body.
pub fn get(app: &App, uri: &str) -> (u16, String) {
    let req: Request = http::Request::builder()
        .method(http::Method::GET)
        .uri(uri)
        .body(Body::from(String::new()))
        .unwrap();

    let mut resp: Response = match handle(req, app) {
        Ok(resp) => resp,
        Err(err) => error_to_response(err),
    };

    let mut body_bytes = Vec::new();
    resp.body_mut().reader().read_to_end(&mut body_bytes).unwrap();
    (resp.status().as_u16(), String::from_utf8(body_bytes).unwrap())
}
