use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::Client;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::ApiSettings;
use crate::listings::criteria::{base_params, FilterCriteria};
use crate::listings::envelope::{normalize, RawPage};
use crate::listings::exclusion::ExclusionRules;
use crate::listings::listings_error::ListingsError;
use crate::listings::models::{Listing, Page};

const SIMILAR_PAGE_SIZE: u32 = 12;

/// Anything that can hand out pages of eligible listings. The HTTP client is the
/// production implementation; tests substitute an in-memory source.
#[async_trait]
pub trait ListingsApi: Send + Sync {
    /// One page of a search, already passed through [`ListingsApi::rules`].
    async fn search(
        &self,
        criteria: &FilterCriteria,
        page: u32,
        page_size: u32,
    ) -> Result<Page, ListingsError>;

    /// A single eligible listing by MLS number.
    async fn listing(&self, mls_number: &str) -> Result<Listing, ListingsError>;

    /// Listings to show next to `mls_number`. Never fails: problems are logged
    /// and reported as an empty page.
    async fn similar_listings(&self, mls_number: &str) -> Page;

    fn rules(&self) -> &ExclusionRules;
}

/// Turns a normalized upstream page into a page of eligible listings.
pub fn build_page(raw: RawPage, rules: &ExclusionRules) -> Page {
    let raw_count = raw.listings.len();

    let parsed: Vec<Listing> = raw
        .listings
        .into_iter()
        .filter_map(|v| match serde_json::from_value::<Listing>(v) {
            Ok(listing) => Some(listing),
            Err(e) => {
                warn!(error = %e, "Skipping listing that could not be decoded");
                None
            }
        })
        .collect();

    let (listings, excluded) = rules.retain(parsed);
    if excluded > 0 {
        debug!(excluded, kept = listings.len(), "Excluded ineligible listings");
    }

    Page {
        listings,
        pagination: raw.pagination,
        raw_count,
        original_count: None,
    }
}

/// Asks each board in turn for `mls_number` and returns the first eligible match.
/// A board answering with nothing eligible is skipped. An auth failure ends the
/// walk. When no board answered at all the last error is returned, otherwise
/// the listing is `NotFound`.
pub async fn find_on_boards<F, Fut>(
    mls_number: &str,
    board_ids: &[u32],
    rules: &ExclusionRules,
    mut fetch: F,
) -> Result<Listing, ListingsError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<RawPage, ListingsError>>,
{
    let mut last_err = None;
    let mut answered = false;

    for &board_id in board_ids {
        match fetch(board_id).await {
            Ok(raw) => {
                answered = true;
                let found = build_page(raw, rules).listings.into_iter().next();
                if let Some(listing) = found {
                    info!(mls_number, board_id, "Found listing");
                    return Ok(listing);
                }
            }
            Err(e) if e.is_auth() => return Err(e),
            Err(e) => {
                warn!(mls_number, board_id, error = %e, "Board lookup failed");
                last_err = Some(e);
            }
        }
    }

    match last_err {
        Some(e) if !answered => Err(e),
        _ => Err(ListingsError::NotFound(mls_number.to_string())),
    }
}

/// The first board that answers supplies the page, minus the subject listing.
/// Failures only cost the visitor the similar-listings strip.
pub async fn similar_from_boards<F, Fut>(
    mls_number: &str,
    board_ids: &[u32],
    rules: &ExclusionRules,
    mut fetch: F,
) -> Page
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<RawPage, ListingsError>>,
{
    for &board_id in board_ids {
        match fetch(board_id).await {
            Ok(raw) => {
                let mut page = build_page(raw, rules);
                page.listings.retain(|l| l.mls_number != mls_number);
                return page;
            }
            Err(e) => {
                warn!(mls_number, board_id, error = %e, "Similar listings unavailable from board");
            }
        }
    }

    warn!(mls_number, "No board returned similar listings");
    Page::empty(SIMILAR_PAGE_SIZE)
}

/// Maps an upstream status and body onto a JSON value or a typed failure.
pub fn decode_response(status: u16, body: &str) -> Result<Value, ListingsError> {
    match status {
        200..=299 => Ok(serde_json::from_str(body)?),
        401 | 403 => Err(ListingsError::Auth { status }),
        _ => Err(ListingsError::Http {
            status,
            body: body.to_string(),
        }),
    }
}

pub struct ListingsClient {
    client: Client,
    endpoint: Url,
    api: ApiSettings,
    rules: ExclusionRules,
}

impl ListingsClient {
    /// Fails immediately when no API key is configured.
    pub fn new(api: &ApiSettings, rules: ExclusionRules) -> Result<Self, ListingsError> {
        let api_key = api
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ListingsError::MissingCredential)?;

        let endpoint = Url::parse(&format!("{}/listings", api.base_url.trim_end_matches('/')))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let name = HeaderName::from_bytes(api.key_header.as_bytes())
            .map_err(|_| ListingsError::InvalidHeader(format!("`{}` is not a valid header name", api.key_header)))?;
        let value = HeaderValue::from_str(api_key)
            .map_err(|_| ListingsError::InvalidHeader("API key contains characters not allowed in a header".to_string()))?;
        headers.insert(name, value);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api: api.clone(),
            rules,
        })
    }

    async fn get_json(&self, params: &[(&str, String)]) -> Result<Value, ListingsError> {
        let start = std::time::Instant::now();

        let resp = self
            .client
            .get(self.endpoint.clone())
            .query(params)
            .send()
            .await?;

        let status = resp.status().as_u16();
        let body = resp.text().await?;

        debug!(status, elapsed = ?start.elapsed(), bytes = body.len(), "Listings API response");

        decode_response(status, &body).map_err(|e| {
            warn!(status, error = %e, "Listings API request failed");
            e
        })
    }

    async fn fetch_raw(&self, params: &[(&str, String)], page_size: u32) -> Result<RawPage, ListingsError> {
        let data = self.get_json(params).await?;
        Ok(normalize(data, page_size))
    }
}

#[async_trait]
impl ListingsApi for ListingsClient {
    async fn search(
        &self,
        criteria: &FilterCriteria,
        page: u32,
        page_size: u32,
    ) -> Result<Page, ListingsError> {
        let params = criteria.to_params(&self.api, page, page_size);
        info!(shape = ?criteria.shape(), page, page_size, "Searching listings");

        let raw = self.fetch_raw(&params, page_size).await?;
        let page = build_page(raw, &self.rules);

        debug!(
            kept = page.listings.len(),
            excluded = page.excluded(),
            upstream_count = page.pagination.count,
            num_pages = page.pagination.num_pages,
            "Search page ready"
        );
        Ok(page)
    }

    async fn listing(&self, mls_number: &str) -> Result<Listing, ListingsError> {
        find_on_boards(mls_number, &self.api.board_ids, &self.rules, move |board_id| {
            let mut params = vec![
                ("mlsNumber", mls_number.to_string()),
                ("boardId", board_id.to_string()),
            ];
            params.extend(base_params(&self.api));
            async move { self.fetch_raw(&params, 1).await }
        })
        .await
    }

    async fn similar_listings(&self, mls_number: &str) -> Page {
        similar_from_boards(mls_number, &self.api.board_ids, &self.rules, move |board_id| {
            let mut params = base_params(&self.api);
            params.extend([
                ("boardId", board_id.to_string()),
                ("sortBy", "updatedOnDesc".to_string()),
                ("resultsPerPage", SIMILAR_PAGE_SIZE.to_string()),
                ("pageNum", "1".to_string()),
                ("listings", "true".to_string()),
            ]);
            async move { self.fetch_raw(&params, SIMILAR_PAGE_SIZE).await }
        })
        .await
    }

    fn rules(&self) -> &ExclusionRules {
        &self.rules
    }
}
