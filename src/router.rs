use astra::Request;
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, warn};
use url::form_urlencoded;

use crate::app::App;
use crate::errors::ServerError;
use crate::format::{format_address, format_price, image_url};
use crate::listings::criteria::FilterCriteria;
use crate::listings::models::{Listing, Pagination};
use crate::listings::paging::paginate;
use crate::listings::reconcile::{collect_all, search_with_correct_count};
use crate::listings::ListingsError;
use crate::map::{Bounds, MapUpdate, Viewport};
use crate::responses::{html_response, json_error_response, json_response, ResultResp};
use crate::templates::pages::{property_page, search_page, PropertyVm, SearchOutcome, SearchVm};

pub fn handle(req: Request, app: &App) -> ResultResp {
    let method = req.method().as_str();
    let path = req.uri().path();
    let params = parse_query(&req);

    info!(method, path, "Request");

    match (method, path) {
        ("GET", "/") => search(app, &params),
        ("GET", "/api/map") => map_listings(app, &params).or_else(|e| Ok(json_error_response(e))),
        ("GET", p) if p.starts_with("/property/") => property(app, &p["/property/".len()..]),
        _ => Err(ServerError::NotFound),
    }
}

fn parse_query(req: &Request) -> HashMap<String, String> {
    req.uri()
        .query()
        .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

fn page_param(params: &HashMap<String, String>) -> u32 {
    params
        .get("page")
        .and_then(|p| p.trim().parse::<u32>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1)
}

fn search(app: &App, params: &HashMap<String, String>) -> ResultResp {
    let criteria = FilterCriteria::from_query(params);
    let page = page_param(params);
    let search = &app.settings.search;

    let result = app.block_on(search_with_correct_count(
        app.api(),
        &criteria,
        page,
        search.page_size,
        search.max_reconcile_pages,
    ));

    let outcome = match result {
        Ok(found) => SearchOutcome::Found(found),
        Err(e) if e.is_config() => return Err(e.into()),
        Err(e) => {
            warn!(error = %e, page, "Search failed, rendering inline error");
            SearchOutcome::Failed(e.into())
        }
    };

    html_response(search_page(&SearchVm {
        site_name: &app.settings.server.site_name,
        image_base: &app.settings.api.image_base_url,
        criteria: &criteria,
        page,
        outcome,
    }))
}

fn property(app: &App, mls_number: &str) -> ResultResp {
    let mls_number = mls_number.trim_end_matches('/');
    if mls_number.is_empty() || mls_number.contains('/') {
        return Err(ServerError::NotFound);
    }

    let api = app.api();
    let (listing, similar) = app.block_on(async {
        let listing = api.listing(mls_number).await?;
        let similar = api.similar_listings(mls_number).await;
        Ok::<_, ListingsError>((listing, similar))
    })?;

    html_response(property_page(&PropertyVm {
        site_name: &app.settings.server.site_name,
        image_base: &app.settings.api.image_base_url,
        listing: &listing,
        similar: &similar,
        now: Utc::now(),
    }))
}

/// A map marker. `href` is where clicking it should navigate.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MapPin {
    mls_number: String,
    lat: f64,
    lng: f64,
    price: String,
    address: String,
    image: String,
    href: String,
}

impl MapPin {
    fn from_listing(listing: &Listing, image_base: &str) -> Option<Self> {
        let point = listing.coordinates?;
        Some(Self {
            mls_number: listing.mls_number.clone(),
            lat: point.lat,
            lng: point.lng,
            price: format_price(listing.list_price),
            address: format_address(&listing.address),
            image: image_url(image_base, &listing.images),
            href: format!("/property/{}", listing.mls_number),
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MapResponse {
    pins: Vec<MapPin>,
    pagination: Pagination,
    /// Eligible listings for the search, before viewport filtering.
    total: usize,
    filtering: bool,
}

/// The viewport is optional, but when any edge is given all of them must be.
fn parse_viewport(params: &HashMap<String, String>) -> Result<Option<Viewport>, ServerError> {
    let keys = ["north", "south", "east", "west", "zoom"];
    if keys.iter().all(|k| !params.contains_key(*k)) {
        return Ok(None);
    }

    let mut values = [0f64; 5];
    for (slot, key) in values.iter_mut().zip(keys) {
        *slot = params
            .get(key)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .ok_or_else(|| ServerError::BadRequest(format!("Missing or invalid `{key}`")))?;
    }

    let [north, south, east, west, zoom] = values;
    if south > north {
        return Err(ServerError::BadRequest("`south` is north of `north`".to_string()));
    }

    Ok(Some(Viewport {
        bounds: Bounds { north, south, east, west },
        zoom,
    }))
}

fn map_listings(app: &App, params: &HashMap<String, String>) -> ResultResp {
    let criteria = FilterCriteria::from_query(params);
    let viewport = parse_viewport(params)?;
    let page = page_param(params);
    let search = &app.settings.search;

    let all = app.block_on(collect_all(
        app.api(),
        &criteria,
        search.page_size,
        search.max_map_pages,
        search.map_concurrency,
    ))?;

    let (visible, filtering) = match viewport {
        Some(vp) => {
            let update = MapUpdate::compute(&app.bounds, &all, vp);
            (update.visible, update.filtering)
        }
        None => (all.clone(), false),
    };

    let (shown, pagination) = paginate(&visible, page, search.page_size);
    let image_base = &app.settings.api.image_base_url;
    let pins = shown
        .iter()
        .filter_map(|l| MapPin::from_listing(l, image_base))
        .collect();

    info!(total = all.len(), visible = visible.len(), page = pagination.page, filtering, "Map listings");

    json_response(&MapResponse {
        pins,
        pagination,
        total: all.len(),
        filtering,
    })
}
