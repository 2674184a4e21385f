use maud::{html, Markup};
use url::form_urlencoded;

use crate::format::{bathrooms, bedrooms, format_address, format_price, group_thousands, image_url};
use crate::listings::criteria::FilterCriteria;
use crate::listings::models::{Listing, Pagination};
use crate::listings::paging::{result_range, visible_pages, PageLink};

pub mod error;

pub use error::error_panel;

const PRICE_OPTIONS: &[(&str, &str)] = &[
    ("0-300000", "Under $300K"),
    ("300000-500000", "$300K - $500K"),
    ("500000-700000", "$500K - $700K"),
    ("700000-1000000", "$700K - $1M"),
    ("1000000-2000000", "$1M - $2M"),
    ("2000000-999999999", "$2M+"),
];

const PROPERTY_TYPES: &[&str] = &[
    "Detached",
    "Semi-Detached",
    "Att/Row/Townhouse",
    "Condo Apartment",
    "Condo Townhouse",
];

/// Link to page `page` of the search described by `criteria`.
pub fn search_href(criteria: &FilterCriteria, page: u32) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    query.extend_pairs(criteria.to_site_query());
    if page > 1 {
        query.append_pair("page", &page.to_string());
    }

    let query = query.finish();
    if query.is_empty() {
        "/".to_string()
    } else {
        format!("/?{query}")
    }
}

pub fn listing_card(listing: &Listing, image_base: &str) -> Markup {
    let href = format!("/property/{}", listing.mls_number);
    html! {
        article class="card listing-card" {
            a href=(href) {
                img src=(image_url(image_base, &listing.images)) alt=(format_address(&listing.address)) loading="lazy";
            }
            div class="card-body" {
                p class="price" { (format_price(listing.list_price)) }
                h3 { a href=(href) { (format_address(&listing.address)) } }
                ul class="facts" {
                    @if let Some(beds) = bedrooms(&listing.details) {
                        li { (beds) " bd" }
                    }
                    @if let Some(baths) = bathrooms(&listing.details) {
                        li { (baths) " ba" }
                    }
                    @if let Some(kind) = &listing.details.property_type {
                        li { (kind) }
                    }
                }
                small { "MLS® " (listing.mls_number) }
            }
        }
    }
}

pub fn filter_bar(criteria: &FilterCriteria) -> Markup {
    let price = criteria.price_range.map(|r| r.as_form_value());
    let beds = criteria.bedrooms;
    let baths = criteria.bathrooms;
    let kind = criteria.property_type.as_deref();

    html! {
        form class="filter-bar" method="get" action="/" {
            input type="search" name="q" placeholder="Search by address or MLS"
                value=(criteria.query.as_deref().unwrap_or(""));

            select name="price" {
                option value="" selected[price.is_none()] { "Any price" }
                @for (value, label) in PRICE_OPTIONS {
                    option value=(value) selected[price.as_deref() == Some(*value)] { (label) }
                }
            }

            select name="beds" {
                option value="" selected[beds.is_none()] { "Beds" }
                @for n in 1..=5u32 {
                    option value=(format!("{n}+")) selected[beds == Some(n)] { (n) "+" }
                }
            }

            select name="baths" {
                option value="" selected[baths.is_none()] { "Baths" }
                @for n in 1..=4u32 {
                    option value=(format!("{n}+")) selected[baths == Some(n)] { (n) "+" }
                }
            }

            select name="type" {
                option value="" selected[kind.is_none()] { "Any type" }
                @for t in PROPERTY_TYPES {
                    option value=(t) selected[kind == Some(*t)] { (t) }
                }
            }

            button class="btn" type="submit" { "Search" }
        }
    }
}

/// "N Properties Found" plus "Showing a - b of N".
pub fn result_summary(pagination: &Pagination, shown: usize) -> Markup {
    html! {
        div class="result-summary" {
            h2 { (group_thousands(pagination.count)) " Properties Found" }
            @if let Some((first, last)) = result_range(pagination, shown) {
                p {
                    "Showing " (group_thousands(first)) " - " (group_thousands(last))
                    " of " (group_thousands(pagination.count)) " results"
                }
            }
        }
    }
}

pub fn pagination_nav(pagination: &Pagination, criteria: &FilterCriteria) -> Markup {
    let current = pagination.page;
    let total = pagination.num_pages;

    html! {
        @if total > 1 {
            nav class="pagination" aria-label="Pages" {
                @if current > 1 {
                    a href=(search_href(criteria, current - 1)) rel="prev" { "Previous" }
                }
                @for link in visible_pages(current, total, 2) {
                    @match link {
                        PageLink::Page(n) => {
                            @if n == current {
                                span class="current" aria-current="page" { (n) }
                            } @else {
                                a href=(search_href(criteria, n)) { (n) }
                            }
                        }
                        PageLink::Gap => span class="gap" { "…" },
                    }
                }
                @if current < total {
                    a href=(search_href(criteria, current + 1)) rel="next" { "Next" }
                }
            }
        }
    }
}
