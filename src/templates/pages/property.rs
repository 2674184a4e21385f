use chrono::{DateTime, Utc};
use maud::{html, Markup};

use crate::format::{bathrooms, bedrooms, format_address, format_price, image_url, street_line};
use crate::listings::models::{Listing, Page};
use crate::templates::{desktop_layout, listing_card};

pub struct PropertyVm<'a> {
    pub site_name: &'a str,
    pub image_base: &'a str,
    pub listing: &'a Listing,
    pub similar: &'a Page,
    pub now: DateTime<Utc>,
}

pub fn property_page(vm: &PropertyVm) -> Markup {
    let listing = vm.listing;
    let address = format_address(&listing.address);
    let heading = match street_line(&listing.address) {
        s if s.is_empty() => address.clone(),
        s => s,
    };

    desktop_layout(
        vm.site_name,
        &heading,
        html! {
            main class="container property" {
                p { a href="/" { "← Back to search" } }

                img class="hero" src=(image_url(vm.image_base, &listing.images)) alt=(address);

                h1 { (heading) }
                p class="address" { (address) }
                p class="price" { (format_price(listing.list_price)) }

                dl class="facts" {
                    @if let Some(beds) = bedrooms(&listing.details) {
                        dt { "Bedrooms" } dd { (beds) }
                    }
                    @if let Some(baths) = bathrooms(&listing.details) {
                        dt { "Bathrooms" } dd { (baths) }
                    }
                    @if let Some(kind) = &listing.details.property_type {
                        dt { "Type" } dd { (kind) }
                    }
                    @if let Some(style) = &listing.details.style {
                        dt { "Style" } dd { (style) }
                    }
                    @if let Some(sqft) = &listing.details.sqft {
                        dt { "Square feet" } dd { (sqft) }
                    }
                    @if let Some(days) = listing.days_on_market(vm.now) {
                        dt { "Days on market" } dd { (days) }
                    }
                    dt { "MLS®" } dd { (listing.mls_number) }
                }

                @if let Some(description) = &listing.details.description {
                    section class="description" {
                        h2 { "About this home" }
                        p { (description) }
                    }
                }

                @if !vm.similar.listings.is_empty() {
                    section class="similar" {
                        h2 { "Similar listings" }
                        div class="results-grid" {
                            @for other in &vm.similar.listings {
                                (listing_card(other, vm.image_base))
                            }
                        }
                    }
                }
            }
        },
    )
}
