use crate::errors::ServerError;
use crate::listings::criteria::FilterCriteria;
use crate::listings::models::Page;
use crate::templates::components::result_summary;
use crate::templates::{desktop_layout, error_panel, filter_bar, listing_card, pagination_nav, search_href};
use maud::{html, Markup};

pub enum SearchOutcome {
    Found(Page),
    /// The search could not be run; shown inline so the filters stay usable.
    Failed(ServerError),
}

pub struct SearchVm<'a> {
    pub site_name: &'a str,
    pub image_base: &'a str,
    pub criteria: &'a FilterCriteria,
    pub page: u32,
    pub outcome: SearchOutcome,
}

pub fn search_page(vm: &SearchVm) -> Markup {
    let title = match vm.criteria.query.as_deref() {
        Some(q) => format!("Search: {q}"),
        None if vm.criteria.is_filtered() => "Search results".to_string(),
        None => "Homes for sale".to_string(),
    };
    let retry_href = search_href(vm.criteria, vm.page);

    desktop_layout(
        vm.site_name,
        &title,
        html! {
            main class="container" {
                (filter_bar(vm.criteria))

                @match &vm.outcome {
                    SearchOutcome::Found(page) => {
                        (result_summary(&page.pagination, page.listings.len()))

                        @if page.listings.is_empty() {
                            div class="no-results" {
                                h3 { "No Properties Found" }
                                p { "Try adjusting your search criteria or filters to see more results." }
                            }
                        } @else {
                            section class="results-grid" {
                                @for listing in &page.listings {
                                    (listing_card(listing, vm.image_base))
                                }
                            }
                        }

                        (pagination_nav(&page.pagination, vm.criteria))
                    }
                    SearchOutcome::Failed(err) => {
                        (error_panel(&err.public_message(), Some(retry_href.as_str())))
                    }
                }
            }
        },
    )
}
