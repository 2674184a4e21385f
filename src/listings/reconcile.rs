use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{info, warn};

use crate::listings::client::ListingsApi;
use crate::listings::criteria::FilterCriteria;
use crate::listings::listings_error::ListingsError;
use crate::listings::models::{Listing, Page};

/// Authoritative totals for a search, recomputed client-side because the
/// upstream counts are taken before ineligible listings are removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciled {
    pub total_count: u64,
    pub total_pages: u32,
    pub original_count: u64,
    /// Upstream pages that were read and counted.
    pub pages_read: u32,
}

pub fn total_pages(total_count: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    total_count.div_ceil(page_size as u64) as u32
}

/// Walks the search page by page (at most `max_pages`) and counts what survives
/// the exclusion rules. Stops at the first empty page, at the last upstream page,
/// or at the first failed request, keeping whatever was counted up to then.
pub async fn reconcile(
    api: &dyn ListingsApi,
    criteria: &FilterCriteria,
    page_size: u32,
    max_pages: u32,
) -> Reconciled {
    let rules = api.rules();
    let mut total_count = 0u64;
    let mut original_count = 0u64;
    let mut pages_read = 0u32;

    for page_num in 1..=max_pages {
        let page = match api.search(criteria, page_num, page_size).await {
            Ok(page) => page,
            Err(e) => {
                warn!(page = page_num, error = %e, "Page failed while reconciling, keeping partial count");
                break;
            }
        };

        if page.raw_count == 0 {
            break;
        }
        pages_read += 1;

        original_count += page.raw_count as u64;
        total_count += page.listings.iter().filter(|l| rules.keeps(l)).count() as u64;

        if !page.pagination.has_next() {
            break;
        }
    }

    let reconciled = Reconciled {
        total_count,
        total_pages: total_pages(total_count, page_size),
        original_count,
        pages_read,
    };

    info!(
        pages_read,
        total = reconciled.total_count,
        original = reconciled.original_count,
        filtered_out = original_count - total_count,
        "Reconciled search totals"
    );
    reconciled
}

/// Fetches one page and replaces its pagination with reconciled totals.
/// When reconciliation stopped short of `page`, the listings on it are added to
/// the total so the summary never claims fewer results than are shown.
pub async fn search_with_correct_count(
    api: &dyn ListingsApi,
    criteria: &FilterCriteria,
    page: u32,
    page_size: u32,
    max_pages: u32,
) -> Result<Page, ListingsError> {
    let mut result = api.search(criteria, page, page_size).await?;
    let counts = reconcile(api, criteria, page_size, max_pages).await;

    let (total_count, num_pages) = if counts.pages_read < page && !result.listings.is_empty() {
        let total = counts.total_count + result.listings.len() as u64;
        warn!(
            page,
            pages_read = counts.pages_read,
            total, "Reconciliation stopped before the requested page, counting its listings too"
        );
        (total, total_pages(total, page_size).max(page))
    } else {
        (counts.total_count, counts.total_pages)
    };

    result.pagination.page = page;
    result.pagination.page_size = page_size;
    result.pagination.count = total_count;
    result.pagination.num_pages = num_pages;
    result.original_count = Some(counts.original_count);

    Ok(result)
}

/// Loads every eligible listing of a search for the map view. Page 1 is read
/// first to learn the page count; the rest are requested concurrently and
/// concatenated in page order once all have settled. Failed pages are skipped.
pub async fn collect_all(
    api: &dyn ListingsApi,
    criteria: &FilterCriteria,
    page_size: u32,
    max_pages: u32,
    concurrency: usize,
) -> Result<Vec<Listing>, ListingsError> {
    if max_pages == 0 {
        return Ok(Vec::new());
    }

    let first = api.search(criteria, 1, page_size).await?;
    let last_page = first.pagination.num_pages.min(max_pages);
    let mut all = first.listings;

    if first.raw_count == 0 || last_page <= 1 {
        return Ok(all);
    }

    let rest: Vec<(u32, Result<Page, ListingsError>)> = stream::iter(2..=last_page)
        .map(|page_num| async move { (page_num, api.search(criteria, page_num, page_size).await) })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    for (page_num, result) in rest {
        match result {
            Ok(page) => all.extend(page.listings),
            Err(e) => warn!(page = page_num, error = %e, "Skipping page while collecting map listings"),
        }
    }

    info!(count = all.len(), pages = last_page, "Collected listings for map");
    Ok(all)
}
