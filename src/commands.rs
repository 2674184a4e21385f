use anyhow::Result;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::config::Settings;
use crate::format::{format_address, format_price};
use crate::listings::criteria::FilterCriteria;
use crate::listings::reconcile::{collect_all, reconcile, search_with_correct_count};
use crate::listings::ListingsApi;
use crate::map::{Viewport, ViewportWatcher};

pub async fn search(
    api: &dyn ListingsApi,
    settings: &Settings,
    criteria: &FilterCriteria,
    page: u32,
    json: bool,
) -> Result<()> {
    let search = &settings.search;
    let result = search_with_correct_count(
        api,
        criteria,
        page.max(1),
        search.page_size,
        search.max_reconcile_pages,
    )
    .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    for listing in &result.listings {
        println!(
            "{:<12} {:>14}  {}",
            listing.mls_number,
            format_price(listing.list_price),
            format_address(&listing.address)
        );
    }
    println!(
        "Page {} of {}, {} results ({} before exclusions)",
        result.pagination.page,
        result.pagination.num_pages,
        result.pagination.count,
        result.original_count.unwrap_or_default()
    );
    Ok(())
}

pub async fn count(api: &dyn ListingsApi, settings: &Settings, criteria: &FilterCriteria) -> Result<()> {
    let totals = reconcile(
        api,
        criteria,
        settings.search.page_size,
        settings.search.max_reconcile_pages,
    )
    .await;
    println!("{}", serde_json::to_string_pretty(&totals)?);
    Ok(())
}

pub async fn listing(api: &dyn ListingsApi, mls_number: &str) -> Result<()> {
    let found = api.listing(mls_number).await?;
    let similar = api.similar_listings(mls_number).await;

    let out = serde_json::json!({
        "listing": found,
        "similar": similar.listings,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

/// Feeds viewport JSON lines from stdin through a [`ViewportWatcher`] and
/// prints each settled update as one JSON line.
pub async fn viewport(api: &dyn ListingsApi, settings: &Settings, criteria: &FilterCriteria) -> Result<()> {
    let search = &settings.search;
    let all = collect_all(
        api,
        criteria,
        search.page_size,
        search.max_map_pages,
        search.map_concurrency,
    )
    .await?;
    info!(count = all.len(), "Loaded listings for viewport stream");

    let watcher = ViewportWatcher::from_settings(&settings.map, |update| {
        let summary = serde_json::json!({
            "visible": update.visible.iter().map(|l| &l.mls_number).collect::<Vec<_>>(),
            "total": update.total,
            "filtering": update.filtering,
            "viewport": update.viewport,
        });
        println!("{summary}");
    });
    watcher.set_listings(all);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Viewport>(&line) {
            Ok(vp) => watcher.viewport_changed(vp),
            Err(e) => warn!(error = %e, "Ignoring malformed viewport line"),
        }
    }

    // Let the last pending viewport settle before exiting.
    tokio::time::sleep(Duration::from_millis(settings.map.debounce_ms + 50)).await;
    Ok(())
}
