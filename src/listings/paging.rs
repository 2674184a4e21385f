use crate::listings::models::Pagination;
use crate::listings::reconcile::total_pages;

/// One entry in a row of page links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page(u32),
    Gap,
}

/// Re-pages an in-memory result set (e.g. the listings inside the map viewport).
/// `page` is clamped into range.
pub fn paginate<T>(items: &[T], page: u32, page_size: u32) -> (&[T], Pagination) {
    let count = items.len() as u64;
    let num_pages = total_pages(count, page_size).max(1);
    let page = page.clamp(1, num_pages);

    let start = ((page - 1) as usize).saturating_mul(page_size as usize).min(items.len());
    let end = start.saturating_add(page_size as usize).min(items.len());

    (
        &items[start..end],
        Pagination {
            page,
            num_pages,
            page_size,
            count,
        },
    )
}

/// First page, a window of `delta` pages either side of `current`, last page,
/// with gaps where pages are skipped. Empty when there is only one page.
pub fn visible_pages(current: u32, total: u32, delta: u32) -> Vec<PageLink> {
    if total <= 1 {
        return Vec::new();
    }
    let current = current.clamp(1, total);

    let window_start = current.saturating_sub(delta).max(2);
    let window_end = (current + delta).min(total - 1);

    let mut links = vec![PageLink::Page(1)];
    if current.saturating_sub(delta) > 2 {
        links.push(PageLink::Gap);
    }
    links.extend((window_start..=window_end).map(PageLink::Page));
    if current + delta < total - 1 {
        links.push(PageLink::Gap);
    }
    links.push(PageLink::Page(total));

    links.dedup();
    links
}

/// 1-based index range shown in "Showing a - b of n". `None` when nothing is
/// shown or the range would run past `n`, which happens once earlier upstream
/// pages lost listings to exclusion.
pub fn result_range(pagination: &Pagination, shown: usize) -> Option<(u64, u64)> {
    if shown == 0 {
        return None;
    }
    let start = (pagination.page.max(1) as u64 - 1) * pagination.page_size as u64 + 1;
    let end = start + shown as u64 - 1;
    (end <= pagination.count).then_some((start, end))
}
