use serde_json::{Map, Value};

use crate::listings::models::Pagination;

/// A listings response with the envelope stripped off.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPage {
    pub listings: Vec<Value>,
    pub pagination: Pagination,
}

/// Unwraps the known response shapes, checked in this order:
/// a bare array, `listings`, `data`, `results`, then the first array-valued
/// field in document order.
pub fn normalize(data: Value, default_page_size: u32) -> RawPage {
    let mut pagination = match &data {
        Value::Object(obj) => read_pagination(obj, default_page_size),
        _ => Pagination::empty(default_page_size),
    };

    let listings = match data {
        Value::Array(items) => {
            if pagination.count == 0 {
                pagination.count = items.len() as u64;
            }
            items
        }
        Value::Object(mut obj) => take_listings(&mut obj),
        _ => Vec::new(),
    };

    if pagination.count > 0 && pagination.num_pages <= 1 && pagination.page_size > 0 {
        pagination.num_pages = pagination.count.div_ceil(pagination.page_size as u64) as u32;
    }

    RawPage {
        listings,
        pagination,
    }
}

fn take_listings(obj: &mut Map<String, Value>) -> Vec<Value> {
    for key in ["listings", "data", "results"] {
        if matches!(obj.get(key), Some(Value::Array(_))) {
            if let Some(Value::Array(items)) = obj.remove(key) {
                return items;
            }
        }
    }

    let first_array = obj
        .iter()
        .find(|(_, v)| v.is_array())
        .map(|(k, _)| k.clone());

    match first_array.and_then(|k| obj.remove(&k)) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}

/// First positive integer among `keys`; zero and junk count as missing.
fn first_positive(obj: &Map<String, Value>, keys: &[&str]) -> Option<u64> {
    keys.iter().find_map(|k| {
        let v = obj.get(*k)?;
        let n = match v {
            Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f as u64)),
            Value::String(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        };
        n.filter(|n| *n > 0)
    })
}

fn read_pagination(obj: &Map<String, Value>, default_page_size: u32) -> Pagination {
    Pagination {
        page: first_positive(obj, &["page", "pageNum"]).unwrap_or(1) as u32,
        num_pages: first_positive(obj, &["numPages", "totalPages"]).unwrap_or(1) as u32,
        page_size: first_positive(obj, &["pageSize", "resultsPerPage"])
            .map(|n| n as u32)
            .unwrap_or(default_page_size),
        count: first_positive(obj, &["count", "totalCount", "total"]).unwrap_or(0),
    }
}
