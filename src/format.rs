use crate::listings::models::{Address, Details};

pub const PLACEHOLDER_IMAGE: &str = "/static/placeholder.svg";
const NO_ADDRESS: &str = "Address not available";

/// "12 N Dufferin Ave E Unit 4".
pub fn street_line(address: &Address) -> String {
    let unit = address.unit_number.as_ref().map(|u| format!("Unit {u}"));

    [
        address.street_number.as_deref(),
        address.street_direction_prefix.as_deref(),
        address.street_name.as_deref(),
        address.street_suffix.as_deref(),
        address.street_direction.as_deref(),
        unit.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ")
}

/// Street line, then "city, province, zip".
pub fn format_address(address: &Address) -> String {
    if let Some(full) = address.full.as_deref().filter(|f| !f.trim().is_empty()) {
        return full.to_string();
    }

    let street = street_line(address);
    let locality = [
        address.city.as_deref(),
        address.province.as_deref(),
        address.zip.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(", ");

    let joined = [street, locality]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    if joined.is_empty() {
        NO_ADDRESS.to_string()
    } else {
        joined
    }
}

/// Whole dollars with thousands separators.
pub fn format_price(price: Option<f64>) -> String {
    let Some(price) = price.filter(|p| p.is_finite() && *p > 0.0) else {
        return "Price on request".to_string();
    };

    format!("${}", group_thousands(price.round() as u64))
}

/// `1234567` as `"1,234,567"`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// "3 + 1" style counts.
pub fn format_rooms(main: Option<u32>, plus: Option<u32>) -> Option<String> {
    match (main, plus.filter(|p| *p > 0)) {
        (Some(m), Some(p)) => Some(format!("{m} + {p}")),
        (Some(m), None) => Some(m.to_string()),
        (None, Some(p)) => Some(format!("0 + {p}")),
        (None, None) => None,
    }
}

pub fn bedrooms(details: &Details) -> Option<String> {
    format_rooms(details.num_bedrooms, details.num_bedrooms_plus)
}

pub fn bathrooms(details: &Details) -> Option<String> {
    format_rooms(details.num_bathrooms, details.num_bathrooms_plus)
}

pub fn image_url(base: &str, images: &[String]) -> String {
    match images.first() {
        Some(name) if name.starts_with("http://") || name.starts_with("https://") => name.clone(),
        Some(name) => format!("{}/{}", base.trim_end_matches('/'), name.trim_start_matches('/')),
        None => PLACEHOLDER_IMAGE.to_string(),
    }
}
