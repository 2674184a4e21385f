use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::ApiSettings;

/// Upper bound the search form uses for "no maximum".
const OPEN_ENDED_MAX: u64 = 999_999_999;

/// Every upstream request asks for sales.
const TRANSACTION_TYPE: &str = "Sale";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Option<u64>,
    pub max: Option<u64>,
}

impl PriceRange {
    /// Parses the form value `"min-max"`. A zero minimum and a `+` or
    /// `999999999` maximum mean "unbounded" on that side.
    pub fn parse(raw: &str) -> Option<Self> {
        let (min, max) = raw.trim().split_once('-')?;

        let min = min.trim().parse::<u64>().ok().filter(|m| *m > 0);
        let max = match max.trim() {
            "" | "+" => None,
            m => m.parse::<u64>().ok().filter(|m| *m != OPEN_ENDED_MAX),
        };

        if min.is_none() && max.is_none() {
            return None;
        }
        Some(Self { min, max })
    }

    pub fn as_form_value(&self) -> String {
        format!(
            "{}-{}",
            self.min.unwrap_or(0),
            self.max.unwrap_or(OPEN_ENDED_MAX)
        )
    }
}

/// What the visitor asked for. Ephemeral; rebuilt from the query string on every request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub price_range: Option<PriceRange>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub property_type: Option<String>,
    pub query: Option<String>,
}

/// The three upstream request shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchShape {
    Keyword(String),
    Filtered,
    Basic,
}

/// Parses `"3"` or `"3+"`.
pub fn parse_minimum(raw: &str) -> Option<u32> {
    raw.trim().trim_end_matches('+').trim().parse().ok()
}

impl FilterCriteria {
    /// Builds criteria from the site's query-string keys
    /// (`q`, `price`, `beds`, `baths`, `type`).
    pub fn from_query(params: &HashMap<String, String>) -> Self {
        let non_empty = |key: &str| {
            params
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Self {
            price_range: non_empty("price").and_then(|p| PriceRange::parse(&p)),
            bedrooms: non_empty("beds").and_then(|b| parse_minimum(&b)),
            bathrooms: non_empty("baths").and_then(|b| parse_minimum(&b)),
            property_type: non_empty("type"),
            query: non_empty("q"),
        }
    }

    pub fn has_filters(&self) -> bool {
        self.price_range.is_some()
            || self.bedrooms.is_some()
            || self.bathrooms.is_some()
            || self.property_type.is_some()
    }

    pub fn is_filtered(&self) -> bool {
        self.has_filters() || self.keyword().is_some()
    }

    fn keyword(&self) -> Option<&str> {
        self.query.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    pub fn shape(&self) -> SearchShape {
        if let Some(q) = self.keyword() {
            SearchShape::Keyword(q.to_string())
        } else if self.has_filters() {
            SearchShape::Filtered
        } else {
            SearchShape::Basic
        }
    }

    /// Query parameters for one page of this search, in upstream order.
    pub fn to_params(&self, api: &ApiSettings, page: u32, page_size: u32) -> Vec<(&'static str, String)> {
        let shape = self.shape();
        let mut params = Vec::with_capacity(16);

        if let SearchShape::Keyword(q) = &shape {
            params.push(("search", q.clone()));
        }

        params.extend(base_params(api));
        params.push(("operator", "AND".to_string()));
        params.push(("sortBy", "updatedOnDesc".to_string()));
        params.push(("listings", "true".to_string()));
        params.push(("pageNum", page.to_string()));
        params.push(("resultsPerPage", page_size.to_string()));

        if shape != SearchShape::Basic {
            self.push_filter_params(&mut params);
        }

        params
    }

    fn push_filter_params(&self, params: &mut Vec<(&'static str, String)>) {
        if let Some(range) = &self.price_range {
            if let Some(min) = range.min {
                params.push(("minPrice", min.to_string()));
            }
            if let Some(max) = range.max {
                params.push(("maxPrice", max.to_string()));
            }
        }
        if let Some(beds) = self.bedrooms {
            params.push(("minBedrooms", beds.to_string()));
        }
        if let Some(baths) = self.bathrooms {
            params.push(("minBaths", baths.to_string()));
        }
        if let Some(kind) = &self.property_type {
            params.push(("propertyType", kind.clone()));
        }
    }

    /// Query string for the site's own links (pagination, map endpoint).
    pub fn to_site_query(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::new();
        if let Some(q) = self.keyword() {
            out.push(("q", q.to_string()));
        }
        if let Some(range) = &self.price_range {
            out.push(("price", range.as_form_value()));
        }
        if let Some(beds) = self.bedrooms {
            out.push(("beds", format!("{beds}+")));
        }
        if let Some(baths) = self.bathrooms {
            out.push(("baths", format!("{baths}+")));
        }
        if let Some(kind) = &self.property_type {
            out.push(("type", kind.clone()));
        }
        out
    }
}

/// City, transaction type, status and class: shared by every upstream request.
pub fn base_params(api: &ApiSettings) -> Vec<(&'static str, String)> {
    vec![
        ("city", api.city.clone()),
        ("type", TRANSACTION_TYPE.to_string()),
        ("status", api.status.clone()),
        ("class", api.class.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn keys(params: &[(&'static str, String)]) -> Vec<&'static str> {
        params.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn price_range_forms() {
        assert_eq!(
            PriceRange::parse("0-300000"),
            Some(PriceRange { min: None, max: Some(300_000) })
        );
        assert_eq!(
            PriceRange::parse("2000000-999999999"),
            Some(PriceRange { min: Some(2_000_000), max: None })
        );
        assert_eq!(
            PriceRange::parse("500000-700000"),
            Some(PriceRange { min: Some(500_000), max: Some(700_000) })
        );
        assert_eq!(PriceRange::parse("0-+"), None);
        assert_eq!(PriceRange::parse("cheap"), None);
    }

    #[test]
    fn minimums_accept_plus_suffix() {
        assert_eq!(parse_minimum("3+"), Some(3));
        assert_eq!(parse_minimum("2"), Some(2));
        assert_eq!(parse_minimum("any"), None);
    }

    #[test]
    fn shape_dispatch() {
        let basic = FilterCriteria::default();
        assert_eq!(basic.shape(), SearchShape::Basic);

        let filtered = FilterCriteria::from_query(&query(&[("beds", "3+")]));
        assert_eq!(filtered.shape(), SearchShape::Filtered);

        let keyword = FilterCriteria::from_query(&query(&[("q", "  Dufferin "), ("beds", "2")]));
        assert_eq!(keyword.shape(), SearchShape::Keyword("Dufferin".to_string()));

        let blank = FilterCriteria {
            query: Some("   ".to_string()),
            ..FilterCriteria::default()
        };
        assert_eq!(blank.shape(), SearchShape::Basic);
    }

    #[test]
    fn basic_params_carry_no_filters() {
        let api = ApiSettings::default();
        let params = FilterCriteria::default().to_params(&api, 2, 100);

        assert_eq!(
            keys(&params),
            vec![
                "city", "type", "status", "class", "operator", "sortBy", "listings", "pageNum",
                "resultsPerPage"
            ]
        );
        assert!(params.contains(&("pageNum", "2".to_string())));
        assert!(params.contains(&("type", "Sale".to_string())));
    }

    #[test]
    fn keyword_params_lead_with_search_and_keep_filters() {
        let api = ApiSettings::default();
        let criteria = FilterCriteria::from_query(&query(&[
            ("q", "Dufferin"),
            ("price", "300000-500000"),
            ("baths", "2+"),
            ("type", "detached"),
        ]));

        let params = criteria.to_params(&api, 1, 100);
        assert_eq!(params[0], ("search", "Dufferin".to_string()));
        assert!(params.contains(&("minPrice", "300000".to_string())));
        assert!(params.contains(&("maxPrice", "500000".to_string())));
        assert!(params.contains(&("minBaths", "2".to_string())));
        assert!(params.contains(&("propertyType", "detached".to_string())));
        assert!(!keys(&params).contains(&"minBedrooms"));
    }

    #[test]
    fn site_query_round_trips_through_from_query() {
        let criteria = FilterCriteria::from_query(&query(&[
            ("q", "river"),
            ("price", "0-300000"),
            ("beds", "4"),
        ]));

        let back: HashMap<String, String> = criteria
            .to_site_query()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        assert_eq!(FilterCriteria::from_query(&back), criteria);
    }

    #[test]
    fn every_shape_requests_sales_only() {
        let api = ApiSettings::default();
        let rent_query = FilterCriteria::from_query(&query(&[("transaction", "lease"), ("beds", "2")]));
        assert_eq!(rent_query, FilterCriteria::from_query(&query(&[("beds", "2")])));

        for criteria in [
            FilterCriteria::default(),
            rent_query,
            FilterCriteria::from_query(&query(&[("q", "Dufferin")])),
        ] {
            let types: Vec<_> = criteria
                .to_params(&api, 1, 100)
                .into_iter()
                .filter(|(k, _)| *k == "type")
                .map(|(_, v)| v)
                .collect();
            assert_eq!(types, vec!["Sale".to_string()]);
            assert!(!keys(&criteria.to_site_query()).contains(&"transaction"));
        }
    }
}
