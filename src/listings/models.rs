use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// listing
//  ├── mlsNumber
//  ├── class            ResidentialProperty | CondoProperty | CommercialProperty
//  ├── type             Sale | Lease
//  ├── listPrice        (fallback: price), number or numeric string
//  ├── address          object or preformatted string
//  ├── details
//  │    ├── numBedrooms / numBedroomsPlus
//  │    ├── numBathrooms / numBathroomsPlus
//  │    └── propertyType, style, sqft, description
//  ├── images           [filename]
//  └── coordinates      map.{latitude,longitude} | latitude/longitude | lat/lng
//                       | coordinates.{…} | location.{…}

/// A canonical coordinate pair, resolved once when a listing is ingested.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Finite, non-zero and on the globe.
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lng.is_finite()
            && lat != 0.0
            && lng != 0.0
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng);

        valid.then_some(Self { lat, lng })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    /// Set when the upstream sends the address as a single string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub street_number: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub street_direction_prefix: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub street_name: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub street_suffix: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub street_direction: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub unit_number: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub city: Option<String>,
    #[serde(alias = "state", deserialize_with = "lenient::opt_string")]
    pub province: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub zip: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Details {
    #[serde(deserialize_with = "lenient::opt_u32")]
    pub num_bedrooms: Option<u32>,
    #[serde(deserialize_with = "lenient::opt_u32")]
    pub num_bedrooms_plus: Option<u32>,
    #[serde(deserialize_with = "lenient::opt_u32")]
    pub num_bathrooms: Option<u32>,
    #[serde(deserialize_with = "lenient::opt_u32")]
    pub num_bathrooms_plus: Option<u32>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub property_type: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub style: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub sqft: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
}

/// A single property record from the upstream provider. Identity is the MLS number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawListing", rename_all = "camelCase")]
pub struct Listing {
    pub mls_number: String,
    pub class: Option<String>,
    #[serde(rename = "type")]
    pub sale_type: Option<String>,
    /// `listPrice`, or `price` when the former is absent or zero.
    pub list_price: Option<f64>,
    pub original_price: Option<f64>,
    pub status: Option<String>,
    pub list_date: Option<String>,
    pub simple_days_on_market: Option<i64>,
    pub address: Address,
    pub details: Details,
    pub images: Vec<String>,
    pub coordinates: Option<LatLng>,
}

impl Listing {
    /// The string checked for lease/rent markers: `type`, falling back to `class`.
    pub fn type_or_class(&self) -> &str {
        self.sale_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(self.class.as_deref())
            .unwrap_or("")
    }

    pub fn days_on_market(&self, now: DateTime<Utc>) -> Option<i64> {
        if let Some(days) = self.simple_days_on_market {
            return Some(days);
        }

        let listed = DateTime::parse_from_rfc3339(self.list_date.as_deref()?).ok()?;
        Some((now - listed.with_timezone(&Utc)).num_days().max(0))
    }
}

/// Wire shape of a listing. Converted into [`Listing`] on deserialization so the
/// coordinate layout is guessed exactly once.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawListing {
    #[serde(deserialize_with = "lenient::opt_string")]
    mls_number: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    class: Option<String>,
    #[serde(rename = "type", deserialize_with = "lenient::opt_string")]
    sale_type: Option<String>,
    #[serde(deserialize_with = "lenient::opt_f64")]
    list_price: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_f64")]
    price: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_f64")]
    original_price: Option<f64>,
    #[serde(deserialize_with = "lenient::opt_string")]
    status: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    list_date: Option<String>,
    #[serde(deserialize_with = "lenient::opt_f64")]
    simple_days_on_market: Option<f64>,
    address: Option<Value>,
    details: Option<Value>,
    images: Option<Value>,

    map: Option<Value>,
    latitude: Option<Value>,
    longitude: Option<Value>,
    lat: Option<Value>,
    lng: Option<Value>,
    coordinates: Option<Value>,
    location: Option<Value>,
}

impl From<RawListing> for Listing {
    fn from(raw: RawListing) -> Self {
        let coordinates = raw.resolve_coordinates();

        let address = match raw.address {
            Some(Value::String(full)) => Address {
                full: Some(full),
                ..Address::default()
            },
            Some(value @ Value::Object(_)) => serde_json::from_value(value).unwrap_or_default(),
            _ => Address::default(),
        };

        let details = raw
            .details
            .and_then(|d| serde_json::from_value(d).ok())
            .unwrap_or_default();

        let images = match raw.images {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .filter(|s| !s.is_empty())
                .collect(),
            _ => Vec::new(),
        };

        let list_price = raw
            .list_price
            .filter(|p| *p != 0.0)
            .or(raw.price)
            .or(raw.list_price);

        Listing {
            mls_number: raw.mls_number.unwrap_or_default(),
            class: raw.class,
            sale_type: raw.sale_type,
            list_price,
            original_price: raw.original_price,
            status: raw.status,
            list_date: raw.list_date,
            simple_days_on_market: raw.simple_days_on_market.map(|d| d as i64),
            address,
            details,
            images,
            coordinates,
        }
    }
}

impl RawListing {
    /// First valid pair wins, in a fixed order of known layouts.
    fn resolve_coordinates(&self) -> Option<LatLng> {
        let nested = |v: &Option<Value>, lat_keys: &[&str], lng_keys: &[&str]| {
            let obj = v.as_ref()?.as_object()?;
            let lat = lat_keys.iter().find_map(|k| obj.get(*k).and_then(lenient::as_f64))?;
            let lng = lng_keys.iter().find_map(|k| obj.get(*k).and_then(lenient::as_f64))?;
            LatLng::new(lat, lng)
        };
        let flat = |lat: &Option<Value>, lng: &Option<Value>| {
            LatLng::new(
                lat.as_ref().and_then(lenient::as_f64)?,
                lng.as_ref().and_then(lenient::as_f64)?,
            )
        };

        nested(&self.map, &["latitude"], &["longitude"])
            .or_else(|| flat(&self.latitude, &self.longitude))
            .or_else(|| flat(&self.lat, &self.lng))
            .or_else(|| nested(&self.coordinates, &["lat", "latitude"], &["lng", "longitude"]))
            .or_else(|| nested(&self.location, &["lat", "latitude"], &["lng", "longitude"]))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub num_pages: u32,
    pub page_size: u32,
    pub count: u64,
}

impl Pagination {
    pub fn empty(page_size: u32) -> Self {
        Self {
            page: 1,
            num_pages: 1,
            page_size,
            count: 0,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.num_pages
    }
}

/// One page of eligible listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub listings: Vec<Listing>,
    pub pagination: Pagination,
    /// Listings the upstream returned for this page before exclusion.
    pub raw_count: usize,
    /// Set once the total has been reconciled: the pre-exclusion total.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_count: Option<u64>,
}

impl Page {
    pub fn empty(page_size: u32) -> Self {
        Self {
            listings: Vec::new(),
            pagination: Pagination::empty(page_size),
            raw_count: 0,
            original_count: None,
        }
    }

    pub fn excluded(&self) -> usize {
        self.raw_count.saturating_sub(self.listings.len())
    }
}

/// Upstream values arrive as numbers, numeric strings or null depending on the board.
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn as_f64(v: &Value) -> Option<f64> {
        let parsed = match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed.filter(|f| f.is_finite())
    }

    pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(as_f64))
    }

    pub fn opt_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value
            .as_ref()
            .and_then(as_f64)
            .filter(|f| *f >= 0.0)
            .map(|f| f as u32))
    }

    pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }
}
