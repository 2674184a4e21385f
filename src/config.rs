use config::{Config, ConfigError};
use serde::Deserialize;
use tracing::debug;

use crate::map::bounds::Bounds;

#[derive(Debug, Default, Deserialize, Clone)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub map: MapSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

/// Upstream listings API.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Required; checked when the client is built, not here.
    pub api_key: Option<String>,
    #[serde(default = "default_key_header")]
    pub key_header: String,
    #[serde(default = "default_city")]
    pub city: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default = "default_class")]
    pub class: String,
    #[serde(default = "default_board_ids")]
    pub board_ids: Vec<u32>,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SearchSettings {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_min_sale_price")]
    pub min_sale_price: f64,
    #[serde(default = "default_allowed_classes")]
    pub allowed_classes: Vec<String>,
    #[serde(default = "default_excluded_type_terms")]
    pub excluded_type_terms: Vec<String>,
    #[serde(default = "default_max_reconcile_pages")]
    pub max_reconcile_pages: u32,
    #[serde(default = "default_max_map_pages")]
    pub max_map_pages: u32,
    #[serde(default = "default_map_concurrency")]
    pub map_concurrency: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MapSettings {
    #[serde(default = "default_min_zoom")]
    pub min_zoom: f64,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_service_area")]
    pub service_area: Option<Bounds>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_addr")]
    pub addr: String,
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
    #[serde(default = "default_site_name")]
    pub site_name: String,
}

fn default_base_url() -> String {
    "https://api.repliers.io".to_string()
}

fn default_key_header() -> String {
    "REPLIERS-API-KEY".to_string()
}

fn default_city() -> String {
    "brantford".to_string()
}

fn default_status() -> String {
    "A".to_string()
}

fn default_class() -> String {
    "residential".to_string()
}

fn default_board_ids() -> Vec<u32> {
    vec![87, 88, 90, 91]
}

fn default_image_base_url() -> String {
    "https://cdn.repliers.io/".to_string()
}

fn default_page_size() -> u32 {
    100
}

fn default_min_sale_price() -> f64 {
    30_000.0
}

fn default_allowed_classes() -> Vec<String> {
    vec!["ResidentialProperty".to_string(), "CondoProperty".to_string()]
}

fn default_excluded_type_terms() -> Vec<String> {
    vec!["lease".to_string(), "rent".to_string(), "rental".to_string()]
}

fn default_max_reconcile_pages() -> u32 {
    15
}

fn default_max_map_pages() -> u32 {
    20
}

fn default_map_concurrency() -> usize {
    4
}

fn default_min_zoom() -> f64 {
    10.0
}

fn default_debounce_ms() -> u64 {
    300
}

// Brantford and surroundings.
fn default_service_area() -> Option<Bounds> {
    Some(Bounds {
        north: 44.5,
        south: 42.5,
        east: -79.5,
        west: -81.5,
    })
}

fn default_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_max_workers() -> usize {
    8
}

fn default_site_name() -> String {
    "Brantford Homes".to_string()
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            key_header: default_key_header(),
            city: default_city(),
            status: default_status(),
            class: default_class(),
            board_ids: default_board_ids(),
            image_base_url: default_image_base_url(),
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            min_sale_price: default_min_sale_price(),
            allowed_classes: default_allowed_classes(),
            excluded_type_terms: default_excluded_type_terms(),
            max_reconcile_pages: default_max_reconcile_pages(),
            max_map_pages: default_max_map_pages(),
            map_concurrency: default_map_concurrency(),
        }
    }
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            min_zoom: default_min_zoom(),
            debounce_ms: default_debounce_ms(),
            service_area: default_service_area(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            max_workers: default_max_workers(),
            site_name: default_site_name(),
        }
    }
}

impl Settings {
    /// Loads `path` (optional, any format the `config` crate knows) and then
    /// `APP_`-prefixed environment variables, e.g. `APP_API__API_KEY`.
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            );

        let config = builder.build()?;
        let settings: Settings = config.try_deserialize()?;

        debug!(
            base_url = %settings.api.base_url,
            city = %settings.api.city,
            has_api_key = settings.api.api_key.is_some(),
            "Loaded settings"
        );

        Ok(settings)
    }
}
