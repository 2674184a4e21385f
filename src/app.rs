use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Runtime;

use crate::config::Settings;
use crate::listings::ListingsApi;
use crate::map::BoundsFilter;

/// Everything a request handler needs. Handlers run on astra's worker threads
/// and drive listing futures to completion on the shared runtime.
pub struct App {
    pub settings: Settings,
    pub api: Arc<dyn ListingsApi>,
    pub bounds: BoundsFilter,
    runtime: Arc<Runtime>,
}

impl App {
    pub fn new(settings: Settings, api: Arc<dyn ListingsApi>, runtime: Arc<Runtime>) -> Self {
        let bounds = BoundsFilter::from_settings(&settings.map);
        Self {
            settings,
            api,
            bounds,
            runtime,
        }
    }

    pub fn api(&self) -> &dyn ListingsApi {
        self.api.as_ref()
    }

    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}
