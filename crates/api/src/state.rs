use std::sync::Arc;

use extract::PropertyExtractor;
use ingest::PdfFetcher;
use store::{IdentityProvider, PropertyStore};

use crate::metrics::Metrics;

/// Everything a request needs, injected once at startup
#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityProvider>,
    pub store: Arc<dyn PropertyStore>,
    pub fetcher: Arc<dyn PdfFetcher>,
    pub extractor: PropertyExtractor,
    pub metrics: Arc<Metrics>,
}
