//! Icon resolution orchestration
//!
//! Runs the tiered lookup and owns the failure-containment contract: for
//! any syntactically valid hostname this service produces icon bytes.
//! Live-fetch failures never propagate past this layer; they degrade into
//! a generated placeholder.

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::errors::ResolveError;
use crate::fetcher::IconFetcher;
use crate::placeholder;
use crate::popular::PopularIconStore;
use crate::validation::is_valid_hostname;

/// Tiered icon resolution: popular dataset, live favicon fetch, generated
/// placeholder.
///
/// Collaborators are injected so tests can substitute a fake fetcher. The
/// popular store is immutable after load and shared freely across
/// concurrent requests.
#[derive(Clone)]
pub struct IconResolver {
    popular: Arc<PopularIconStore>,
    fetcher: Arc<dyn IconFetcher>,
}

impl IconResolver {
    pub fn new(popular: Arc<PopularIconStore>, fetcher: Arc<dyn IconFetcher>) -> Self {
        Self { popular, fetcher }
    }

    /// Resolve a domain to 32x32 PNG bytes.
    ///
    /// The only error a caller sees for a well-formed hostname is
    /// [`ResolveError::Encoding`]; everything else terminates in icon
    /// bytes from one of the three tiers.
    pub async fn resolve(&self, domain: &str) -> Result<Vec<u8>, ResolveError> {
        if !is_valid_hostname(domain) {
            info!("Request for invalid hostname: {domain}");
            return Err(ResolveError::InvalidHostname(domain.to_string()));
        }

        if let Some(bytes) = self.popular.lookup(domain) {
            debug!("Popular icon hit for {domain}");
            return Ok(bytes);
        }

        let start = Instant::now();
        match self.fetcher.fetch(domain).await {
            Ok(Some(bytes)) => {
                debug!("Live favicon for {} resolved in {:?}", domain, start.elapsed());
                Ok(bytes)
            }
            Ok(None) => {
                debug!("No favicon discoverable for {domain}, using placeholder");
                Ok(placeholder::generate(domain)?)
            }
            Err(e) => {
                warn!("Favicon fetch for {domain} failed, using placeholder: {e}");
                Ok(placeholder::generate(domain)?)
            }
        }
    }
}
