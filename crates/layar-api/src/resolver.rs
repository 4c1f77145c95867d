//! Ordered fallback chain over content sources.
//!
//! Sources are tried strictly sequentially in priority order, one
//! attempt each, so a higher-priority source's error can never race a
//! lower-priority source's success. The chain ends in the built-in
//! catalog, which cannot fail, so resolution always terminates.

use layar_core::config::AppConfig;
use layar_core::models::{Show, ShowDetails};

use crate::lk21::Lk21Scraper;
use crate::mock::BuiltinCatalog;
use crate::proxy::ProxyCatalog;
use crate::source::{ContentSource, ListRequest};

/// Tries sources in priority order and returns the first non-empty
/// normalized result. Both entry points are total: source failures are
/// logged and skipped, never surfaced to the caller.
pub struct Resolver {
    sources: Vec<Box<dyn ContentSource>>,
}

impl Resolver {
    pub fn new(sources: Vec<Box<dyn ContentSource>>) -> Self {
        Self { sources }
    }

    /// Production chain: LK21 scraper, then the proxy catalog API,
    /// then the built-in dataset.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(vec![
            Box::new(Lk21Scraper::new(&config.sources)),
            Box::new(ProxyCatalog::new(&config.sources)),
            Box::new(BuiltinCatalog::new()),
        ])
    }

    pub async fn list(&self, request: &ListRequest) -> Vec<Show> {
        for source in &self.sources {
            match source.fetch_list(request).await {
                Ok(shows) if !shows.is_empty() => {
                    tracing::debug!(
                        source = source.name(),
                        request = %request.describe(),
                        count = shows.len(),
                        "request satisfied"
                    );
                    return shows;
                }
                Ok(_) => {
                    tracing::debug!(
                        source = source.name(),
                        request = %request.describe(),
                        "empty result, falling through"
                    );
                }
                Err(err) => {
                    tracing::warn!(
                        source = source.name(),
                        request = %request.describe(),
                        %err,
                        "source failed, falling through"
                    );
                }
            }
        }
        Vec::new()
    }

    pub async fn details(&self, id: &str) -> Option<ShowDetails> {
        for source in &self.sources {
            match source.fetch_details(id).await {
                Ok(Some(details)) => {
                    tracing::debug!(source = source.name(), id, "details satisfied");
                    return Some(details);
                }
                Ok(None) => {
                    tracing::debug!(source = source.name(), id, "unknown id, falling through");
                }
                Err(err) => {
                    tracing::warn!(source = source.name(), id, %err, "source failed, falling through");
                }
            }
        }
        None
    }
}
