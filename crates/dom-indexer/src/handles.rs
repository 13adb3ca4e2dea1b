//! Identifier → live element handle cache for one snapshot generation.

use std::collections::HashMap;
use std::time::Duration;

use cdp_session::{Element, Page};
use tokio::time::timeout;
use tracing::debug;

use crate::errors::IndexError;

/// Attribute the scan stamps onto addressable elements; resolution looks
/// elements up by it.
pub const MARKER_ATTRIBUTE: &str = "data-pilot-id";

/// Lazily populated cache of resolved element handles.
///
/// The cache belongs to exactly one page and one snapshot generation. Every
/// DOM-mutating operation must call [`HandleCache::invalidate_all`]; a
/// handle must never survive an invalidation boundary, because the same
/// identifier may name a different element in the next generation.
///
/// Generic over the handle type so the invalidation contract can be tested
/// without a protocol connection; production code uses the default
/// [`Element`] handle.
#[derive(Debug)]
pub struct HandleCache<H = Element> {
    entries: HashMap<u32, H>,
    resolve_timeout: Duration,
}

impl<H> HandleCache<H> {
    pub fn new(resolve_timeout: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            resolve_timeout,
        }
    }

    /// Drop every cached handle. Called by all mutating actions and on page
    /// switches.
    pub fn invalidate_all(&mut self) {
        if !self.entries.is_empty() {
            debug!(target: "dom-indexer", dropped = self.entries.len(), "handle cache invalidated");
        }
        self.entries.clear();
    }

    /// Cached handle for an identifier, if one was already resolved.
    pub fn get(&self, id: u32) -> Option<&H> {
        self.entries.get(&id)
    }

    pub fn insert(&mut self, id: u32, handle: H) {
        self.entries.insert(id, handle);
    }

    pub fn contains(&self, id: u32) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl HandleCache<Element> {
    /// Resolve an identifier to a live element, lazily.
    ///
    /// A cache hit costs nothing; a miss issues one marker-attribute lookup
    /// with a short deadline. Identifiers that no longer exist in the
    /// current generation fail with [`IndexError::HandleNotFound`].
    pub async fn resolve(&mut self, page: &Page, id: u32) -> Result<&Element, IndexError> {
        if !self.entries.contains_key(&id) {
            let selector = format!("[{MARKER_ATTRIBUTE}='{id}']");
            let element = match timeout(self.resolve_timeout, page.find_element(selector)).await {
                Ok(Ok(element)) => element,
                Ok(Err(err)) => {
                    debug!(target: "dom-indexer", id, %err, "handle lookup failed");
                    return Err(IndexError::HandleNotFound { id });
                }
                Err(_) => return Err(IndexError::HandleNotFound { id }),
            };
            self.entries.insert(id, element);
        }

        match self.entries.get(&id) {
            Some(element) => Ok(element),
            None => Err(IndexError::HandleNotFound { id }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalidation_empties_the_generation() {
        let mut cache: HandleCache<&'static str> = HandleCache::new(Duration::from_secs(2));
        cache.insert(1, "login button");
        cache.insert(2, "search box");
        assert_eq!(cache.len(), 2);
        assert!(cache.contains(1));

        cache.invalidate_all();

        // No identifier from the prior generation may resolve afterwards.
        assert!(cache.is_empty());
        assert!(!cache.contains(1));
        assert!(cache.get(2).is_none());
    }

    #[test]
    fn hits_do_not_duplicate_entries() {
        let mut cache: HandleCache<String> = HandleCache::new(Duration::from_millis(100));
        cache.insert(7, "handle".to_string());
        cache.insert(7, "handle again".to_string());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(7).map(String::as_str), Some("handle again"));
    }
}
