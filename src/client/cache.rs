use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::debug;

use super::Response;


#[derive(Debug)]
struct Entry {
    response: Response,
    expires: Instant,
}

/// Responses keyed by request path, each valid until its expiry instant
///
/// This is a handle: clones refer to the same storage, and all operations
/// go through a single lock. Keys are paths only, so a cache must not be
/// shared between requests to different hosts.
///
/// Expired entries are never evicted, they are ignored until the same path
/// is stored again.
#[derive(Debug, Clone, Default)]
pub struct ResponseCache(Arc<Mutex<HashMap<String, Entry>>>);

impl ResponseCache {
    pub fn new() -> ResponseCache {
        ResponseCache::default()
    }
    fn entries(&self) -> MutexGuard<HashMap<String, Entry>> {
        // The map is consistent after every operation, so poisoning is
        // of no interest
        self.0.lock().unwrap_or_else(|e| e.into_inner())
    }
    /// Store response for `ttl` starting from now
    pub fn store(&self, path: &str, response: Response, ttl: Duration) {
        match Instant::now().checked_add(ttl) {
            Some(expires) => self.store_until(path, response, expires),
            None => debug!("Not caching {}: ttl {:?} is too large",
                           path, ttl),
        }
    }
    /// Store response that is valid while the clock is before `expires`
    pub fn store_until(&self, path: &str, response: Response,
        expires: Instant)
    {
        self.entries().insert(path.to_string(), Entry {
            response: response,
            expires: expires,
        });
    }
    /// Returns a copy of the response if it's not expired at `now`
    pub fn lookup(&self, path: &str, now: Instant) -> Option<Response> {
        self.entries().get(path)
            .filter(|entry| now < entry.expires)
            .map(|entry| entry.response.clone())
    }
    /// Number of entries, including the expired ones
    pub fn len(&self) -> usize {
        self.entries().len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
    pub fn clear(&self) {
        self.entries().clear()
    }
}
