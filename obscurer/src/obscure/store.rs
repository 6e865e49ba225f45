//! Mappings between obscured URLs and their original form.
//!
//! The store is keyed by the path of the obscured URL. A mapping, once stored,
//! never changes: storing another original under the same obscured path is a no-op,
//! so a URL handed out to a client keeps pointing to the same resource until it's
//! removed.
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;
use crate::http::Url;

#[derive(Error, Debug)]
pub enum Error {
    #[error("store backend error: {0}")]
    Backend(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wrap an error returned by the store's backend.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Error::Backend(Box::new(err))
    }
}

/// An obscured URL and the URL it stands for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mapping {
    pub obscured: Url,
    pub original: Url,
}

impl Mapping {
    pub fn new(obscured: Url, original: Url) -> Self {
        Self { obscured, original }
    }
}

/// Stores mappings between obscured URLs and their original form.
///
/// All methods are called concurrently from in-flight requests, so implementations
/// do their own synchronization.
pub trait Store: Send + Sync {
    /// Store the mapping, unless the obscured URL is already mapped.
    fn put(&self, obscured: &Url, original: &Url) -> Result<(), Error>;

    /// Get the original form of the obscured URL.
    fn get(&self, obscured: &Url) -> Option<Url>;

    /// Remove the mapping for the obscured URL. Removing a missing mapping is fine.
    fn remove(&self, obscured: &Url) -> Result<(), Error>;

    /// Remove all mappings.
    fn clear(&self) -> Result<(), Error>;

    /// Number of mappings.
    fn size(&self) -> usize;

    /// Store a batch of mappings, stopping at the first error.
    /// Mappings stored before the error stay stored.
    fn load(&self, mappings: &[Mapping]) -> Result<(), Error> {
        for mapping in mappings {
            self.put(&mapping.obscured, &mapping.original)?;
        }

        Ok(())
    }
}

/// Stores all mappings in memory.
///
/// Keys are spread over independently locked shards, so requests touching
/// different URLs rarely wait on each other.
pub struct MemoryStore {
    shards: Vec<RwLock<HashMap<String, Url>>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::with_shards(16)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with the given number of shards (at least one).
    pub fn with_shards(shards: usize) -> Self {
        Self {
            shards: (0..shards.max(1))
                .map(|_| RwLock::new(HashMap::new()))
                .collect(),
        }
    }

    /// Create a store sized by the configuration and load the configured mappings.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let store = Self::with_shards(config.store.shards);
        store.load(&config.mappings)?;
        Ok(store)
    }

    fn shard(&self, key: &str) -> &RwLock<HashMap<String, Url>> {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        &self.shards[hasher.finish() as usize % self.shards.len()]
    }
}

impl Store for MemoryStore {
    fn put(&self, obscured: &Url, original: &Url) -> Result<(), Error> {
        self.shard(obscured.path())
            .write()
            .entry(obscured.path().to_string())
            .or_insert_with(|| original.clone());

        Ok(())
    }

    fn get(&self, obscured: &Url) -> Option<Url> {
        self.shard(obscured.path())
            .read()
            .get(obscured.path())
            .cloned()
    }

    fn remove(&self, obscured: &Url) -> Result<(), Error> {
        self.shard(obscured.path()).write().remove(obscured.path());
        Ok(())
    }

    fn clear(&self) -> Result<(), Error> {
        for shard in &self.shards {
            shard.write().clear();
        }

        Ok(())
    }

    fn size(&self) -> usize {
        self.shards.iter().map(|shard| shard.read().len()).sum()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Arc;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_put_get() {
        let store = MemoryStore::new();
        let original = url("https://example.com/this/is/the/way?q=1#top");

        store.put(&url("/abc"), &original).unwrap();
        assert_eq!(store.get(&url("/abc")), Some(original));
        assert_eq!(store.get(&url("/def")), None);
        assert_eq!(store.size(), 1);
    }

    #[test]
    fn test_keyed_by_path() {
        let store = MemoryStore::new();
        store.put(&url("http://a.com/abc?x=1"), &url("/one")).unwrap();

        assert_eq!(store.get(&url("/abc")), Some(url("/one")));
        assert_eq!(store.get(&url("https://b.com/abc#f")), Some(url("/one")));
    }

    #[test]
    fn test_put_is_idempotent() {
        let store = MemoryStore::with_shards(1);
        store.put(&url("/abc"), &url("/first")).unwrap();
        store.put(&url("/abc"), &url("/second")).unwrap();

        assert_eq!(store.get(&url("/abc")), Some(url("/first")));
        assert_eq!(store.size(), 1);
    }

    #[test]
    fn test_remove_and_clear() {
        let store = MemoryStore::new();
        store
            .load(&[
                Mapping::new(url("/a"), url("/1")),
                Mapping::new(url("/b"), url("/2")),
                Mapping::new(url("/c"), url("/3")),
            ])
            .unwrap();
        assert_eq!(store.size(), 3);

        store.remove(&url("/a")).unwrap();
        store.remove(&url("/a")).unwrap();
        assert_eq!(store.get(&url("/a")), None);
        assert_eq!(store.size(), 2);

        store.clear().unwrap();
        assert_eq!(store.size(), 0);
    }

    #[test]
    fn test_zero_shards() {
        let store = MemoryStore::with_shards(0);
        store.put(&url("/a"), &url("/1")).unwrap();
        assert_eq!(store.size(), 1);
    }

    #[test]
    fn test_from_config() {
        let config = Config::parse(
            r#"
[store]
shards = 2

[[mappings]]
obscured = "/a"
original = "/this/is/the/way"
"#,
        )
        .unwrap();

        let store = MemoryStore::from_config(&config).unwrap();
        assert_eq!(store.get(&url("/a")), Some(url("/this/is/the/way")));
    }

    struct FailAfter {
        inner: MemoryStore,
        limit: usize,
    }

    impl Store for FailAfter {
        fn put(&self, obscured: &Url, original: &Url) -> Result<(), Error> {
            if self.inner.size() >= self.limit {
                return Err(Error::backend(std::io::Error::other("full")));
            }
            self.inner.put(obscured, original)
        }

        fn get(&self, obscured: &Url) -> Option<Url> {
            self.inner.get(obscured)
        }

        fn remove(&self, obscured: &Url) -> Result<(), Error> {
            self.inner.remove(obscured)
        }

        fn clear(&self) -> Result<(), Error> {
            self.inner.clear()
        }

        fn size(&self) -> usize {
            self.inner.size()
        }
    }

    #[test]
    fn test_load_stops_at_first_error() {
        let store = FailAfter {
            inner: MemoryStore::new(),
            limit: 1,
        };

        let err = store
            .load(&[
                Mapping::new(url("/a"), url("/1")),
                Mapping::new(url("/b"), url("/2")),
                Mapping::new(url("/c"), url("/3")),
            ])
            .expect_err("second put fails");
        assert_eq!(err.to_string(), "store backend error: full");
        assert_eq!(store.size(), 1);
        assert_eq!(store.get(&url("/a")), Some(url("/1")));
    }

    #[test]
    fn test_concurrent() {
        let store = Arc::new(MemoryStore::new());

        let threads = (0..8)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..100 {
                        let obscured = url(&format!("/{}", i));
                        store.put(&obscured, &url(&format!("/{}/{}", t, i))).unwrap();
                        assert!(store.get(&obscured).is_some());
                    }
                })
            })
            .collect::<Vec<_>>();

        for thread in threads {
            thread.join().unwrap();
        }

        // Every key was written by 8 threads, only one write won.
        assert_eq!(store.size(), 100);
    }
}
