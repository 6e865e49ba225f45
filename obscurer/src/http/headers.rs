//! HTTP headers.
use std::collections::{hash_map::Iter, HashMap};

/// HTTP headers. Names are case insensitive.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Headers {
    headers: HashMap<String, String>,
}

impl Headers {
    /// Create new empty headers storage.
    pub fn new() -> Self {
        Self {
            headers: HashMap::new(),
        }
    }

    /// Add a header to the headers storage. The name will be converted to lowercase.
    /// An existing header with the same name is replaced.
    ///
    /// # Example
    ///
    /// ```
    /// # use obscurer::http::Headers;
    /// let mut headers = Headers::new();
    /// headers.insert("Location", "/hey/der");
    /// ```
    pub fn insert(&mut self, name: impl ToString, value: impl ToString) {
        self.headers
            .insert(name.to_string().to_lowercase(), value.to_string());
    }

    /// Get a header value by name. Case insensitive.
    ///
    /// # Example
    ///
    /// ```
    /// # use obscurer::http::Headers;
    /// # let mut headers = Headers::new();
    /// # headers.insert("Location", "/hey/der");
    /// let header = headers.get("location");
    /// assert_eq!(header, Some(&String::from("/hey/der")));
    /// ```
    pub fn get(&self, name: &str) -> Option<&String> {
        self.headers.get(&name.to_lowercase())
    }

    /// Is the header set? Case insensitive.
    pub fn contains(&self, name: &str) -> bool {
        self.headers.contains_key(&name.to_lowercase())
    }

    /// Remove a header by name. Case insensitive.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.headers.remove(&name.to_lowercase())
    }

    /// Remove all headers.
    pub fn clear(&mut self) {
        self.headers.clear();
    }

    /// Number of headers set.
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Get a borrowing interator to the headers.
    pub fn iter(&self) -> Iter<String, String> {
        self.headers.iter()
    }

    /// Convert headers to bytes.
    /// Used to send headers to the client.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        for (name, value) in &self.headers {
            bytes.extend_from_slice(name.as_bytes());
            bytes.extend_from_slice(b": ");
            bytes.extend_from_slice(value.as_bytes());
            bytes.extend_from_slice(b"\r\n");
        }
        bytes
    }
}

impl From<HashMap<String, String>> for Headers {
    fn from(headers: HashMap<String, String>) -> Self {
        let mut result = Headers::new();
        for (name, value) in headers {
            result.insert(name, value);
        }
        result
    }
}
