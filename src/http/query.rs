//! Query string parsing module
//!
//! Percent-decodes the request query string into a key/value map with typed
//! accessors. Numeric accessors return the message for a 400 response when a
//! value does not parse.

use std::collections::HashMap;

use hyper::Uri;

/// Decoded query parameters. Duplicate keys keep the last value.
#[derive(Debug, Default)]
pub struct QueryMap(HashMap<String, String>);

impl QueryMap {
    #[must_use]
    pub fn from_uri(uri: &Uri) -> Self {
        let map = uri
            .query()
            .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        Self(map)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Parse an optional `u32` parameter
    pub fn get_u32(&self, key: &str) -> Result<Option<u32>, String> {
        self.parse_with(key, str::parse::<u32>)
    }

    /// Parse an optional `u8` parameter
    pub fn get_u8(&self, key: &str) -> Result<Option<u8>, String> {
        self.parse_with(key, str::parse::<u8>)
    }

    /// True when the parameter is present and exactly the string `true`
    #[must_use]
    pub fn is_true(&self, key: &str) -> bool {
        self.get(key) == Some("true")
    }

    fn parse_with<T, E>(
        &self,
        key: &str,
        parse: impl Fn(&str) -> Result<T, E>,
    ) -> Result<Option<T>, String> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) => parse(raw)
                .map(Some)
                .map_err(|_| format!("invalid value for '{key}': {raw}")),
        }
    }
}
