//! Popular icon dataset
//!
//! A read-only lookup table of well-known domains to pre-rendered PNG
//! icons, loaded once at startup. A hit here short-circuits the pipeline
//! before any outbound request is made.

use anyhow::{Context, Result};
use base64::{engine::general_purpose, Engine as _};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// Immutable domain -> PNG bytes mapping
///
/// The backing dataset is a JSON object of domain names to base64-encoded
/// PNG data. Entries are decoded eagerly so that malformed data fails at
/// startup rather than on a request path.
#[derive(Debug, Default)]
pub struct PopularIconStore {
    icons: HashMap<String, Vec<u8>>,
}

impl PopularIconStore {
    /// Load the dataset from a JSON file.
    ///
    /// A missing file is not an error: the service still works without a
    /// popular tier, every request just goes through the live fetch.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(
                "Popular icon dataset not found at {}, starting with an empty store",
                path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read popular icon dataset {}", path.display()))?;
        let encoded: HashMap<String, String> = serde_json::from_str(&contents)
            .with_context(|| format!("Malformed popular icon dataset {}", path.display()))?;

        let store = Self::from_encoded(encoded)?;
        info!("Loaded {} popular icons from {}", store.len(), path.display());
        Ok(store)
    }

    /// Build a store from already-parsed base64 entries.
    pub fn from_encoded(encoded: HashMap<String, String>) -> Result<Self> {
        let mut icons = HashMap::with_capacity(encoded.len());
        for (domain, data) in encoded {
            let bytes = general_purpose::STANDARD
                .decode(data.as_bytes())
                .with_context(|| format!("Malformed base64 icon data for {domain}"))?;
            icons.insert(domain, bytes);
        }
        Ok(Self { icons })
    }

    /// Look up a domain, falling back to its `www.`-prefixed variant.
    pub fn lookup(&self, domain: &str) -> Option<Vec<u8>> {
        self.icons
            .get(domain)
            .or_else(|| self.icons.get(&format!("www.{domain}")))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(entries: &[(&str, &[u8])]) -> PopularIconStore {
        let encoded = entries
            .iter()
            .map(|(domain, bytes)| {
                (
                    domain.to_string(),
                    general_purpose::STANDARD.encode(bytes),
                )
            })
            .collect();
        PopularIconStore::from_encoded(encoded).unwrap()
    }

    #[test]
    fn exact_match_returns_stored_bytes() {
        let store = store_with(&[("example.com", b"png-bytes")]);
        assert_eq!(store.lookup("example.com"), Some(b"png-bytes".to_vec()));
    }

    #[test]
    fn falls_back_to_www_prefixed_key() {
        let store = store_with(&[("www.example.com", b"www-bytes")]);
        assert_eq!(store.lookup("example.com"), Some(b"www-bytes".to_vec()));
    }

    #[test]
    fn exact_match_wins_over_www_variant() {
        let store = store_with(&[
            ("example.com", b"bare".as_slice()),
            ("www.example.com", b"www".as_slice()),
        ]);
        assert_eq!(store.lookup("example.com"), Some(b"bare".to_vec()));
    }

    #[test]
    fn miss_returns_none() {
        let store = store_with(&[("example.com", b"png-bytes")]);
        assert_eq!(store.lookup("other.org"), None);
    }

    #[test]
    fn malformed_base64_fails_at_load() {
        let mut encoded = HashMap::new();
        encoded.insert("example.com".to_string(), "not base64!!!".to_string());
        assert!(PopularIconStore::from_encoded(encoded).is_err());
    }

    #[test]
    fn missing_dataset_file_yields_empty_store() {
        let store = PopularIconStore::load(Path::new("./does-not-exist.json")).unwrap();
        assert!(store.is_empty());
    }
}
