//! Name obfuscation via SHA-256.
//!
//! Tag and category names appear in generated URLs as their SHA-256 digest
//! rather than as raw (often non-ASCII) display strings. The digest is a pure
//! function of the name, so the forward direction needs no state; the reverse
//! direction is only answerable within the vocabulary registered in this
//! process, which the site rebuilds from the known tag/category universe at
//! startup.
//!
//! SHA-256 collisions are treated as never occurring. The input domain is
//! human-chosen tag and category names, a few dozen short strings.

use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// SHA-256 of a string's UTF-8 bytes as a lowercase hex digest.
///
/// Full 64 hex characters, no truncation — the digest is the URL segment.
pub fn sha256_hex(text: &str) -> String {
    let digest = Sha256::digest(text.as_bytes());
    format!("{:x}", digest)
}

/// Bidirectional registry between display names and their digests.
///
/// Purely in-memory. Construct once per process from the known universe of
/// names ([`HashMapper::from_names`]) and pass it to whatever needs reverse
/// lookups; nothing is persisted.
#[derive(Debug, Default)]
pub struct HashMapper {
    hash_to_original: HashMap<String, String>,
    original_to_hash: HashMap<String, String>,
}

impl HashMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from an iterator of names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut mapper = Self::new();
        for name in names {
            mapper.register(name.as_ref());
        }
        mapper
    }

    /// Register a name and return its digest.
    ///
    /// Idempotent: the digest is a pure function of the name, so registering
    /// twice returns the same value and leaves the registry unchanged.
    pub fn register(&mut self, original: &str) -> String {
        if let Some(hash) = self.original_to_hash.get(original) {
            return hash.clone();
        }
        let hash = sha256_hex(original);
        self.hash_to_original
            .insert(hash.clone(), original.to_string());
        self.original_to_hash
            .insert(original.to_string(), hash.clone());
        hash
    }

    /// Reverse lookup: digest → name.
    ///
    /// Only answers for names registered in this process. Any other digest —
    /// however valid — is `None`.
    pub fn original(&self, hash: &str) -> Option<&str> {
        self.hash_to_original.get(hash).map(String::as_str)
    }

    /// Forward lookup: name → digest, without registering.
    pub fn hash_of(&self, original: &str) -> Option<&str> {
        self.original_to_hash.get(original).map(String::as_str)
    }

    /// All registered digests, unordered.
    pub fn hashes(&self) -> Vec<&str> {
        self.hash_to_original.keys().map(String::as_str).collect()
    }

    /// All registered names, unordered.
    pub fn originals(&self) -> Vec<&str> {
        self.original_to_hash.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.original_to_hash.len()
    }

    pub fn is_empty(&self) -> bool {
        self.original_to_hash.is_empty()
    }
}
