use sha2::{Digest, Sha256};

use super::normalize;

/// Hex SHA-256 of the whitespace-normalized text.
pub fn hash_source(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize::clean_string(text).as_bytes());
    let result = hasher.finalize();
    hex::encode(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_ignores_incidental_whitespace() {
        assert_eq!(hash_source("a  b"), hash_source(" a b "));
        assert_ne!(hash_source("a b"), hash_source("a c"));
        assert_eq!(hash_source("x").len(), 64);
    }
}
