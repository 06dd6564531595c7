//! # Cache Error Types
//!
//! Error kinds surfaced by the cache engine. They cross the HTTP boundary as
//! status codes only, so the enum stays small and `Copy`.

use thiserror::Error;

/// Result type used across ShardKV components.
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors reported by cache operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum CacheError {
    /// The key is absent, or present but past its deadline.
    #[error("key not found")]
    KeyNotFound,

    /// The key holds a map, but the requested field is absent.
    #[error("hash field not found")]
    HashFieldNotFound,

    /// The key holds a value of a different shape than the operation needs.
    #[error("wrong value type for key")]
    WrongType,

    /// An engine invariant was violated or a response could not be framed.
    #[error("internal cache error")]
    Internal,
}

impl CacheError {
    /// Returns true for the kinds the HTTP layer reports as 404.
    pub const fn is_not_found(self) -> bool {
        matches!(self, Self::KeyNotFound | Self::HashFieldNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::CacheError;

    #[test]
    fn not_found_kinds() {
        assert!(CacheError::KeyNotFound.is_not_found());
        assert!(CacheError::HashFieldNotFound.is_not_found());
        assert!(!CacheError::WrongType.is_not_found());
        assert!(!CacheError::Internal.is_not_found());
    }
}
