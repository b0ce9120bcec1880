use derive_more::{Display, From};
use thiserror::Error;

use super::StoreKey;

/// A Zarr abstract store prefix.
///
/// A prefix is either the empty string (the root) or a string of `/` separated components ending in `/`.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display)]
pub struct StorePrefix(String);

/// An invalid store prefix.
#[derive(Debug, From, Error)]
#[error("invalid store prefix {0}")]
pub struct StorePrefixError(String);

/// A list of [`StorePrefix`].
pub type StorePrefixes = Vec<StorePrefix>;

impl StorePrefix {
    /// Create a new store prefix from `prefix`.
    ///
    /// # Errors
    /// Returns [`StorePrefixError`] if `prefix` is not valid according to [`StorePrefix::validate`].
    pub fn new(prefix: impl Into<String>) -> Result<Self, StorePrefixError> {
        let prefix = prefix.into();
        if Self::validate(&prefix) {
            Ok(Self(prefix))
        } else {
            Err(StorePrefixError(prefix))
        }
    }

    /// Create a new store prefix from `prefix` without validation.
    ///
    /// # Safety
    /// `prefix` is not validated, so this can result in an invalid store prefix.
    #[must_use]
    pub unsafe fn new_unchecked(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        debug_assert!(Self::validate(&prefix));
        Self(prefix)
    }

    /// The root prefix.
    #[must_use]
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Extracts a string slice of the underlying prefix.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validates a prefix: a prefix is the empty string or ends with `/`, does not start with `/`, and has no empty components.
    #[must_use]
    pub fn validate(prefix: &str) -> bool {
        prefix.is_empty()
            || (prefix.ends_with('/') && !prefix.starts_with('/') && !prefix.contains("//"))
    }

    /// Returns the name of the final component of the prefix (`""` for the root).
    #[must_use]
    pub fn name(&self) -> &str {
        self.0
            .strip_suffix('/')
            .map_or("", |stripped| stripped.rsplit('/').next().unwrap_or(stripped))
    }
}

impl From<&StoreKey> for StorePrefix {
    fn from(key: &StoreKey) -> Self {
        unsafe { Self::new_unchecked(key.as_str().to_string() + "/") }
    }
}
