//! Zarr storage ([stores](store)).
//!
//! A Zarr [store] is a system that can be used to store and retrieve data from a Zarr hierarchy.
//! It maps [`StoreKey`]s (such as `measurements/temperature/.zarray`) to byte sequences.
//! Hierarchy levels in the key space are [`StorePrefix`]es, which always end in `/`.
//!
//! This module defines abstract store interfaces split by capability
//! ([`ReadableStorageTraits`], [`WritableStorageTraits`], [`ListableStorageTraits`])
//! and includes the [`FilesystemStore`](store::FilesystemStore) and [`MemoryStore`](store::MemoryStore) implementations.

pub mod store;
mod store_key;
mod store_prefix;

use thiserror::Error;

use crate::node::NodePath;

pub use store_key::{StoreKey, StoreKeyError, StoreKeys};
pub use store_prefix::{StorePrefix, StorePrefixError, StorePrefixes};

/// The metadata key of a Zarr V2 array.
pub const ARRAY_METADATA_KEY: &str = ".zarray";

/// The metadata key of a Zarr V2 group.
pub const GROUP_METADATA_KEY: &str = ".zgroup";

/// The user attributes key of a Zarr V2 array or group.
pub const ATTRIBUTES_KEY: &str = ".zattrs";

/// The value (bytes) at a store key, or [`None`] if the key does not exist.
pub type MaybeBytes = Option<Vec<u8>>;

/// Readable storage traits.
pub trait ReadableStorageTraits: Send + Sync {
    /// Retrieve the value (bytes) associated with a given [`StoreKey`].
    ///
    /// Returns [`None`] if the key is not found.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if there is an error with the underlying store.
    fn get(&self, key: &StoreKey) -> Result<MaybeBytes, StorageError>;

    /// Returns true if the store has a value at `key`.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if there is an error with the underlying store.
    fn key_exists(&self, key: &StoreKey) -> Result<bool, StorageError> {
        Ok(self.get(key)?.is_some())
    }
}

/// Writable storage traits.
pub trait WritableStorageTraits: Send + Sync {
    /// Store `value` at a [`StoreKey`], creating any parent hierarchy as needed.
    ///
    /// A fully written value replaces any predecessor at the key.
    ///
    /// # Errors
    /// Returns a [`StorageError`] on failure to store.
    fn set(&self, key: &StoreKey, value: &[u8]) -> Result<(), StorageError>;

    /// Erase a [`StoreKey`].
    ///
    /// Succeeds if the key does not exist.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if there is an underlying storage error.
    fn erase(&self, key: &StoreKey) -> Result<(), StorageError>;

    /// Erase all [`StoreKey`]s under a [`StorePrefix`].
    ///
    /// Succeeds if the prefix does not exist.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if there is an underlying storage error.
    fn erase_prefix(&self, prefix: &StorePrefix) -> Result<(), StorageError>;
}

/// Listable storage traits.
pub trait ListableStorageTraits: Send + Sync {
    /// Retrieve all [`StoreKeys`] in the store, sorted.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if there is an underlying error with the store.
    fn list(&self) -> Result<StoreKeys, StorageError>;

    /// Retrieve the [`StoreKeys`] and [`StorePrefix`]es which are direct children of `prefix`, sorted.
    ///
    /// # Errors
    /// Returns a [`StorageError`] if there is an underlying error with the store.
    fn list_dir(&self, prefix: &StorePrefix) -> Result<StoreKeysPrefixes, StorageError>;
}

/// A supertrait of [`ReadableStorageTraits`] and [`WritableStorageTraits`].
pub trait ReadableWritableStorageTraits: ReadableStorageTraits + WritableStorageTraits {}

impl<T> ReadableWritableStorageTraits for T where T: ReadableStorageTraits + WritableStorageTraits {}

/// A supertrait of [`ReadableStorageTraits`] and [`ListableStorageTraits`].
pub trait ReadableListableStorageTraits: ReadableStorageTraits + ListableStorageTraits {}

impl<T> ReadableListableStorageTraits for T where T: ReadableStorageTraits + ListableStorageTraits {}

/// [`StoreKeys`] and [`StorePrefixes`].
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct StoreKeysPrefixes {
    keys: StoreKeys,
    prefixes: StorePrefixes,
}

impl StoreKeysPrefixes {
    /// Create a new [`StoreKeysPrefixes`].
    #[must_use]
    pub fn new(keys: StoreKeys, prefixes: StorePrefixes) -> Self {
        Self { keys, prefixes }
    }

    /// Returns the keys.
    #[must_use]
    pub fn keys(&self) -> &StoreKeys {
        &self.keys
    }

    /// Returns the prefixes.
    #[must_use]
    pub fn prefixes(&self) -> &StorePrefixes {
        &self.prefixes
    }
}

/// A storage error.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An IO error at a store key or prefix.
    #[error("i/o failure at {path}: {source}")]
    IOError {
        /// The store key or prefix of the failed operation.
        path: String,
        /// The underlying error.
        source: std::io::Error,
    },
    /// An invalid store key.
    #[error(transparent)]
    InvalidStoreKey(#[from] StoreKeyError),
    /// An invalid store prefix.
    #[error(transparent)]
    InvalidStorePrefix(#[from] StorePrefixError),
}

impl StorageError {
    /// Create an IO error at a store key or prefix.
    #[must_use]
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::IOError {
            path: path.into(),
            source,
        }
    }
}

fn meta_key_any(path: &NodePath, metadata_file_name: &str) -> StoreKey {
    let path = path.as_str();
    if path.eq("/") {
        unsafe { StoreKey::new_unchecked(metadata_file_name.to_string()) }
    } else {
        let path = path.strip_prefix('/').unwrap_or(path);
        unsafe { StoreKey::new_unchecked(format!("{path}/{metadata_file_name}")) }
    }
}

/// Return the array metadata key (`.zarray`) given a node path.
#[must_use]
pub fn meta_key_array(path: &NodePath) -> StoreKey {
    meta_key_any(path, ARRAY_METADATA_KEY)
}

/// Return the group metadata key (`.zgroup`) given a node path.
#[must_use]
pub fn meta_key_group(path: &NodePath) -> StoreKey {
    meta_key_any(path, GROUP_METADATA_KEY)
}

/// Return the user attributes key (`.zattrs`) given a node path.
#[must_use]
pub fn meta_key_attributes(path: &NodePath) -> StoreKey {
    meta_key_any(path, ATTRIBUTES_KEY)
}

/// Return the data key given a node path and an encoded chunk key such as `0.1.2`.
#[must_use]
pub fn data_key(path: &NodePath, chunk_key: &str) -> StoreKey {
    meta_key_any(path, chunk_key)
}

/// Return the store prefix of a node path (`""` for the root).
#[must_use]
pub fn node_prefix(path: &NodePath) -> StorePrefix {
    let path = path.as_str();
    if path.eq("/") {
        StorePrefix::root()
    } else {
        let path = path.strip_prefix('/').unwrap_or(path);
        unsafe { StorePrefix::new_unchecked(format!("{path}/")) }
    }
}
