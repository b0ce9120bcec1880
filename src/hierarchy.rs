//! Generic persistence of record types as Zarr hierarchies.
//!
//! The [`ToZarr`] and [`FromZarr`] traits map composite values onto group trees:
//!  - a record (product type) maps to a group, with each field saved into a subdirectory named after the field,
//!  - a variant (sum type) dispatches to the selected alternative in the *same* directory,
//!    and is recovered on load by trying each alternative in declaration order,
//!  - an [`Option`] field is omitted when absent, and a missing child loads as [`None`],
//!  - [`Array`] and [`Group`] are the leaves.
//!
//! Implementations for record and variant types are generated with [`zarr_record!`](crate::zarr_record):
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use zarrs2::array::{Array, ArrayBuilder, DataType};
//! use zarrs2::hierarchy::{FromZarr, ToZarr};
//! use zarrs2::node::NodePath;
//! use zarrs2::storage::store::MemoryStore;
//! use zarrs2::zarr_record;
//!
//! zarr_record! {
//!     struct Sample {
//!         temperature: Array,
//!         mask: Array,
//!     }
//! }
//!
//! let sample = Sample {
//!     temperature: ArrayBuilder::new(vec![4], DataType::from_typestr("<f4")?)
//!         .build_from_elements::<f32>(&[1.0, 2.0, 3.0, 4.0])?,
//!     mask: ArrayBuilder::new(vec![4], DataType::from_typestr("|u1")?)
//!         .build_from_elements::<u8>(&[1, 0, 0, 1])?,
//! };
//!
//! let store = MemoryStore::new();
//! sample.to_zarr(&store, &NodePath::root())?;
//! let reloaded = Sample::from_zarr(&store, &NodePath::root())?;
//! assert_eq!(reloaded.temperature, sample.temperature);
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

use crate::{
    array::{Array, ArrayCreateError, ArrayError},
    group::{Group, GroupCreateError, GroupError},
    metadata::GroupMetadata,
    node::{NodeNameError, NodePath},
    storage::{
        meta_key_group, ListableStorageTraits, ReadableStorageTraits, StorageError,
        WritableStorageTraits,
    },
};

/// A value that can be saved as a Zarr hierarchy entry.
pub trait ToZarr {
    /// Save the value into `storage` at `path`.
    ///
    /// # Errors
    /// Returns a [`HierarchyError`] if the value or any part of it fails to save.
    fn to_zarr<TStorage: ?Sized + WritableStorageTraits>(
        &self,
        storage: &TStorage,
        path: &NodePath,
    ) -> Result<(), HierarchyError>;
}

/// A value that can be loaded from a Zarr hierarchy entry.
pub trait FromZarr: Sized {
    /// Load the value from `storage` at `path`.
    ///
    /// # Errors
    /// Returns a [`HierarchyError`] if the value or any part of it fails to load.
    fn from_zarr<TStorage: ?Sized + ReadableStorageTraits + ListableStorageTraits>(
        storage: &TStorage,
        path: &NodePath,
    ) -> Result<Self, HierarchyError>;
}

/// A hierarchy persistence error.
#[derive(Debug, Error)]
pub enum HierarchyError {
    /// A required child is absent.
    #[error("missing child {0}")]
    MissingChild(String),
    /// A child failed to load.
    #[error("failed to load child {name}: {source}")]
    MalformedChild {
        /// The child name.
        name: String,
        /// The failure.
        source: Box<HierarchyError>,
    },
    /// No alternative of a variant type could be loaded.
    #[error("no variant of {0} could be loaded")]
    NoMatchingVariant(&'static str),
    /// An array creation error.
    #[error(transparent)]
    ArrayCreateError(#[from] ArrayCreateError),
    /// An array operation error.
    #[error(transparent)]
    ArrayError(#[from] ArrayError),
    /// A group creation error.
    #[error(transparent)]
    GroupCreateError(#[from] GroupCreateError),
    /// A group operation error.
    #[error(transparent)]
    GroupError(#[from] GroupError),
    /// An invalid node name.
    #[error(transparent)]
    NodeNameError(#[from] NodeNameError),
    /// A storage error.
    #[error(transparent)]
    StorageError(#[from] StorageError),
    /// An error serialising metadata.
    #[error(transparent)]
    MetadataSerializationError(#[from] serde_json::Error),
}

impl HierarchyError {
    /// Returns true if the error means the entry is entirely absent from the store,
    /// rather than present but malformed.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            Self::ArrayCreateError(ArrayCreateError::MissingMetadata)
                | Self::GroupCreateError(GroupCreateError::MissingMetadata)
        )
    }
}

impl ToZarr for Array {
    fn to_zarr<TStorage: ?Sized + WritableStorageTraits>(
        &self,
        storage: &TStorage,
        path: &NodePath,
    ) -> Result<(), HierarchyError> {
        Ok(self.store(storage, path)?)
    }
}

impl FromZarr for Array {
    fn from_zarr<TStorage: ?Sized + ReadableStorageTraits + ListableStorageTraits>(
        storage: &TStorage,
        path: &NodePath,
    ) -> Result<Self, HierarchyError> {
        Ok(Self::open(storage, path)?)
    }
}

impl ToZarr for Group {
    fn to_zarr<TStorage: ?Sized + WritableStorageTraits>(
        &self,
        storage: &TStorage,
        path: &NodePath,
    ) -> Result<(), HierarchyError> {
        Ok(self.store(storage, path)?)
    }
}

impl FromZarr for Group {
    fn from_zarr<TStorage: ?Sized + ReadableStorageTraits + ListableStorageTraits>(
        storage: &TStorage,
        path: &NodePath,
    ) -> Result<Self, HierarchyError> {
        Ok(Self::open(storage, path)?)
    }
}

impl<T: ToZarr> ToZarr for Option<T> {
    fn to_zarr<TStorage: ?Sized + WritableStorageTraits>(
        &self,
        storage: &TStorage,
        path: &NodePath,
    ) -> Result<(), HierarchyError> {
        match self {
            Some(value) => value.to_zarr(storage, path),
            None => Ok(()),
        }
    }
}

impl<T: FromZarr> FromZarr for Option<T> {
    fn from_zarr<TStorage: ?Sized + ReadableStorageTraits + ListableStorageTraits>(
        storage: &TStorage,
        path: &NodePath,
    ) -> Result<Self, HierarchyError> {
        match T::from_zarr(storage, path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_missing() => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// Write the `.zgroup` document of a record at `path`.
///
/// # Errors
/// Returns a [`HierarchyError`] if there is an underlying store error.
pub fn write_group_metadata<TStorage: ?Sized + WritableStorageTraits>(
    storage: &TStorage,
    path: &NodePath,
) -> Result<(), HierarchyError> {
    storage.set(
        &meta_key_group(path),
        &serde_json::to_vec_pretty(&GroupMetadata::default())?,
    )?;
    Ok(())
}

/// Check the `.zgroup` document of a record at `path`.
///
/// # Errors
/// Returns a [`HierarchyError`] if the document is absent or invalid, or there is an underlying store error.
pub fn read_group_metadata<TStorage: ?Sized + ReadableStorageTraits>(
    storage: &TStorage,
    path: &NodePath,
) -> Result<(), HierarchyError> {
    let metadata = storage
        .get(&meta_key_group(path))?
        .ok_or(GroupCreateError::MissingMetadata)?;
    let _metadata: GroupMetadata = serde_json::from_slice(&metadata)
        .map_err(|err| GroupCreateError::InvalidMetadata(err.to_string()))?;
    Ok(())
}

/// Load the child called `name` at `path`, mapping failures to
/// [`MissingChild`](HierarchyError::MissingChild) or [`MalformedChild`](HierarchyError::MalformedChild).
///
/// # Errors
/// Returns a [`HierarchyError`] if the child fails to load.
pub fn load_child<
    T: FromZarr,
    TStorage: ?Sized + ReadableStorageTraits + ListableStorageTraits,
>(
    storage: &TStorage,
    path: &NodePath,
    name: &str,
) -> Result<T, HierarchyError> {
    T::from_zarr(storage, path).map_err(|err| {
        if err.is_missing() {
            HierarchyError::MissingChild(name.to_string())
        } else {
            HierarchyError::MalformedChild {
                name: name.to_string(),
                source: Box::new(err),
            }
        }
    })
}

/// Generate [`ToZarr`] and [`FromZarr`] implementations for a record or variant type.
///
/// A `struct` with named fields maps to a group: saving writes a `.zgroup` document and
/// saves each field into a subdirectory named after the field, in declaration order.
/// Loading is the dual, and fails with [`HierarchyError::MissingChild`] or
/// [`HierarchyError::MalformedChild`] on the first failing field.
///
/// An `enum` with single-field tuple variants dispatches saving to the selected variant
/// in the same directory; loading tries each variant in declaration order and takes the
/// first that succeeds.
#[macro_export]
macro_rules! zarr_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $( $(#[$field_meta:meta])* $field_vis:vis $field:ident : $field_type:ty ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $( $(#[$field_meta])* $field_vis $field : $field_type, )+
        }

        impl $crate::hierarchy::ToZarr for $name {
            fn to_zarr<TStorage: ?Sized + $crate::storage::WritableStorageTraits>(
                &self,
                storage: &TStorage,
                path: &$crate::node::NodePath,
            ) -> ::core::result::Result<(), $crate::hierarchy::HierarchyError> {
                $crate::hierarchy::write_group_metadata(storage, path)?;
                $(
                    $crate::hierarchy::ToZarr::to_zarr(
                        &self.$field,
                        storage,
                        &path.child(stringify!($field))?,
                    )?;
                )+
                Ok(())
            }
        }

        impl $crate::hierarchy::FromZarr for $name {
            fn from_zarr<
                TStorage: ?Sized
                    + $crate::storage::ReadableStorageTraits
                    + $crate::storage::ListableStorageTraits,
            >(
                storage: &TStorage,
                path: &$crate::node::NodePath,
            ) -> ::core::result::Result<Self, $crate::hierarchy::HierarchyError> {
                $crate::hierarchy::read_group_metadata(storage, path)?;
                Ok(Self {
                    $(
                        $field: $crate::hierarchy::load_child(
                            storage,
                            &path.child(stringify!($field))?,
                            stringify!($field),
                        )?,
                    )+
                })
            }
        }
    };
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$variant_meta:meta])* $variant:ident ( $variant_type:ty ) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $( $(#[$variant_meta])* $variant($variant_type), )+
        }

        impl $crate::hierarchy::ToZarr for $name {
            fn to_zarr<TStorage: ?Sized + $crate::storage::WritableStorageTraits>(
                &self,
                storage: &TStorage,
                path: &$crate::node::NodePath,
            ) -> ::core::result::Result<(), $crate::hierarchy::HierarchyError> {
                match self {
                    $( Self::$variant(value) => {
                        $crate::hierarchy::ToZarr::to_zarr(value, storage, path)
                    } )+
                }
            }
        }

        impl $crate::hierarchy::FromZarr for $name {
            fn from_zarr<
                TStorage: ?Sized
                    + $crate::storage::ReadableStorageTraits
                    + $crate::storage::ListableStorageTraits,
            >(
                storage: &TStorage,
                path: &$crate::node::NodePath,
            ) -> ::core::result::Result<Self, $crate::hierarchy::HierarchyError> {
                $(
                    if let Ok(value) =
                        <$variant_type as $crate::hierarchy::FromZarr>::from_zarr(storage, path)
                    {
                        return Ok(Self::$variant(value));
                    }
                )+
                Err($crate::hierarchy::HierarchyError::NoMatchingVariant(
                    stringify!($name),
                ))
            }
        }
    };
}
