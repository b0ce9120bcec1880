//! A rust library for the [Zarr V2](https://zarr-specs.readthedocs.io/en/latest/v2/v2.0.html) storage format for multidimensional arrays and metadata.
//!
//! A Zarr V2 hierarchy is a tree of [`groups`](crate::group) and [`arrays`](crate::array).
//! An array is split into a regular grid of chunks, each stored as an independently compressed value in a [store](crate::storage).
//! Array metadata (`.zarray`), group metadata (`.zgroup`), and user attributes (`.zattrs`) are JSON documents alongside the chunks.
//!
//! ## Features
//!  - Stores: [`filesystem`](crate::storage::store::FilesystemStore), [`memory`](crate::storage::store::MemoryStore).
//!  - Data types: the NumPy typestr grammar (`<f8`, `>i4`, `|u1`, ...), including fixed-length bytestrings (`|S10`),
//!    fixed-length unicode strings (`<U10`), and structured data types.
//!  - Compressors: [`blosc`](crate::array::codec::BloscCodecConfiguration), [`zlib`](crate::array::codec::ZlibCodecConfiguration), or none.
//!  - Generic persistence of record types as group hierarchies with [`zarr_record!`](crate::zarr_record).
//!
//! ## Example
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use zarrs2::array::{Array, ArrayBuilder, DataType, FillValue};
//! use zarrs2::node::NodePath;
//! use zarrs2::storage::store::MemoryStore;
//!
//! let store = MemoryStore::new();
//! let path = NodePath::new("/identity")?;
//!
//! let array = ArrayBuilder::new(vec![4, 4], DataType::from_typestr("<f8")?)
//!     .chunk_shape(vec![2, 2])
//!     .fill_value(FillValue::from(0.0f64))
//!     .build_from_elements::<f64>(&[
//!         1.0, 0.0, 0.0, 0.0,
//!         0.0, 1.0, 0.0, 0.0,
//!         0.0, 0.0, 1.0, 0.0,
//!         0.0, 0.0, 0.0, 1.0,
//!     ])?;
//! array.store(&store, &path)?;
//!
//! let array = Array::open(&store, &path)?;
//! assert_eq!(array.get::<f64>(&[2, 2])?, 1.0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Licence
//! zarrs2 is licensed under either of
//!  - the Apache License, Version 2.0 [LICENSE-APACHE](./LICENCE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0> or
//!  - the MIT license [LICENSE-MIT](./LICENCE-MIT) or <http://opensource.org/licenses/MIT>, at your option.

#![warn(unused_variables)]
#![warn(dead_code)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![deny(clippy::missing_panics_doc)]

pub mod array;
pub mod group;
pub mod hierarchy;
pub mod metadata;
pub mod node;
pub mod storage;
