//! Zarr V2 arrays.
//!
//! An array is a logical N-dimensional grid of elements split into a regular grid of chunks,
//! each stored as one independently compressed value in a [store](crate::storage).
//! In memory an [`Array`] holds its metadata, its user attributes, and every chunk of the grid;
//! arrays are immutable once built.
//!
//! Use [`ArrayBuilder`] to build a new array from elements, or [`Array::open`] to read an existing array.
//!
//! ## On-disk layout
//! ```text
//! <array>/
//!   .zarray         JSON: metadata
//!   .zattrs         JSON: free-form attributes (optional)
//!   <i0>.<i1>...    one value per chunk, compressed payload
//! ```
//!
//! A chunk payload is the elements of the full (unclipped) chunk traversed in the array
//! [`Order`], each encoded by the array [`DataType`], then passed through the filter pipeline
//! and the compressor. The final chunk along a dimension that the chunk shape does not evenly
//! divide is padded with the fill value (zeroes when there is no fill value).
//! A missing chunk value is not an error on read: it decodes to a chunk of fill values.

mod array_builder;
mod array_errors;
mod chunk;
pub mod chunk_grid;
pub mod codec;
pub mod data_type;
mod element;
mod endianness;
mod fill_value;

use std::num::NonZeroU64;

use itertools::izip;

use crate::{
    metadata::{ArrayMetadata, FillValueMetadata},
    node::NodePath,
    storage::{
        data_key, meta_key_array, meta_key_attributes, ReadableStorageTraits,
        WritableStorageTraits,
    },
};

pub use crate::metadata::{ChunkKeySeparator, Order};

pub use array_builder::ArrayBuilder;
pub use array_errors::{ArrayCreateError, ArrayError};
pub use chunk::Chunk;
pub use chunk_grid::{
    c_order_offset, chunk_grid_shape, chunk_key, chunk_subset, ravel_index, strides,
    unravel_index, Indices, IndicesIterator,
};
pub use codec::{CodecError, Compressor, FilterChain};
pub use data_type::{
    DataType, DataTypeKind, IncompatibleFillValueError, IncompatibleFillValueMetadataError,
    StructuredField, UnsupportedDataTypeError,
};
pub use element::Element;
pub use endianness::Endianness;
pub use fill_value::FillValue;

/// The shape of an array: the length of each dimension.
pub type ArrayShape = Vec<u64>;

/// The shape of a chunk: the (non-zero) length of each dimension.
pub type ChunkShape = Vec<NonZeroU64>;

/// An N-dimensional index into an array or chunk grid.
pub type ArrayIndices = Vec<u64>;

/// A Zarr V2 array: metadata, user attributes, and a grid of chunks.
#[derive(Debug)]
pub struct Array {
    pub(crate) shape: ArrayShape,
    pub(crate) chunk_shape: ChunkShape,
    pub(crate) data_type: DataType,
    pub(crate) fill_value: Option<FillValue>,
    pub(crate) order: Order,
    pub(crate) compressor: Option<Compressor>,
    pub(crate) filters: FilterChain,
    pub(crate) dimension_separator: ChunkKeySeparator,
    pub(crate) attributes: serde_json::Map<String, serde_json::Value>,
    /// Chunks in chunk-major linear order.
    pub(crate) chunks: Vec<Chunk>,
}

impl Array {
    /// Open an array in `storage` at `path`.
    ///
    /// The metadata, attributes, and every chunk are read from the store.
    /// A missing chunk materialises as a chunk of fill values.
    ///
    /// # Errors
    /// Returns an [`ArrayCreateError`] if the metadata is missing or invalid,
    /// a chunk fails to decode, or there is an underlying store error.
    pub fn open<TStorage: ?Sized + ReadableStorageTraits>(
        storage: &TStorage,
        path: &NodePath,
    ) -> Result<Self, ArrayCreateError> {
        let metadata = storage
            .get(&meta_key_array(path))?
            .ok_or(ArrayCreateError::MissingMetadata)?;
        let metadata: ArrayMetadata = serde_json::from_slice(&metadata)
            .map_err(|err| ArrayCreateError::InvalidMetadata(err.to_string()))?;

        let attributes = match storage.get(&meta_key_attributes(path))? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map_err(|err| ArrayCreateError::InvalidMetadata(err.to_string()))?,
            None => serde_json::Map::default(),
        };

        Self::open_with_metadata(storage, path, &metadata, attributes)
    }

    fn open_with_metadata<TStorage: ?Sized + ReadableStorageTraits>(
        storage: &TStorage,
        path: &NodePath,
        metadata: &ArrayMetadata,
        attributes: serde_json::Map<String, serde_json::Value>,
    ) -> Result<Self, ArrayCreateError> {
        if metadata.shape.len() != metadata.chunks.len() {
            return Err(ArrayCreateError::InvalidMetadata(format!(
                "shape rank {} does not match chunks rank {}",
                metadata.shape.len(),
                metadata.chunks.len()
            )));
        }

        let data_type = DataType::from_metadata(&metadata.dtype)?;
        let fill_value = data_type.fill_value_from_metadata(&metadata.fill_value)?;
        let compressor = metadata
            .compressor
            .as_ref()
            .map(Compressor::from_metadata)
            .transpose()?;
        let filters = FilterChain::from_metadata(metadata.filters.as_deref())?;
        let element_size = data_type.size();

        let grid_shape = chunk_grid_shape(&metadata.shape, &metadata.chunks);
        let grid_strides = strides(&grid_shape);
        let num_chunks = grid_shape.iter().product::<u64>();
        let mut chunks = Vec::with_capacity(usize::try_from(num_chunks).unwrap_or(0));
        for chunk_index in 0..num_chunks {
            let chunk_indices = unravel_index(chunk_index, &grid_strides);
            let key = data_key(
                path,
                &chunk_key(&chunk_indices, metadata.dimension_separator),
            );
            let (_start, valid_shape) =
                chunk_subset(&chunk_indices, &metadata.shape, &metadata.chunks);
            let chunk = match storage.get(&key)? {
                Some(bytes) => decode_chunk(
                    bytes,
                    &data_type,
                    metadata.order,
                    compressor.as_ref(),
                    &filters,
                    &metadata.chunks,
                    valid_shape,
                )
                .map_err(|source| ArrayCreateError::ChunkCorrupt {
                    key: key.to_string(),
                    source,
                })?,
                // a missing chunk means "all fill value"
                None => Chunk::filled(valid_shape, element_size, fill_value.as_ref()),
            };
            chunks.push(chunk);
        }

        Ok(Self {
            shape: metadata.shape.clone(),
            chunk_shape: metadata.chunks.clone(),
            data_type,
            fill_value,
            order: metadata.order,
            compressor,
            filters,
            dimension_separator: metadata.dimension_separator,
            attributes,
            chunks,
        })
    }

    /// Store the array in `storage` at `path`.
    ///
    /// Writes `<path>/.zarray`, then `<path>/.zattrs` when attributes are present,
    /// then one value per chunk in chunk-major linear order.
    /// The first failure aborts the save; partially written output is possible.
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if a chunk fails to encode or there is an underlying store error.
    pub fn store<TStorage: ?Sized + WritableStorageTraits>(
        &self,
        storage: &TStorage,
        path: &NodePath,
    ) -> Result<(), ArrayError> {
        let metadata = self.metadata()?;
        storage.set(&meta_key_array(path), &serde_json::to_vec_pretty(&metadata)?)?;
        if !self.attributes.is_empty() {
            storage.set(
                &meta_key_attributes(path),
                &serde_json::to_vec_pretty(&self.attributes)?,
            )?;
        }

        for (chunk_indices, chunk) in self.chunks() {
            let key = data_key(path, &chunk_key(&chunk_indices, self.dimension_separator));
            let payload = encode_chunk(
                chunk,
                &self.data_type,
                self.order,
                self.compressor.as_ref(),
                &self.filters,
                &self.chunk_shape,
                self.fill_value.as_ref(),
            )?;
            storage.set(&key, &payload)?;
        }
        Ok(())
    }

    /// The shape of the array.
    #[must_use]
    pub fn shape(&self) -> &[u64] {
        &self.shape
    }

    /// The chunk shape of the array.
    #[must_use]
    pub fn chunk_shape(&self) -> &[NonZeroU64] {
        &self.chunk_shape
    }

    /// The data type of the array.
    #[must_use]
    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    /// The fill value of the array, if any.
    #[must_use]
    pub fn fill_value(&self) -> Option<&FillValue> {
        self.fill_value.as_ref()
    }

    /// The traversal order of chunk payloads.
    #[must_use]
    pub fn order(&self) -> Order {
        self.order
    }

    /// The compressor of the array, if any.
    #[must_use]
    pub fn compressor(&self) -> Option<&Compressor> {
        self.compressor.as_ref()
    }

    /// The user attributes of the array.
    #[must_use]
    pub fn attributes(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.attributes
    }

    /// The number of elements of the array.
    #[must_use]
    pub fn num_elements(&self) -> u64 {
        self.shape.iter().product()
    }

    /// The shape of the chunk grid: `⌈shape[i] / chunk_shape[i]⌉` per dimension.
    #[must_use]
    pub fn chunk_grid_shape(&self) -> ArrayShape {
        chunk_grid_shape(&self.shape, &self.chunk_shape)
    }

    /// Iterate over the chunks of the array with their grid coordinates, in chunk-major linear order.
    pub fn chunks(&self) -> impl Iterator<Item = (ArrayIndices, &Chunk)> + '_ {
        let grid_strides = strides(&self.chunk_grid_shape());
        self.chunks
            .iter()
            .enumerate()
            .map(move |(index, chunk)| (unravel_index(index as u64, &grid_strides), chunk))
    }

    /// The chunk with grid coordinates `chunk_indices`, or [`None`] if out of bounds.
    #[must_use]
    pub fn chunk(&self, chunk_indices: &[u64]) -> Option<&Chunk> {
        let grid_shape = self.chunk_grid_shape();
        let in_bounds = chunk_indices.len() == grid_shape.len()
            && izip!(chunk_indices, &grid_shape).all(|(index, size)| index < size);
        in_bounds.then(|| {
            let linear = ravel_index(chunk_indices, &strides(&grid_shape));
            &self.chunks[usize::try_from(linear).unwrap_or(usize::MAX)]
        })
    }

    /// The native bytes of the element at `indices`.
    ///
    /// # Errors
    /// Returns [`ArrayError::IndexOutOfBounds`] if `indices` is outside the array.
    pub fn element_bytes(&self, indices: &[u64]) -> Result<&[u8], ArrayError> {
        let out_of_bounds = indices.len() != self.shape.len()
            || izip!(indices, &self.shape).any(|(index, size)| index >= size);
        if out_of_bounds {
            return Err(ArrayError::IndexOutOfBounds {
                index: indices.to_vec(),
                shape: self.shape.clone(),
            });
        }
        let chunk_indices: ArrayIndices = izip!(indices, &self.chunk_shape)
            .map(|(index, chunk)| index / chunk.get())
            .collect();
        let offsets: ArrayIndices = izip!(indices, &self.chunk_shape)
            .map(|(index, chunk)| index % chunk.get())
            .collect();
        let linear = ravel_index(&chunk_indices, &strides(&self.chunk_grid_shape()));
        let chunk = &self.chunks[usize::try_from(linear).unwrap_or(usize::MAX)];
        Ok(chunk.element(c_order_offset(&offsets, chunk.shape())))
    }

    /// The element at `indices`.
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if `T` is not the in-memory representation of the data type
    /// or `indices` is outside the array.
    pub fn get<T: Element>(&self, indices: &[u64]) -> Result<T, ArrayError> {
        self.check_element_type::<T>()?;
        Ok(T::from_ne_bytes(self.element_bytes(indices)?))
    }

    /// Every element of the array in row-major order.
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if `T` is not the in-memory representation of the data type.
    pub fn elements<T: Element>(&self) -> Result<Vec<T>, ArrayError> {
        self.check_element_type::<T>()?;
        let element_size = self.data_type.size();
        let num_elements = usize::try_from(self.num_elements()).unwrap_or(0);
        let mut bytes = vec![0u8; num_elements * element_size];
        for (chunk_indices, chunk) in self.chunks() {
            let (start, _valid_shape) =
                chunk_subset(&chunk_indices, &self.shape, &self.chunk_shape);
            for (index, local) in Indices::new(chunk.shape().to_vec(), Order::C)
                .iter()
                .enumerate()
            {
                let global: ArrayIndices = izip!(&start, &local).map(|(s, l)| s + l).collect();
                let offset = usize::try_from(c_order_offset(&global, &self.shape))
                    .unwrap_or(usize::MAX)
                    * element_size;
                bytes[offset..offset + element_size]
                    .copy_from_slice(chunk.element(index as u64));
            }
        }
        Ok(bytes.chunks_exact(element_size).map(T::from_ne_bytes).collect())
    }

    /// Fold every element of the array from the left in canonical order
    /// (chunk-major, then row-major within each chunk).
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if `T` is not the in-memory representation of the data type.
    pub fn fold_left<T: Element, B, F: FnMut(B, T) -> B>(
        &self,
        init: B,
        mut f: F,
    ) -> Result<B, ArrayError> {
        self.check_element_type::<T>()?;
        Ok(self.chunks.iter().fold(init, |acc, chunk| {
            chunk.fold_left(acc, |acc, element| f(acc, T::from_ne_bytes(element)))
        }))
    }

    /// Fold every element of the array from the right in canonical order
    /// (chunk-major, then row-major within each chunk).
    ///
    /// # Errors
    /// Returns an [`ArrayError`] if `T` is not the in-memory representation of the data type.
    pub fn fold_right<T: Element, B, F: FnMut(T, B) -> B>(
        &self,
        init: B,
        mut f: F,
    ) -> Result<B, ArrayError> {
        self.check_element_type::<T>()?;
        Ok(self.chunks.iter().rev().fold(init, |acc, chunk| {
            chunk.fold_right(acc, |element, acc| f(T::from_ne_bytes(element), acc))
        }))
    }

    /// Convert the in-memory state of the array to [`ArrayMetadata`].
    ///
    /// # Errors
    /// Returns an [`IncompatibleFillValueError`] if the fill value cannot be represented in metadata.
    pub fn metadata(&self) -> Result<ArrayMetadata, IncompatibleFillValueError> {
        let fill_value = match &self.fill_value {
            Some(fill_value) => self.data_type.metadata_fill_value(fill_value)?,
            None => FillValueMetadata::Null,
        };
        Ok(ArrayMetadata {
            zarr_format: monostate::MustBe!(2u64),
            shape: self.shape.clone(),
            chunks: self.chunk_shape.clone(),
            dtype: self.data_type.to_metadata(),
            compressor: self.compressor.as_ref().map(Compressor::to_metadata),
            fill_value,
            order: self.order,
            filters: self.filters.to_metadata(),
            dimension_separator: self.dimension_separator,
        })
    }

    fn check_element_type<T: Element>(&self) -> Result<(), ArrayError> {
        if T::is_compatible(&self.data_type) {
            Ok(())
        } else {
            Err(ArrayError::IncompatibleElementType(self.data_type.name()))
        }
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape
            && self.chunk_shape == other.chunk_shape
            && self.data_type == other.data_type
            && self.fill_value == other.fill_value
            && self.order == other.order
            && self.compressor == other.compressor
            && self.dimension_separator == other.dimension_separator
            && self.attributes == other.attributes
            && self.chunks == other.chunks
    }
}

impl core::fmt::Display for Array {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "array of shape {:?} with data type {}",
            self.shape, self.data_type
        )
    }
}

/// Encode one chunk into its on-disk payload.
///
/// The full chunk is traversed in `order`; positions outside the chunk's valid region are
/// padded with `fill_value` (zeroes when [`None`]).
fn encode_chunk(
    chunk: &Chunk,
    data_type: &DataType,
    order: Order,
    compressor: Option<&Compressor>,
    filters: &FilterChain,
    chunk_shape: &[NonZeroU64],
    fill_value: Option<&FillValue>,
) -> Result<Vec<u8>, CodecError> {
    let element_size = data_type.size();
    let full_shape: ArrayShape = chunk_shape.iter().map(|extent| extent.get()).collect();
    let num_elements = usize::try_from(full_shape.iter().product::<u64>()).unwrap_or(0);

    let zeroes = vec![0u8; element_size];
    let fill_bytes = fill_value.map_or(zeroes.as_slice(), FillValue::as_ne_bytes);

    let mut bytes = Vec::with_capacity(num_elements * element_size);
    for local in Indices::new(full_shape, order).iter() {
        let element = chunk.element_at(&local).unwrap_or(fill_bytes);
        data_type.encode_element(element, &mut bytes);
    }

    let bytes = filters.encode(bytes)?;
    match compressor {
        Some(compressor) => compressor.encode(bytes, element_size),
        None => Ok(bytes),
    }
}

/// Decode one chunk payload into its in-memory valid region.
fn decode_chunk(
    bytes: Vec<u8>,
    data_type: &DataType,
    order: Order,
    compressor: Option<&Compressor>,
    filters: &FilterChain,
    chunk_shape: &[NonZeroU64],
    valid_shape: ArrayShape,
) -> Result<Chunk, CodecError> {
    let element_size = data_type.size();
    let full_shape: ArrayShape = chunk_shape.iter().map(|extent| extent.get()).collect();
    let num_elements = usize::try_from(full_shape.iter().product::<u64>()).unwrap_or(0);
    let expected_len = num_elements * element_size;

    let bytes = match compressor {
        Some(compressor) => compressor.decode(bytes, expected_len)?,
        None => bytes,
    };
    let bytes = filters.decode(bytes)?;
    if bytes.len() != expected_len {
        return Err(CodecError::UnexpectedDecodedLength {
            got: bytes.len(),
            expected: expected_len,
        });
    }

    let valid_elements = usize::try_from(valid_shape.iter().product::<u64>()).unwrap_or(0);
    let mut chunk_bytes = vec![0u8; valid_elements * element_size];
    let mut scratch = Vec::with_capacity(element_size);
    for (index, local) in Indices::new(full_shape, order).iter().enumerate() {
        let inside = izip!(&local, &valid_shape).all(|(index, size)| index < size);
        if inside {
            scratch.clear();
            data_type.decode_element(
                &bytes[index * element_size..(index + 1) * element_size],
                &mut scratch,
            );
            let offset = usize::try_from(c_order_offset(&local, &valid_shape))
                .unwrap_or(usize::MAX)
                * element_size;
            chunk_bytes[offset..offset + element_size].copy_from_slice(&scratch);
        }
    }
    Ok(Chunk::new(valid_shape, element_size, chunk_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_matrix() -> Array {
        let mut elements = vec![0.0f64; 16];
        for i in 0..4 {
            elements[i * 4 + i] = 1.0;
        }
        ArrayBuilder::new(vec![4, 4], DataType::from_typestr("<f8").unwrap())
            .chunk_shape(vec![2, 2])
            .fill_value(FillValue::from(0.0f64))
            .build_from_elements::<f64>(&elements)
            .unwrap()
    }

    #[test]
    fn array_get() {
        let array = identity_matrix();
        assert_eq!(array.get::<f64>(&[0, 0]).unwrap(), 1.0);
        assert_eq!(array.get::<f64>(&[0, 1]).unwrap(), 0.0);
        assert_eq!(array.get::<f64>(&[3, 3]).unwrap(), 1.0);
        assert!(matches!(
            array.get::<f64>(&[4, 0]),
            Err(ArrayError::IndexOutOfBounds { .. })
        ));
        assert!(matches!(
            array.get::<f64>(&[0]),
            Err(ArrayError::IndexOutOfBounds { .. })
        ));
        assert!(matches!(
            array.get::<f32>(&[0, 0]),
            Err(ArrayError::IncompatibleElementType(_))
        ));
    }

    #[test]
    fn array_elements_row_major() {
        let array = ArrayBuilder::new(vec![2, 3], DataType::from_typestr("<i4").unwrap())
            .chunk_shape(vec![2, 2])
            .build_from_elements::<i32>(&[1, 2, 3, 4, 5, 6])
            .unwrap();
        assert_eq!(array.elements::<i32>().unwrap(), [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn array_folds() {
        let array = ArrayBuilder::new(vec![6], DataType::from_typestr("<i4").unwrap())
            .chunk_shape(vec![3])
            .build_from_elements::<i32>(&[1, 2, 3, 4, 5, 6])
            .unwrap();
        let sum = array.fold_left(0i64, |acc, v: i32| acc + i64::from(v)).unwrap();
        assert_eq!(sum, 21);
        let collected = array
            .fold_right(vec![], |v: i32, mut acc| {
                acc.push(v);
                acc
            })
            .unwrap();
        assert_eq!(collected, [6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn array_chunk_enumeration() {
        let array = identity_matrix();
        assert_eq!(array.chunk_grid_shape(), [2, 2]);
        let indices: Vec<_> = array.chunks().map(|(indices, _)| indices).collect();
        assert_eq!(
            indices,
            [vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]]
        );
        assert!(array.chunk(&[1, 1]).is_some());
        assert!(array.chunk(&[2, 0]).is_none());
    }

    #[test]
    fn array_rank_zero() {
        let array = ArrayBuilder::new(vec![], DataType::from_typestr("<f4").unwrap())
            .build_from_elements::<f32>(&[7.0])
            .unwrap();
        assert_eq!(array.num_elements(), 1);
        assert_eq!(array.chunk_grid_shape(), Vec::<u64>::new());
        assert_eq!(array.get::<f32>(&[]).unwrap(), 7.0);
    }

    #[test]
    fn array_metadata_round_trip() {
        let array = identity_matrix();
        let metadata = array.metadata().unwrap();
        let json = serde_json::to_string(&metadata).unwrap();
        let metadata2: ArrayMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(metadata, metadata2);
    }

    #[test]
    fn chunk_payload_padding_uses_fill_value() {
        // 5 elements in chunks of 2: the final payload is padded with the fill value
        let array = ArrayBuilder::new(vec![5], DataType::from_typestr("|u1").unwrap())
            .chunk_shape(vec![2])
            .fill_value(FillValue::from(9u8))
            .build_from_elements::<u8>(&[10, 20, 30, 40, 50])
            .unwrap();
        let chunk = array.chunk(&[2]).unwrap();
        let payload = encode_chunk(
            chunk,
            array.data_type(),
            array.order(),
            None,
            &FilterChain::default(),
            array.chunk_shape(),
            array.fill_value(),
        )
        .unwrap();
        assert_eq!(payload, [50, 9]);
    }

    #[test]
    fn chunk_payload_order_f() {
        let array = ArrayBuilder::new(vec![2, 2], DataType::from_typestr("|u1").unwrap())
            .chunk_shape(vec![2, 2])
            .order(Order::F)
            .build_from_elements::<u8>(&[1, 2, 3, 4])
            .unwrap();
        let chunk = array.chunk(&[0, 0]).unwrap();
        let payload = encode_chunk(
            chunk,
            array.data_type(),
            array.order(),
            None,
            &FilterChain::default(),
            array.chunk_shape(),
            array.fill_value(),
        )
        .unwrap();
        // column-major: first axis varies fastest
        assert_eq!(payload, [1, 3, 2, 4]);
    }

    #[test]
    fn chunk_payload_round_trip_big_endian() {
        let data_type = DataType::from_typestr(">i2").unwrap();
        let array = ArrayBuilder::new(vec![2], data_type.clone())
            .chunk_shape(vec![2])
            .build_from_elements::<i16>(&[0x0102, 0x0304])
            .unwrap();
        let chunk = array.chunk(&[0]).unwrap();
        let payload = encode_chunk(
            chunk,
            &data_type,
            Order::C,
            None,
            &FilterChain::default(),
            array.chunk_shape(),
            None,
        )
        .unwrap();
        assert_eq!(payload, [0x01, 0x02, 0x03, 0x04]);

        let decoded = decode_chunk(
            payload,
            &data_type,
            Order::C,
            None,
            &FilterChain::default(),
            array.chunk_shape(),
            vec![2],
        )
        .unwrap();
        assert_eq!(&decoded, chunk);
    }
}
