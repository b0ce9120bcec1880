use std::num::NonZeroU64;

use itertools::izip;

use crate::metadata::{ChunkKeySeparator, Order};

use super::{
    c_order_offset, chunk_grid_shape, chunk_subset, strides, unravel_index, Array,
    ArrayCreateError, ArrayShape, Chunk, ChunkShape, Compressor, DataType, Element, FillValue,
    FilterChain, IncompatibleFillValueError, Indices,
};

/// The chunk byte target used to derive a chunk shape when none is specified.
const TARGET_CHUNK_BYTES: u64 = 32 * 1024 * 1024;

/// An [`Array`] builder.
///
/// The builder is initialised from an array shape and data type, with default parameters:
///  - a chunk shape splitting the array along its first axis into chunks of at most 32 MiB,
///  - no compressor, no fill value, no attributes, and row-major (`C`) order.
///
/// ## Example
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use zarrs2::array::{ArrayBuilder, DataType, FillValue};
///
/// let array = ArrayBuilder::new(vec![5], DataType::from_typestr("|u1")?)
///     .chunk_shape(vec![2])
///     .fill_value(FillValue::from(0u8))
///     .build_from_elements::<u8>(&[10, 20, 30, 40, 50])?;
/// assert_eq!(array.chunk_grid_shape(), [3]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct ArrayBuilder {
    shape: ArrayShape,
    data_type: DataType,
    chunk_shape: Option<Vec<u64>>,
    compressor: Option<Compressor>,
    fill_value: Option<FillValue>,
    order: Order,
    dimension_separator: ChunkKeySeparator,
    attributes: serde_json::Map<String, serde_json::Value>,
}

impl ArrayBuilder {
    /// Create a new array builder for an array of `shape` and `data_type`.
    #[must_use]
    pub fn new(shape: ArrayShape, data_type: DataType) -> Self {
        Self {
            shape,
            data_type,
            chunk_shape: None,
            compressor: None,
            fill_value: None,
            order: Order::C,
            dimension_separator: ChunkKeySeparator::Dot,
            attributes: serde_json::Map::default(),
        }
    }

    /// Set the chunk shape.
    #[must_use]
    pub fn chunk_shape(mut self, chunk_shape: Vec<u64>) -> Self {
        self.chunk_shape = Some(chunk_shape);
        self
    }

    /// Set the compressor.
    #[must_use]
    pub fn compressor(mut self, compressor: Compressor) -> Self {
        self.compressor = Some(compressor);
        self
    }

    /// Set the fill value.
    #[must_use]
    pub fn fill_value(mut self, fill_value: FillValue) -> Self {
        self.fill_value = Some(fill_value);
        self
    }

    /// Set the traversal order of chunk payloads.
    #[must_use]
    pub fn order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    /// Set the chunk key dimension separator.
    #[must_use]
    pub fn dimension_separator(mut self, separator: ChunkKeySeparator) -> Self {
        self.dimension_separator = separator;
        self
    }

    /// Set the user attributes.
    #[must_use]
    pub fn attributes(mut self, attributes: serde_json::Map<String, serde_json::Value>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Build an array from typed elements in row-major order.
    ///
    /// # Errors
    /// Returns an [`ArrayCreateError`] if `T` is not the in-memory representation of the data type,
    /// the element count does not match the shape, or any builder parameter is invalid.
    pub fn build_from_elements<T: Element>(
        &self,
        elements: &[T],
    ) -> Result<Array, ArrayCreateError> {
        if !T::is_compatible(&self.data_type) {
            return Err(ArrayCreateError::IncompatibleElementType(
                self.data_type.name(),
            ));
        }
        let num_elements = self.shape.iter().product::<u64>();
        if elements.len() as u64 != num_elements {
            return Err(ArrayCreateError::InvalidElementCount {
                got: elements.len() as u64,
                expected: num_elements,
            });
        }
        let mut bytes = Vec::with_capacity(elements.len() * self.data_type.size());
        for element in elements {
            element.to_ne_bytes(&mut bytes);
        }
        self.build_from_bytes(&bytes)
    }

    /// Build an array from packed element bytes in the native in-memory layout, row-major order.
    ///
    /// # Errors
    /// Returns an [`ArrayCreateError`] if the byte count does not match the shape or any builder parameter is invalid.
    pub fn build_from_bytes(&self, bytes: &[u8]) -> Result<Array, ArrayCreateError> {
        let element_size = self.data_type.size();
        let chunk_shape = self.validated_chunk_shape(element_size)?;

        if let Some(fill_value) = &self.fill_value {
            if fill_value.size() != element_size {
                return Err(IncompatibleFillValueError::new(
                    self.data_type.name(),
                    fill_value.clone(),
                )
                .into());
            }
        }

        let num_elements = self.shape.iter().product::<u64>();
        if bytes.len() as u64 != num_elements * element_size as u64 {
            return Err(ArrayCreateError::InvalidElementCount {
                got: bytes.len() as u64 / element_size.max(1) as u64,
                expected: num_elements,
            });
        }

        let grid_shape = chunk_grid_shape(&self.shape, &chunk_shape);
        let grid_strides = strides(&grid_shape);
        let num_chunks = grid_shape.iter().product::<u64>();
        let mut chunks = Vec::with_capacity(usize::try_from(num_chunks).unwrap_or(0));
        for chunk_index in 0..num_chunks {
            let chunk_indices = unravel_index(chunk_index, &grid_strides);
            let (start, valid_shape) = chunk_subset(&chunk_indices, &self.shape, &chunk_shape);
            let valid_elements =
                usize::try_from(valid_shape.iter().product::<u64>()).unwrap_or(0);
            let mut chunk_bytes = Vec::with_capacity(valid_elements * element_size);
            for local in Indices::new(valid_shape.clone(), Order::C).iter() {
                let global: Vec<u64> = izip!(&start, &local).map(|(s, l)| s + l).collect();
                let offset =
                    usize::try_from(c_order_offset(&global, &self.shape)).unwrap_or(usize::MAX)
                        * element_size;
                chunk_bytes.extend_from_slice(&bytes[offset..offset + element_size]);
            }
            chunks.push(Chunk::new(valid_shape, element_size, chunk_bytes));
        }

        Ok(Array {
            shape: self.shape.clone(),
            chunk_shape,
            data_type: self.data_type.clone(),
            fill_value: self.fill_value.clone(),
            order: self.order,
            compressor: self.compressor.clone(),
            filters: FilterChain::default(),
            dimension_separator: self.dimension_separator,
            attributes: self.attributes.clone(),
            chunks,
        })
    }

    fn validated_chunk_shape(&self, element_size: usize) -> Result<ChunkShape, ArrayCreateError> {
        let chunk_shape = self.chunk_shape.clone().unwrap_or_else(|| {
            default_chunk_shape(&self.shape, element_size as u64)
        });
        let err = || ArrayCreateError::InvalidChunkShape {
            array_shape: self.shape.clone(),
            chunk_shape: chunk_shape.clone(),
        };
        if chunk_shape.len() != self.shape.len() {
            return Err(err());
        }
        chunk_shape
            .iter()
            .map(|extent| NonZeroU64::new(*extent).ok_or_else(&err))
            .collect()
    }
}

/// Derive a chunk shape splitting an array along its first axis into chunks of at most
/// [`TARGET_CHUNK_BYTES`] (but at least one row).
fn default_chunk_shape(shape: &[u64], element_size: u64) -> Vec<u64> {
    let Some((rows, rest)) = shape.split_first() else {
        return vec![];
    };
    let row_elements = rest.iter().product::<u64>().max(1);
    let row_bytes = row_elements * element_size.max(1);
    let rows_per_chunk = (TARGET_CHUNK_BYTES / row_bytes).max(1);
    let mut chunk_shape = Vec::with_capacity(shape.len());
    chunk_shape.push(rows_per_chunk.min(*rows).max(1));
    chunk_shape.extend(rest.iter().map(|extent| (*extent).max(1)));
    chunk_shape
}
