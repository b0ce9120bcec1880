use thiserror::Error;

use crate::storage::StorageError;

use super::{
    codec::{CodecError, CompressorCreateError, UnknownFilterError},
    data_type::{
        IncompatibleFillValueError, IncompatibleFillValueMetadataError, UnsupportedDataTypeError,
    },
    ArrayIndices, ArrayShape,
};

/// An array creation error, raised when building or opening an array.
#[derive(Debug, Error)]
pub enum ArrayCreateError {
    /// Missing metadata (no `.zarray`).
    #[error("array metadata is missing")]
    MissingMetadata,
    /// The metadata is malformed.
    #[error("array metadata is invalid: {0}")]
    InvalidMetadata(String),
    /// Unsupported data type.
    #[error(transparent)]
    UnsupportedDataTypeError(#[from] UnsupportedDataTypeError),
    /// Error creating the compressor.
    #[error(transparent)]
    CompressorCreateError(#[from] CompressorCreateError),
    /// Unknown filter.
    #[error(transparent)]
    UnknownFilterError(#[from] UnknownFilterError),
    /// Invalid fill value metadata.
    #[error(transparent)]
    IncompatibleFillValueMetadata(#[from] IncompatibleFillValueMetadataError),
    /// Invalid fill value.
    #[error(transparent)]
    IncompatibleFillValue(#[from] IncompatibleFillValueError),
    /// The chunk shape does not match the array shape.
    #[error("chunk shape {chunk_shape:?} is incompatible with array shape {array_shape:?}")]
    InvalidChunkShape {
        /// The array shape.
        array_shape: ArrayShape,
        /// The offending chunk shape.
        chunk_shape: Vec<u64>,
    },
    /// An unexpected number of elements.
    #[error("got {got} elements, expected {expected}")]
    InvalidElementCount {
        /// The number of elements supplied.
        got: u64,
        /// The number of elements expected.
        expected: u64,
    },
    /// The element type does not match the data type.
    #[error("element type is incompatible with data type {0}")]
    IncompatibleElementType(String),
    /// A chunk failed to decode.
    #[error("chunk {key} is corrupt: {source}")]
    ChunkCorrupt {
        /// The chunk key.
        key: String,
        /// The decoding failure.
        source: CodecError,
    },
    /// A storage error.
    #[error(transparent)]
    StorageError(#[from] StorageError),
}

/// An array operation error.
#[derive(Debug, Error)]
pub enum ArrayError {
    /// An index is outside the array.
    #[error("index {index:?} is out of bounds for array shape {shape:?}")]
    IndexOutOfBounds {
        /// The offending index.
        index: ArrayIndices,
        /// The array shape.
        shape: ArrayShape,
    },
    /// The element type does not match the data type.
    #[error("element type is incompatible with data type {0}")]
    IncompatibleElementType(String),
    /// The fill value cannot be represented in metadata.
    #[error(transparent)]
    IncompatibleFillValue(#[from] IncompatibleFillValueError),
    /// A codec error.
    #[error(transparent)]
    CodecError(#[from] CodecError),
    /// A storage error.
    #[error(transparent)]
    StorageError(#[from] StorageError),
    /// An error serialising metadata.
    #[error(transparent)]
    MetadataSerializationError(#[from] serde_json::Error),
}
