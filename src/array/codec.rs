//! Chunk compressors and filters.
//!
//! A [`Compressor`] is a symmetric byte transform applied to a whole chunk payload:
//! [`encode`](Compressor::encode) on write and [`decode`](Compressor::decode) on read.
//! A `null` compressor in metadata means chunks are stored uncompressed.
//!
//! Filters form an ordered pipeline applied before the compressor on write and reversed on
//! read. No numcodecs filters are currently implemented, so decoding metadata that declares
//! one fails with [`UnknownFilterError`].

pub mod blosc;
pub mod zlib;

use thiserror::Error;

use crate::metadata::CodecMetadata;

pub use blosc::{
    BloscCodecConfiguration, BloscCompressionLevel, BloscCompressor, BloscShuffleMode,
};
pub use zlib::{ZlibCodecConfiguration, ZlibCompressionLevel};

/// A chunk compressor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Compressor {
    /// The numcodecs `blosc` compressor.
    Blosc(BloscCodecConfiguration),
    /// The numcodecs `zlib` compressor.
    Zlib(ZlibCodecConfiguration),
}

impl Compressor {
    /// Create a compressor from [`CodecMetadata`].
    ///
    /// # Errors
    /// Returns a [`CompressorCreateError`] if the codec `id` is unknown or its configuration is invalid.
    pub fn from_metadata(metadata: &CodecMetadata) -> Result<Self, CompressorCreateError> {
        let invalid_configuration = |err: serde_json::Error| {
            CompressorCreateError::InvalidConfiguration(metadata.id().to_string(), err.to_string())
        };
        match metadata.id() {
            blosc::IDENTIFIER => Ok(Self::Blosc(
                metadata.to_configuration().map_err(invalid_configuration)?,
            )),
            zlib::IDENTIFIER => Ok(Self::Zlib(
                metadata.to_configuration().map_err(invalid_configuration)?,
            )),
            id => Err(CompressorCreateError::Unknown(id.to_string())),
        }
    }

    /// Convert the compressor to [`CodecMetadata`].
    #[allow(clippy::missing_panics_doc)]
    #[must_use]
    pub fn to_metadata(&self) -> CodecMetadata {
        match self {
            Self::Blosc(configuration) => {
                CodecMetadata::new_with_serializable_configuration(blosc::IDENTIFIER, configuration)
                    .unwrap()
            }
            Self::Zlib(configuration) => {
                CodecMetadata::new_with_serializable_configuration(zlib::IDENTIFIER, configuration)
                    .unwrap()
            }
        }
    }

    /// Compress a chunk payload.
    ///
    /// `typesize` is the element size in bytes, used by `blosc` to configure its shuffle stride.
    ///
    /// # Errors
    /// Returns a [`CodecError`] if the underlying codec fails.
    pub fn encode(&self, bytes: Vec<u8>, typesize: usize) -> Result<Vec<u8>, CodecError> {
        match self {
            Self::Blosc(configuration) => blosc::compress(&bytes, configuration, typesize),
            Self::Zlib(configuration) => zlib::compress(&bytes, configuration),
        }
    }

    /// Decompress a chunk payload into exactly `decoded_len` bytes.
    ///
    /// # Errors
    /// Returns a [`CodecError`] if the underlying codec fails or the decompressed length is not `decoded_len`.
    pub fn decode(&self, bytes: Vec<u8>, decoded_len: usize) -> Result<Vec<u8>, CodecError> {
        let decoded = match self {
            Self::Blosc(_) => blosc::decompress(&bytes, decoded_len)?,
            Self::Zlib(_) => zlib::decompress(&bytes)?,
        };
        if decoded.len() == decoded_len {
            Ok(decoded)
        } else {
            Err(CodecError::UnexpectedDecodedLength {
                got: decoded.len(),
                expected: decoded_len,
            })
        }
    }
}

/// A compressor creation error.
#[derive(Debug, Error)]
pub enum CompressorCreateError {
    /// The codec `id` is not a known compressor.
    #[error("unknown compressor id {0}")]
    Unknown(String),
    /// The codec configuration is invalid.
    #[error("invalid {0} compressor configuration: {1}")]
    InvalidConfiguration(String, String),
}

/// A codec error.
#[derive(Debug, Error)]
pub enum CodecError {
    /// An IO error.
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    /// A `blosc` codec error.
    #[error("blosc error: {0}")]
    Blosc(String),
    /// An unexpected decoded payload length.
    #[error("decoded chunk has {got} bytes, expected {expected}")]
    UnexpectedDecodedLength {
        /// The decoded length.
        got: usize,
        /// The expected length.
        expected: usize,
    },
}

/// An unknown filter error.
#[derive(Debug, Error)]
#[error("unknown filter id {0}")]
pub struct UnknownFilterError(String);

/// Filter traits.
///
/// A filter is an invertible byte transform applied before compression on write
/// and after decompression, in reverse declaration order, on read.
pub trait FilterTraits: core::fmt::Debug + Send + Sync {
    /// Apply the filter.
    ///
    /// # Errors
    /// Returns a [`CodecError`] if the filter fails.
    fn encode(&self, bytes: Vec<u8>) -> Result<Vec<u8>, CodecError>;

    /// Invert the filter.
    ///
    /// # Errors
    /// Returns a [`CodecError`] if the filter fails.
    fn decode(&self, bytes: Vec<u8>) -> Result<Vec<u8>, CodecError>;

    /// Convert the filter to [`CodecMetadata`].
    fn to_metadata(&self) -> CodecMetadata;
}

/// Create a filter from [`CodecMetadata`].
///
/// # Errors
/// Returns an [`UnknownFilterError`] if the codec `id` is not a known filter.
/// No numcodecs filters (`delta`, `fixedscaleoffset`, ...) are currently implemented.
pub fn try_create_filter(
    metadata: &CodecMetadata,
) -> Result<Box<dyn FilterTraits>, UnknownFilterError> {
    Err(UnknownFilterError(metadata.id().to_string()))
}

/// An ordered pipeline of filters.
#[derive(Debug, Default)]
pub struct FilterChain(Vec<Box<dyn FilterTraits>>);

impl FilterChain {
    /// Create a filter chain from the `filters` member of array metadata.
    ///
    /// # Errors
    /// Returns an [`UnknownFilterError`] if any filter `id` is not known.
    pub fn from_metadata(metadata: Option<&[CodecMetadata]>) -> Result<Self, UnknownFilterError> {
        let filters = metadata
            .unwrap_or_default()
            .iter()
            .map(try_create_filter)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self(filters))
    }

    /// Returns true if the chain has no filters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Apply every filter in declaration order.
    ///
    /// # Errors
    /// Returns a [`CodecError`] if a filter fails.
    pub fn encode(&self, bytes: Vec<u8>) -> Result<Vec<u8>, CodecError> {
        self.0
            .iter()
            .try_fold(bytes, |bytes, filter| filter.encode(bytes))
    }

    /// Invert every filter in reverse declaration order.
    ///
    /// # Errors
    /// Returns a [`CodecError`] if a filter fails.
    pub fn decode(&self, bytes: Vec<u8>) -> Result<Vec<u8>, CodecError> {
        self.0
            .iter()
            .rev()
            .try_fold(bytes, |bytes, filter| filter.decode(bytes))
    }

    /// Convert the chain to the `filters` member of array metadata ([`None`] when empty).
    #[must_use]
    pub fn to_metadata(&self) -> Option<Vec<CodecMetadata>> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0.iter().map(|filter| filter.to_metadata()).collect())
        }
    }
}
