//! The numcodecs `zlib` compressor.

use std::io::{Cursor, Read};

use flate2::bufread::{ZlibDecoder, ZlibEncoder};
use serde::{Deserialize, Serialize};

use super::CodecError;

/// The `zlib` codec identifier.
pub const IDENTIFIER: &str = "zlib";

/// Configuration parameters for the `zlib` codec (numcodecs).
#[derive(Serialize, Deserialize, Clone, Eq, PartialEq, Debug)]
#[serde(deny_unknown_fields)]
pub struct ZlibCodecConfiguration {
    /// The compression level.
    pub level: ZlibCompressionLevel,
}

impl ZlibCodecConfiguration {
    /// Create a new `zlib` codec configuration.
    #[must_use]
    pub fn new(level: ZlibCompressionLevel) -> Self {
        Self { level }
    }
}

/// An integer from 0 to 9 controlling the `zlib` compression level.
///
/// A level of 1 is the fastest and produces the least compression, while 9 is the slowest and
/// produces the most. Compression is turned off when the level is 0.
#[derive(Serialize, Copy, Clone, Debug, Eq, PartialEq)]
pub struct ZlibCompressionLevel(u8);

impl ZlibCompressionLevel {
    /// The compression level as a [`u32`].
    #[must_use]
    pub fn as_u32(self) -> u32 {
        u32::from(self.0)
    }
}

impl TryFrom<u8> for ZlibCompressionLevel {
    type Error = u8;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        if level <= 9 {
            Ok(Self(level))
        } else {
            Err(level)
        }
    }
}

impl<'de> serde::Deserialize<'de> for ZlibCompressionLevel {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let level = u8::deserialize(d)?;
        if level <= 9 {
            Ok(Self(level))
        } else {
            Err(serde::de::Error::custom("level must be between 0 and 9"))
        }
    }
}

pub(crate) fn compress(
    bytes: &[u8],
    configuration: &ZlibCodecConfiguration,
) -> Result<Vec<u8>, CodecError> {
    let mut encoder = ZlibEncoder::new(
        Cursor::new(bytes),
        flate2::Compression::new(configuration.level.as_u32()),
    );
    let mut out: Vec<u8> = Vec::new();
    encoder.read_to_end(&mut out)?;
    Ok(out)
}

pub(crate) fn decompress(bytes: &[u8]) -> Result<Vec<u8>, CodecError> {
    let mut decoder = ZlibDecoder::new(Cursor::new(bytes));
    let mut out: Vec<u8> = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}
