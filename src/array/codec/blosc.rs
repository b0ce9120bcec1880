//! The numcodecs `blosc` compressor.
//!
//! Chunk payloads are stored in the [blosc](https://www.blosc.org/) container format.

use std::ffi::{c_char, c_int, c_void};

use blosc_sys::{
    blosc_cbuffer_validate, blosc_compress_ctx, blosc_decompress_ctx, BLOSC_BITSHUFFLE,
    BLOSC_BLOSCLZ_COMPNAME, BLOSC_LZ4HC_COMPNAME, BLOSC_LZ4_COMPNAME, BLOSC_MAX_OVERHEAD,
    BLOSC_NOSHUFFLE, BLOSC_SHUFFLE, BLOSC_SNAPPY_COMPNAME, BLOSC_ZLIB_COMPNAME,
    BLOSC_ZSTD_COMPNAME,
};
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

use super::CodecError;

/// The `blosc` codec identifier.
pub const IDENTIFIER: &str = "blosc";

/// Configuration parameters for the `blosc` codec (numcodecs).
#[derive(Serialize, Deserialize, Clone, Eq, PartialEq, Debug)]
#[serde(deny_unknown_fields)]
pub struct BloscCodecConfiguration {
    /// The compressor.
    pub cname: BloscCompressor,
    /// The compression level.
    pub clevel: BloscCompressionLevel,
    /// The shuffle mode.
    #[serde(default)]
    pub shuffle: BloscShuffleMode,
    /// The compression block size. Automatically determined if 0.
    #[serde(default)]
    pub blocksize: usize,
}

/// The `blosc` compressor.
///
/// See <https://www.blosc.org/pages/>.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum BloscCompressor {
    /// [BloscLZ](https://github.com/Blosc/c-blosc/blob/master/blosc/blosclz.h): the blosc default compressor, heavily based on [FastLZ](http://fastlz.org/).
    BloscLZ,
    /// [LZ4](http://fastcompression.blogspot.com/p/lz4.html): a compact, very popular and fast compressor.
    LZ4,
    /// [LZ4HC](http://fastcompression.blogspot.com/p/lz4.html): a tweaked version of LZ4, produces better compression ratios at the expense of speed.
    LZ4HC,
    /// [Snappy](https://github.com/google/snappy): a popular compressor used in many places.
    Snappy,
    /// [Zlib](http://www.zlib.net/): a classic; somewhat slower than the previous ones, but achieving better compression ratios.
    Zlib,
    /// [Zstd](https://www.zstd.net/): an extremely well balanced codec.
    Zstd,
}

impl BloscCompressor {
    const fn as_cstr(self) -> *const u8 {
        match self {
            Self::BloscLZ => BLOSC_BLOSCLZ_COMPNAME.as_ptr(),
            Self::LZ4 => BLOSC_LZ4_COMPNAME.as_ptr(),
            Self::LZ4HC => BLOSC_LZ4HC_COMPNAME.as_ptr(),
            Self::Snappy => BLOSC_SNAPPY_COMPNAME.as_ptr(),
            Self::Zlib => BLOSC_ZLIB_COMPNAME.as_ptr(),
            Self::Zstd => BLOSC_ZSTD_COMPNAME.as_ptr(),
        }
    }
}

/// An integer from 0 to 9 controlling the `blosc` compression level.
///
/// A level of 1 is the fastest and produces the least compression, while 9 is the slowest and
/// produces the most. Compression is turned off when the level is 0.
#[derive(Serialize, Copy, Clone, Debug, Eq, PartialEq)]
pub struct BloscCompressionLevel(u8);

impl BloscCompressionLevel {
    /// The compression level as a [`u8`].
    #[must_use]
    pub fn as_u8(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for BloscCompressionLevel {
    type Error = u8;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        if level <= 9 {
            Ok(Self(level))
        } else {
            Err(level)
        }
    }
}

impl<'de> serde::Deserialize<'de> for BloscCompressionLevel {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let level = u8::deserialize(d)?;
        if level <= 9 {
            Ok(Self(level))
        } else {
            Err(serde::de::Error::custom("clevel must be between 0 and 9"))
        }
    }
}

/// The `blosc` shuffle mode (numcodecs).
#[derive(Serialize_repr, Deserialize_repr, Copy, Clone, Debug, Eq, PartialEq, Default)]
#[repr(i8)]
pub enum BloscShuffleMode {
    /// No shuffling.
    NoShuffle = 0,
    /// Byte-wise shuffling.
    #[default]
    Shuffle = 1,
    /// Bit-wise shuffling.
    BitShuffle = 2,
    /// Bit-wise shuffling for buffers with element size 1, byte-wise shuffling otherwise.
    AutoShuffle = -1,
}

impl BloscShuffleMode {
    /// Resolve the mode to a `blosc` `doshuffle` argument for elements of `typesize` bytes.
    fn resolve(self, typesize: usize) -> u32 {
        match self {
            Self::NoShuffle => BLOSC_NOSHUFFLE,
            Self::Shuffle => BLOSC_SHUFFLE,
            Self::BitShuffle => BLOSC_BITSHUFFLE,
            Self::AutoShuffle => {
                if typesize == 1 {
                    BLOSC_BITSHUFFLE
                } else {
                    BLOSC_SHUFFLE
                }
            }
        }
    }
}

pub(crate) fn compress(
    src: &[u8],
    configuration: &BloscCodecConfiguration,
    typesize: usize,
) -> Result<Vec<u8>, CodecError> {
    // blosc requires a non-zero typesize that divides the buffer length
    let typesize = if typesize > 0 && src.len() % typesize == 0 {
        typesize
    } else {
        1
    };
    let doshuffle = configuration.shuffle.resolve(typesize);

    let destsize = src.len() + BLOSC_MAX_OVERHEAD as usize;
    let mut dest: Vec<u8> = Vec::with_capacity(destsize);
    let destsize = unsafe {
        blosc_compress_ctx(
            c_int::from(configuration.clevel.0),
            doshuffle as c_int,
            typesize,
            src.len(),
            src.as_ptr().cast::<c_void>(),
            dest.as_mut_ptr().cast::<c_void>(),
            destsize,
            configuration.cname.as_cstr().cast::<c_char>(),
            configuration.blocksize,
            1,
        )
    };
    if destsize > 0 {
        unsafe {
            #[allow(clippy::cast_sign_loss)]
            dest.set_len(destsize as usize);
        }
        dest.shrink_to_fit();
        Ok(dest)
    } else {
        Err(CodecError::Blosc(format!(
            "blosc_compress_ctx(clevel: {}, doshuffle: {doshuffle}, typesize: {typesize}, nbytes: {}) -> {destsize} (failure)",
            configuration.clevel.0,
            src.len()
        )))
    }
}

fn validate(src: &[u8]) -> Option<usize> {
    let mut destsize: usize = 0;
    let valid = unsafe {
        blosc_cbuffer_validate(
            src.as_ptr().cast::<c_void>(),
            src.len(),
            std::ptr::addr_of_mut!(destsize),
        )
    } == 0;
    valid.then_some(destsize)
}

pub(crate) fn decompress(src: &[u8], destsize: usize) -> Result<Vec<u8>, CodecError> {
    let nbytes = validate(src)
        .ok_or_else(|| CodecError::Blosc("the compressed buffer is not valid".to_string()))?;
    if nbytes != destsize {
        return Err(CodecError::UnexpectedDecodedLength {
            got: nbytes,
            expected: destsize,
        });
    }

    let mut dest: Vec<u8> = Vec::with_capacity(destsize);
    let destsize = unsafe {
        blosc_decompress_ctx(
            src.as_ptr().cast::<c_void>(),
            dest.as_mut_ptr().cast::<c_void>(),
            destsize,
            1,
        )
    };
    if destsize >= 0 {
        unsafe {
            #[allow(clippy::cast_sign_loss)]
            dest.set_len(destsize as usize);
        }
        Ok(dest)
    } else {
        Err(CodecError::Blosc("blosc_decompress_ctx failed".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON_VALID: &str = r#"
{
    "cname": "lz4",
    "clevel": 5,
    "shuffle": 1,
    "blocksize": 0
}"#;

    #[test]
    fn codec_blosc_configuration() {
        let configuration: BloscCodecConfiguration = serde_json::from_str(JSON_VALID).unwrap();
        assert_eq!(configuration.cname, BloscCompressor::LZ4);
        assert_eq!(configuration.shuffle, BloscShuffleMode::Shuffle);
        assert_eq!(configuration.blocksize, 0);
    }

    #[test]
    fn codec_blosc_configuration_auto_shuffle() {
        let configuration: BloscCodecConfiguration =
            serde_json::from_str(r#"{"cname": "zstd", "clevel": 4, "shuffle": -1}"#).unwrap();
        assert_eq!(configuration.shuffle, BloscShuffleMode::AutoShuffle);
    }

    #[test]
    fn codec_blosc_invalid_level() {
        assert!(serde_json::from_str::<BloscCodecConfiguration>(
            r#"{"cname": "lz4", "clevel": 10, "shuffle": 1}"#
        )
        .is_err());
    }

    #[test]
    fn codec_blosc_round_trip() {
        let configuration: BloscCodecConfiguration = serde_json::from_str(JSON_VALID).unwrap();
        let elements: Vec<u16> = (0..32).collect();
        let mut bytes = Vec::new();
        for element in &elements {
            bytes.extend(element.to_ne_bytes());
        }

        let encoded = compress(&bytes, &configuration, std::mem::size_of::<u16>()).unwrap();
        let decoded = decompress(&encoded, bytes.len()).unwrap();
        assert_eq!(bytes, decoded);
    }

    #[test]
    fn codec_blosc_round_trip_bitshuffle() {
        let configuration: BloscCodecConfiguration =
            serde_json::from_str(r#"{"cname": "blosclz", "clevel": 9, "shuffle": 2}"#).unwrap();
        let bytes: Vec<u8> = (0..128).collect();
        let encoded = compress(&bytes, &configuration, 1).unwrap();
        let decoded = decompress(&encoded, bytes.len()).unwrap();
        assert_eq!(bytes, decoded);
    }

    #[test]
    fn codec_blosc_corrupt_buffer() {
        assert!(decompress(&[0, 1, 2, 3], 16).is_err());
    }
}
