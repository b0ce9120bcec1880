use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::array::{ArrayShape, ChunkShape};

use super::{CodecMetadata, FillValueMetadata};

/// Zarr V2 array metadata, the contents of a `.zarray` document.
///
/// An example `JSON` document for a Zarr V2 array:
/// ```json
/// {
///     "chunks": [
///         1000,
///         1000
///     ],
///     "compressor": {
///         "id": "blosc",
///         "cname": "lz4",
///         "clevel": 5,
///         "shuffle": 1
///     },
///     "dtype": "<f8",
///     "fill_value": "NaN",
///     "filters": null,
///     "order": "C",
///     "shape": [
///         10000,
///         10000
///     ],
///     "zarr_format": 2
/// }
/// ```
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Display)]
#[display("{}", serde_json::to_string(self).unwrap_or_default())]
pub struct ArrayMetadata {
    /// An integer defining the version of the storage specification to which the array adheres. Must be `2`.
    pub zarr_format: monostate::MustBe!(2u64),
    /// An array of integers providing the length of each dimension of the Zarr array.
    pub shape: ArrayShape,
    /// A list of integers defining the length of each dimension of a chunk of the array.
    pub chunks: ChunkShape,
    /// The data type of the Zarr array.
    pub dtype: DataTypeMetadata,
    /// A JSON object identifying the primary compression codec and providing configuration parameters, or null if no compressor is to be used.
    pub compressor: Option<CodecMetadata>,
    /// A scalar value providing the default value to use for uninitialized portions of the array, or null if no fill value is to be used.
    pub fill_value: FillValueMetadata,
    /// Either "C" or "F", defining the layout of bytes within each chunk of the array.
    pub order: Order,
    /// A list of JSON objects providing codec configurations, or null if no filters are to be applied.
    #[serde(default)]
    pub filters: Option<Vec<CodecMetadata>>,
    /// If present, either the string "." or "/" defining the separator placed between the dimensions of a chunk key.
    #[serde(
        default = "chunk_key_separator_default",
        skip_serializing_if = "chunk_key_separator_is_default"
    )]
    pub dimension_separator: ChunkKeySeparator,
}

const fn chunk_key_separator_default() -> ChunkKeySeparator {
    ChunkKeySeparator::Dot
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn chunk_key_separator_is_default(separator: &ChunkKeySeparator) -> bool {
    *separator == ChunkKeySeparator::Dot
}

/// Zarr V2 data type metadata.
///
/// A simple data type is a NumPy typestr such as `<f8`.
/// A structured data type is a list of `[name, typestr]` or `[name, typestr, shape]` fields.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(untagged)]
pub enum DataTypeMetadata {
    /// A simple data type.
    Simple(String),
    /// A structured data type.
    Structured(Vec<StructuredFieldMetadata>),
}

/// A field of a structured data type.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(
    from = "StructuredFieldMetadataTuple",
    into = "StructuredFieldMetadataTuple"
)]
pub struct StructuredFieldMetadata {
    /// Field name.
    pub name: String,
    /// Field data type (a simple typestr).
    pub dtype: String,
    /// Subarray shape.
    pub shape: Option<Vec<u64>>,
}

#[derive(Serialize, Deserialize, Clone)]
struct StructuredFieldMetadataTuple(
    String,
    String,
    #[serde(skip_serializing_if = "Option::is_none")] Option<Vec<u64>>,
);

impl From<StructuredFieldMetadataTuple> for StructuredFieldMetadata {
    fn from(value: StructuredFieldMetadataTuple) -> Self {
        let StructuredFieldMetadataTuple(name, dtype, shape) = value;
        Self { name, dtype, shape }
    }
}

impl From<StructuredFieldMetadata> for StructuredFieldMetadataTuple {
    fn from(value: StructuredFieldMetadata) -> Self {
        Self(value.name, value.dtype, value.shape)
    }
}

/// The layout of bytes within each chunk of the array.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Order {
    /// Row-major order. The last dimension varies fastest.
    C,
    /// Column-major order. The first dimension varies fastest.
    F,
}

/// The separator placed between the dimensions of a chunk key.
#[derive(Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Debug)]
pub enum ChunkKeySeparator {
    /// The dot key separator.
    #[serde(rename = ".")]
    Dot,
    /// The slash key separator.
    #[serde(rename = "/")]
    Slash,
}

impl ChunkKeySeparator {
    /// Return the separator as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Dot => ".",
            Self::Slash => "/",
        }
    }
}

impl core::fmt::Display for ChunkKeySeparator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON_VALID: &str = r#"
{
    "chunks": [
        1000,
        1000
    ],
    "compressor": {
        "id": "blosc",
        "cname": "lz4",
        "clevel": 5,
        "shuffle": 1
    },
    "dtype": "<f8",
    "fill_value": "NaN",
    "filters": null,
    "order": "C",
    "shape": [
        10000,
        10000
    ],
    "zarr_format": 2
}"#;

    #[test]
    fn array_metadata_round_trip() {
        let metadata: ArrayMetadata = serde_json::from_str(JSON_VALID).unwrap();
        assert_eq!(metadata.shape, vec![10000, 10000]);
        assert_eq!(metadata.order, Order::C);
        assert_eq!(metadata.dimension_separator, ChunkKeySeparator::Dot);
        assert_eq!(metadata.compressor.as_ref().unwrap().id(), "blosc");

        let json = serde_json::to_value(&metadata).unwrap();
        let expected: serde_json::Value = serde_json::from_str(JSON_VALID).unwrap();
        assert_eq!(json, expected);
    }

    #[test]
    fn array_metadata_unknown_fields_ignored() {
        let mut json: serde_json::Value = serde_json::from_str(JSON_VALID).unwrap();
        json.as_object_mut()
            .unwrap()
            .insert("unknown".to_string(), serde_json::Value::Bool(true));
        assert!(serde_json::from_value::<ArrayMetadata>(json).is_ok());
    }

    #[test]
    fn array_metadata_invalid_format() {
        let json = JSON_VALID.replace("\"zarr_format\": 2", "\"zarr_format\": 3");
        assert!(serde_json::from_str::<ArrayMetadata>(&json).is_err());
    }

    #[test]
    fn array_metadata_invalid_chunks() {
        let mut json: serde_json::Value = serde_json::from_str(JSON_VALID).unwrap();
        json["chunks"] = serde_json::json!([0, 1000]);
        assert!(serde_json::from_value::<ArrayMetadata>(json).is_err());
    }

    #[test]
    fn array_metadata_structured_dtype() {
        let json = JSON_VALID.replace(
            "\"<f8\"",
            r#"[["a", "<i2"], ["b", "<f4", [2]]]"#,
        );
        let metadata: ArrayMetadata = serde_json::from_str(&json).unwrap();
        let DataTypeMetadata::Structured(fields) = &metadata.dtype else {
            panic!()
        };
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "a");
        assert_eq!(fields[0].shape, None);
        assert_eq!(fields[1].dtype, "<f4");
        assert_eq!(fields[1].shape, Some(vec![2]));
    }

    #[test]
    fn chunk_key_separator() {
        assert_eq!(
            serde_json::from_str::<ChunkKeySeparator>(r#"".""#).unwrap(),
            ChunkKeySeparator::Dot
        );
        assert_eq!(
            serde_json::from_str::<ChunkKeySeparator>(r#""/""#).unwrap(),
            ChunkKeySeparator::Slash
        );
        assert!(serde_json::from_str::<ChunkKeySeparator>(r#""-""#).is_err());
    }
}
