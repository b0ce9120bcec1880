//! Zarr V2 metadata.
//!
//! An array is described by a `.zarray` JSON document ([`ArrayMetadata`]) and a group by a `.zgroup` JSON document ([`GroupMetadata`]).
//! User attributes are a free-form JSON object held in a separate `.zattrs` document.
//!
//! Compressors and filters are identified by a numcodecs-style JSON object with an `id` field and flattened configuration parameters ([`CodecMetadata`]).

mod array;
mod fill_value;
mod group;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

pub use array::{
    ArrayMetadata, ChunkKeySeparator, DataTypeMetadata, Order, StructuredFieldMetadata,
};
pub use fill_value::FillValueMetadata;
pub use group::GroupMetadata;

/// Codec metadata with an `id` and a flattened configuration.
///
/// For example:
/// ```json
/// {
///     "id": "blosc",
///     "cname": "lz4",
///     "clevel": 5,
///     "shuffle": 1
/// }
/// ```
#[derive(Serialize, Deserialize, Clone, Eq, PartialEq, Debug)]
pub struct CodecMetadata {
    id: String,
    #[serde(flatten)]
    configuration: serde_json::Map<String, serde_json::Value>,
}

impl CodecMetadata {
    /// Create codec metadata from `id` with an empty configuration.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            configuration: serde_json::Map::default(),
        }
    }

    /// Create codec metadata from `id` and a serializable `configuration`.
    ///
    /// # Errors
    /// Returns a [`serde_json::Error`] if `configuration` cannot be converted to a JSON object.
    pub fn new_with_serializable_configuration<T: Serialize>(
        id: &str,
        configuration: &T,
    ) -> Result<Self, serde_json::Error> {
        let configuration = serde_json::to_value(configuration)?;
        if let serde_json::Value::Object(configuration) = configuration {
            Ok(Self {
                id: id.to_string(),
                configuration,
            })
        } else {
            Err(serde::ser::Error::custom(
                "configuration is not a JSON object",
            ))
        }
    }

    /// Return the codec `id`.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Return the configuration, which includes all fields excluding the `id`.
    #[must_use]
    pub fn configuration(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.configuration
    }

    /// Convert the configuration to a concrete codec configuration type.
    ///
    /// # Errors
    /// Returns a [`serde_json::Error`] if the configuration is not valid for `T`.
    pub fn to_configuration<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(serde_json::Value::Object(self.configuration.clone()))
    }
}

impl core::fmt::Display for CodecMetadata {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", serde_json::to_string(self).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codec_metadata() {
        let json = r#"{"id":"blosc","cname":"lz4","clevel":5,"shuffle":1}"#;
        let metadata: CodecMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(metadata.id(), "blosc");
        assert_eq!(metadata.configuration().len(), 3);
        assert_eq!(serde_json::to_string(&metadata).unwrap(), json);
    }

    #[test]
    fn codec_metadata_configuration() {
        #[derive(Deserialize)]
        struct Configuration {
            level: u32,
        }
        let metadata: CodecMetadata = serde_json::from_str(r#"{"id":"zlib","level":5}"#).unwrap();
        let configuration: Configuration = metadata.to_configuration().unwrap();
        assert_eq!(configuration.level, 5);
    }
}
