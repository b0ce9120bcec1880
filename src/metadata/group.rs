use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Zarr V2 group metadata, the contents of a `.zgroup` document.
///
/// ```json
/// {
///     "zarr_format": 2
/// }
/// ```
#[derive(Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Debug, Display)]
#[display("{}", serde_json::to_string(self).unwrap_or_default())]
pub struct GroupMetadata {
    /// An integer defining the version of the storage specification to which the group adheres. Must be `2`.
    pub zarr_format: monostate::MustBe!(2u64),
}

impl Default for GroupMetadata {
    fn default() -> Self {
        Self {
            zarr_format: monostate::MustBe!(2u64),
        }
    }
}
