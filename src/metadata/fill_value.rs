use serde::{Deserialize, Serialize};

/// Fill value metadata, a scalar providing the default value for uninitialized portions of an array.
///
/// The JSON encoding is data type dependent:
/// numbers for the numeric data types with `"NaN"`, `"Infinity"`, and `"-Infinity"` for non-finite floats,
/// booleans for `|b1`, base64 strings for `|S<n>` and structured data types, strings for `<U<n>`,
/// and `null` when no fill value is to be used.
///
/// The interpretation of fill values is data type dependent, so conversion to and from element bytes is handled by
/// [`DataType::fill_value_from_metadata`](crate::array::DataType::fill_value_from_metadata) and
/// [`DataType::metadata_fill_value`](crate::array::DataType::metadata_fill_value).
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum FillValueMetadata {
    /// No fill value.
    Null,
    /// A boolean value.
    Bool(bool),
    /// NaN (not-a-number).
    NaN,
    /// Positive infinity.
    Infinity,
    /// Negative infinity.
    NegInfinity,
    /// A number.
    Number(serde_json::Number),
    /// A string (base64 bytes for bytestring and structured data types, literal text otherwise).
    String(String),
}

impl<'de> Deserialize<'de> for FillValueMetadata {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum FillValueMetadataType {
            Bool(bool),
            Number(serde_json::Number),
            String(String),
            Null,
        }
        let fill_value = FillValueMetadataType::deserialize(d)?;
        match fill_value {
            FillValueMetadataType::Bool(bool) => Ok(Self::Bool(bool)),
            FillValueMetadataType::Number(number) => Ok(Self::Number(number)),
            FillValueMetadataType::String(string) => match string.as_str() {
                "NaN" => Ok(Self::NaN),
                "Infinity" => Ok(Self::Infinity),
                "-Infinity" => Ok(Self::NegInfinity),
                _ => Ok(Self::String(string)),
            },
            FillValueMetadataType::Null => Ok(Self::Null),
        }
    }
}

impl Serialize for FillValueMetadata {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Bool(bool) => serializer.serialize_bool(*bool),
            Self::NaN => serializer.serialize_str("NaN"),
            Self::Infinity => serializer.serialize_str("Infinity"),
            Self::NegInfinity => serializer.serialize_str("-Infinity"),
            Self::Number(number) => number.serialize(serializer),
            Self::String(string) => serializer.serialize_str(string),
        }
    }
}

impl core::fmt::Display for FillValueMetadata {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", serde_json::to_string(self).unwrap_or_default())
    }
}

impl FillValueMetadata {
    /// Convert the fill value to an integer type.
    #[must_use]
    pub fn try_as_int<T: TryFrom<i64> + TryFrom<u64>>(&self) -> Option<T> {
        match self {
            Self::Number(number) => {
                if let Some(int) = number.as_i64() {
                    T::try_from(int).ok()
                } else {
                    number.as_u64().and_then(|uint| T::try_from(uint).ok())
                }
            }
            _ => None,
        }
    }

    /// Convert the fill value to a float.
    #[must_use]
    pub fn try_as_float(&self) -> Option<f64> {
        match self {
            Self::Number(number) => number.as_f64(),
            Self::NaN => Some(f64::NAN),
            Self::Infinity => Some(f64::INFINITY),
            Self::NegInfinity => Some(f64::NEG_INFINITY),
            _ => None,
        }
    }

    /// Convert the fill value to a bool.
    #[must_use]
    pub fn try_as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(bool) => Some(*bool),
            _ => None,
        }
    }

    /// Convert the fill value to a string slice.
    #[must_use]
    pub fn try_as_str(&self) -> Option<&str> {
        match self {
            Self::String(string) => Some(string),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_value_metadata_null() {
        let metadata: FillValueMetadata = serde_json::from_str("null").unwrap();
        assert_eq!(metadata, FillValueMetadata::Null);
        assert_eq!(serde_json::to_string(&metadata).unwrap(), "null");
    }

    #[test]
    fn fill_value_metadata_bool() {
        let metadata: FillValueMetadata = serde_json::from_str("true").unwrap();
        assert_eq!(metadata, FillValueMetadata::Bool(true));
        assert_eq!(metadata.try_as_bool(), Some(true));
        assert_eq!(serde_json::to_string(&metadata).unwrap(), "true");
    }

    #[test]
    fn fill_value_metadata_int() {
        let metadata: FillValueMetadata = serde_json::from_str("-7").unwrap();
        assert_eq!(metadata.try_as_int::<i64>(), Some(-7));
        assert_eq!(metadata.try_as_int::<u8>(), None);
        assert_eq!(serde_json::to_string(&metadata).unwrap(), "-7");
    }

    #[test]
    fn fill_value_metadata_uint() {
        let metadata: FillValueMetadata = serde_json::from_str("18446744073709551615").unwrap();
        assert_eq!(metadata.try_as_int::<u64>(), Some(u64::MAX));
        assert_eq!(metadata.try_as_int::<i64>(), None);
    }

    #[test]
    fn fill_value_metadata_float() {
        let metadata: FillValueMetadata = serde_json::from_str("7.5").unwrap();
        assert_eq!(metadata.try_as_float(), Some(7.5));
        assert_eq!(serde_json::to_string(&metadata).unwrap(), "7.5");
    }

    #[test]
    fn fill_value_metadata_nonfinite() {
        let nan: FillValueMetadata = serde_json::from_str(r#""NaN""#).unwrap();
        assert_eq!(nan, FillValueMetadata::NaN);
        assert!(nan.try_as_float().unwrap().is_nan());
        assert_eq!(serde_json::to_string(&nan).unwrap(), r#""NaN""#);

        let inf: FillValueMetadata = serde_json::from_str(r#""Infinity""#).unwrap();
        assert_eq!(inf.try_as_float(), Some(f64::INFINITY));

        let neg_inf: FillValueMetadata = serde_json::from_str(r#""-Infinity""#).unwrap();
        assert_eq!(neg_inf.try_as_float(), Some(f64::NEG_INFINITY));
    }

    #[test]
    fn fill_value_metadata_string() {
        let metadata: FillValueMetadata = serde_json::from_str(r#""AAEC""#).unwrap();
        assert_eq!(metadata.try_as_str(), Some("AAEC"));
        assert_eq!(serde_json::to_string(&metadata).unwrap(), r#""AAEC""#);
    }
}
