//! Zarr V2 data types.
//!
//! A data type describes one array element: its logical kind, its byte size, and (where applicable) its endianness.
//! Data types are encoded in metadata with the NumPy typestr grammar: an endianness prefix (`<` little, `>` big, `|` not applicable),
//! a kind character, and a width (`<f8`, `>i4`, `|u1`, `|S10`, `<U5`).
//! Structured data types are an ordered list of named fields, each with a simple typestr and an optional subarray shape.
//!
//! In memory, elements are always packed in native byte order;
//! [`encode_element`](DataType::encode_element) and [`decode_element`](DataType::decode_element)
//! convert between the native layout and the declared on-disk layout.

use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use thiserror::Error;

use crate::metadata::{DataTypeMetadata, FillValueMetadata, StructuredFieldMetadata};

use super::{Endianness, FillValue};

/// A data type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataType {
    kind: DataTypeKind,
    endianness: Option<Endianness>,
}

/// The logical kind of a [`DataType`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataTypeKind {
    /// `|b1` Boolean.
    Bool,
    /// `|i1` Integer in `[-2^7, 2^7-1]`.
    Int8,
    /// `i2` Integer in `[-2^15, 2^15-1]`.
    Int16,
    /// `i4` Integer in `[-2^31, 2^31-1]`.
    Int32,
    /// `i8` Integer in `[-2^63, 2^63-1]`.
    Int64,
    /// `|u1` Integer in `[0, 2^8-1]`.
    UInt8,
    /// `u2` Integer in `[0, 2^16-1]`.
    UInt16,
    /// `u4` Integer in `[0, 2^32-1]`.
    UInt32,
    /// `u8` Integer in `[0, 2^64-1]`.
    UInt64,
    /// `f2` IEEE 754 half-precision floating point.
    Float16,
    /// `f4` IEEE 754 single-precision floating point.
    Float32,
    /// `f8` IEEE 754 double-precision floating point.
    Float64,
    /// `c8` real and imaginary components are each IEEE 754 single-precision floating point.
    Complex64,
    /// `c16` real and imaginary components are each IEEE 754 double-precision floating point.
    Complex128,
    /// `|S<n>` fixed-length sequence of bytes.
    Bytes(usize),
    /// `U<n>` fixed-length sequence of UCS-4 code units.
    Unicode(usize),
    /// A structured data type: an ordered list of named fields with no padding.
    Structured(Vec<StructuredField>),
}

/// A field of a structured [`DataType`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructuredField {
    name: String,
    data_type: DataType,
    shape: Option<Vec<u64>>,
}

impl StructuredField {
    /// Create a new structured data type field.
    ///
    /// # Errors
    /// Returns [`UnsupportedDataTypeError`] if `data_type` is itself structured or the subarray `shape` has a zero dimension.
    pub fn new(
        name: impl Into<String>,
        data_type: DataType,
        shape: Option<Vec<u64>>,
    ) -> Result<Self, UnsupportedDataTypeError> {
        let name = name.into();
        let nested = matches!(data_type.kind(), DataTypeKind::Structured(_));
        let zero_dim = shape.as_ref().is_some_and(|shape| shape.contains(&0));
        if nested || zero_dim {
            return Err(UnsupportedDataTypeError::InvalidStructuredField(name));
        }
        Ok(Self {
            name,
            data_type,
            shape,
        })
    }

    /// The field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field data type.
    #[must_use]
    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    /// The subarray shape of the field, if any.
    #[must_use]
    pub fn shape(&self) -> Option<&[u64]> {
        self.shape.as_deref()
    }

    /// The number of elements in the field (the product of the subarray shape, or one).
    #[must_use]
    pub fn num_elements(&self) -> usize {
        self.shape.as_ref().map_or(1, |shape| {
            shape.iter().map(|d| usize::try_from(*d).unwrap_or(0)).product()
        })
    }

    /// The size of the field in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.data_type.size() * self.num_elements()
    }
}

/// An unsupported data type error.
#[derive(Debug, Error)]
pub enum UnsupportedDataTypeError {
    /// An unknown typestr.
    #[error("unknown data type {0:?}")]
    UnknownTypestr(String),
    /// A known kind with an unsupported width.
    #[error("data type {0:?} has an invalid width")]
    InvalidWidth(String),
    /// A multi-byte kind without a declared byte order.
    #[error("data type {0:?} must declare a byte order with < or >")]
    InvalidEndianness(String),
    /// An invalid structured data type field.
    #[error("structured data type field {0:?} is invalid")]
    InvalidStructuredField(String),
    /// A structured data type with no fields.
    #[error("structured data types require at least one field")]
    EmptyStructure,
}

/// A fill value metadata incompatibility error.
#[derive(Debug, Error)]
#[error("incompatible fill value {1} for data type {0}")]
pub struct IncompatibleFillValueMetadataError(String, FillValueMetadata);

/// A fill value incompatibility error.
#[derive(Debug, Error)]
#[error("incompatible fill value {1} for data type {0}")]
pub struct IncompatibleFillValueError(String, FillValue);

impl IncompatibleFillValueError {
    /// Create a new incompatible fill value error.
    #[must_use]
    pub fn new(data_type_name: String, fill_value: FillValue) -> Self {
        Self(data_type_name, fill_value)
    }
}

impl DataType {
    /// Create a data type from a kind with the canonical endianness (little for multi-byte kinds).
    #[must_use]
    pub fn new(kind: DataTypeKind) -> Self {
        let endianness = (lane_size(&kind) > 1).then_some(Endianness::Little);
        Self { kind, endianness }
    }

    /// Create a data type from a kind with an explicit endianness.
    ///
    /// The endianness is ignored for single-byte and structured kinds.
    #[must_use]
    pub fn new_with_endianness(kind: DataTypeKind, endianness: Endianness) -> Self {
        let endianness = (lane_size(&kind) > 1).then_some(endianness);
        Self { kind, endianness }
    }

    /// Create a structured data type from an ordered list of fields.
    ///
    /// # Errors
    /// Returns [`UnsupportedDataTypeError`] if `fields` is empty.
    pub fn structured(fields: Vec<StructuredField>) -> Result<Self, UnsupportedDataTypeError> {
        if fields.is_empty() {
            return Err(UnsupportedDataTypeError::EmptyStructure);
        }
        Ok(Self {
            kind: DataTypeKind::Structured(fields),
            endianness: None,
        })
    }

    /// The kind of the data type.
    #[must_use]
    pub fn kind(&self) -> &DataTypeKind {
        &self.kind
    }

    /// The endianness of the data type, [`None`] where not applicable.
    #[must_use]
    pub fn endianness(&self) -> Option<Endianness> {
        self.endianness
    }

    /// The size of one element in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        match &self.kind {
            DataTypeKind::Bool | DataTypeKind::Int8 | DataTypeKind::UInt8 => 1,
            DataTypeKind::Int16 | DataTypeKind::UInt16 | DataTypeKind::Float16 => 2,
            DataTypeKind::Int32 | DataTypeKind::UInt32 | DataTypeKind::Float32 => 4,
            DataTypeKind::Int64
            | DataTypeKind::UInt64
            | DataTypeKind::Float64
            | DataTypeKind::Complex64 => 8,
            DataTypeKind::Complex128 => 16,
            DataTypeKind::Bytes(size) => *size,
            DataTypeKind::Unicode(length) => 4 * length,
            DataTypeKind::Structured(fields) => fields.iter().map(StructuredField::size).sum(),
        }
    }

    /// The name of the data type: its typestr, or the field list for structured data types.
    #[must_use]
    pub fn name(&self) -> String {
        match &self.kind {
            DataTypeKind::Structured(_) => {
                serde_json::to_string(&self.to_metadata()).unwrap_or_default()
            }
            _ => self.typestr(),
        }
    }

    /// Create a data type from a NumPy typestr.
    ///
    /// # Errors
    /// Returns [`UnsupportedDataTypeError`] if the typestr is not recognised,
    /// its width does not match its kind, or a multi-byte kind has no declared byte order.
    pub fn from_typestr(typestr: &str) -> Result<Self, UnsupportedDataTypeError> {
        use UnsupportedDataTypeError as Error;
        let unknown = || Error::UnknownTypestr(typestr.to_string());

        let mut chars = typestr.chars();
        let endianness = match chars.next().ok_or_else(unknown)? {
            '|' => None,
            '<' => Some(Endianness::Little),
            '>' => Some(Endianness::Big),
            _ => return Err(unknown()),
        };
        let kind_char = chars.next().ok_or_else(unknown)?;
        let width: usize = chars.as_str().parse().map_err(|_| unknown())?;

        let kind = match (kind_char, width) {
            ('b', 1) => DataTypeKind::Bool,
            ('i', 1) => DataTypeKind::Int8,
            ('i', 2) => DataTypeKind::Int16,
            ('i', 4) => DataTypeKind::Int32,
            ('i', 8) => DataTypeKind::Int64,
            ('u', 1) => DataTypeKind::UInt8,
            ('u', 2) => DataTypeKind::UInt16,
            ('u', 4) => DataTypeKind::UInt32,
            ('u', 8) => DataTypeKind::UInt64,
            ('f', 2) => DataTypeKind::Float16,
            ('f', 4) => DataTypeKind::Float32,
            ('f', 8) => DataTypeKind::Float64,
            ('c', 8) => DataTypeKind::Complex64,
            ('c', 16) => DataTypeKind::Complex128,
            ('S', size) if size > 0 => DataTypeKind::Bytes(size),
            ('U', length) if length > 0 => DataTypeKind::Unicode(length),
            ('b' | 'i' | 'u' | 'f' | 'c' | 'S' | 'U', _) => {
                return Err(Error::InvalidWidth(typestr.to_string()))
            }
            _ => return Err(unknown()),
        };

        if lane_size(&kind) > 1 {
            if endianness.is_none() {
                return Err(Error::InvalidEndianness(typestr.to_string()));
            }
            Ok(Self { kind, endianness })
        } else {
            // the byte order of single-byte kinds is normalised away
            Ok(Self {
                kind,
                endianness: None,
            })
        }
    }

    /// Create a data type from [`DataTypeMetadata`].
    ///
    /// # Errors
    /// Returns [`UnsupportedDataTypeError`] if the metadata does not describe a supported data type.
    pub fn from_metadata(metadata: &DataTypeMetadata) -> Result<Self, UnsupportedDataTypeError> {
        match metadata {
            DataTypeMetadata::Simple(typestr) => Self::from_typestr(typestr),
            DataTypeMetadata::Structured(fields) => {
                let fields = fields
                    .iter()
                    .map(|field| {
                        StructuredField::new(
                            field.name.clone(),
                            Self::from_typestr(&field.dtype)?,
                            field.shape.clone(),
                        )
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Self::structured(fields)
            }
        }
    }

    /// Convert the data type to [`DataTypeMetadata`].
    #[must_use]
    pub fn to_metadata(&self) -> DataTypeMetadata {
        match &self.kind {
            DataTypeKind::Structured(fields) => DataTypeMetadata::Structured(
                fields
                    .iter()
                    .map(|field| StructuredFieldMetadata {
                        name: field.name.clone(),
                        dtype: field.data_type.typestr(),
                        shape: field.shape.clone(),
                    })
                    .collect(),
            ),
            _ => DataTypeMetadata::Simple(self.typestr()),
        }
    }

    /// The typestr of a non-structured data type.
    fn typestr(&self) -> String {
        let prefix = self
            .endianness
            .map_or('|', Endianness::prefix);
        match &self.kind {
            DataTypeKind::Bool => "|b1".to_string(),
            DataTypeKind::Int8 => "|i1".to_string(),
            DataTypeKind::Int16 => format!("{prefix}i2"),
            DataTypeKind::Int32 => format!("{prefix}i4"),
            DataTypeKind::Int64 => format!("{prefix}i8"),
            DataTypeKind::UInt8 => "|u1".to_string(),
            DataTypeKind::UInt16 => format!("{prefix}u2"),
            DataTypeKind::UInt32 => format!("{prefix}u4"),
            DataTypeKind::UInt64 => format!("{prefix}u8"),
            DataTypeKind::Float16 => format!("{prefix}f2"),
            DataTypeKind::Float32 => format!("{prefix}f4"),
            DataTypeKind::Float64 => format!("{prefix}f8"),
            DataTypeKind::Complex64 => format!("{prefix}c8"),
            DataTypeKind::Complex128 => format!("{prefix}c16"),
            DataTypeKind::Bytes(size) => format!("|S{size}"),
            DataTypeKind::Unicode(length) => format!("{prefix}U{length}"),
            DataTypeKind::Structured(_) => String::new(),
        }
    }

    /// Encode one element from the native in-memory layout into the declared on-disk layout.
    ///
    /// `element` must hold exactly [`size`](DataType::size) bytes; exactly that many bytes are appended to `bytes`.
    pub fn encode_element(&self, element: &[u8], bytes: &mut Vec<u8>) {
        debug_assert_eq!(element.len(), self.size());
        self.reorder_element(element, bytes);
    }

    /// Decode one element from the declared on-disk layout into the native in-memory layout.
    ///
    /// `element` must hold exactly [`size`](DataType::size) bytes; exactly that many bytes are appended to `bytes`.
    pub fn decode_element(&self, element: &[u8], bytes: &mut Vec<u8>) {
        debug_assert_eq!(element.len(), self.size());
        self.reorder_element(element, bytes);
    }

    // Byte swapping is an involution, so encode and decode share this.
    fn reorder_element(&self, element: &[u8], out: &mut Vec<u8>) {
        if let DataTypeKind::Structured(fields) = &self.kind {
            let mut offset = 0;
            for field in fields {
                let field_size = field.data_type.size();
                for _ in 0..field.num_elements() {
                    field
                        .data_type
                        .reorder_element(&element[offset..offset + field_size], out);
                    offset += field_size;
                }
            }
        } else {
            let lane = lane_size(&self.kind);
            let swap = lane > 1 && self.endianness.is_some_and(|e| !e.is_native());
            if swap {
                for chunk in element.chunks_exact(lane) {
                    out.extend(chunk.iter().rev());
                }
            } else {
                out.extend_from_slice(element);
            }
        }
    }

    /// Create a fill value from [`FillValueMetadata`].
    ///
    /// Returns [`None`] for [`FillValueMetadata::Null`].
    ///
    /// # Errors
    /// Returns [`IncompatibleFillValueMetadataError`] if the fill value is incompatible with the data type.
    #[allow(clippy::too_many_lines)]
    pub fn fill_value_from_metadata(
        &self,
        fill_value: &FillValueMetadata,
    ) -> Result<Option<FillValue>, IncompatibleFillValueMetadataError> {
        use FillValue as FV;
        if *fill_value == FillValueMetadata::Null {
            return Ok(None);
        }
        let err = || IncompatibleFillValueMetadataError(self.name(), fill_value.clone());
        let fill_value = match &self.kind {
            DataTypeKind::Bool => FV::from(fill_value.try_as_bool().ok_or_else(err)?),
            DataTypeKind::Int8 => FV::from(fill_value.try_as_int::<i8>().ok_or_else(err)?),
            DataTypeKind::Int16 => FV::from(fill_value.try_as_int::<i16>().ok_or_else(err)?),
            DataTypeKind::Int32 => FV::from(fill_value.try_as_int::<i32>().ok_or_else(err)?),
            DataTypeKind::Int64 => FV::from(fill_value.try_as_int::<i64>().ok_or_else(err)?),
            DataTypeKind::UInt8 => FV::from(fill_value.try_as_int::<u8>().ok_or_else(err)?),
            DataTypeKind::UInt16 => FV::from(fill_value.try_as_int::<u16>().ok_or_else(err)?),
            DataTypeKind::UInt32 => FV::from(fill_value.try_as_int::<u32>().ok_or_else(err)?),
            DataTypeKind::UInt64 => FV::from(fill_value.try_as_int::<u64>().ok_or_else(err)?),
            DataTypeKind::Float16 => FV::from(half::f16::from_f64(
                fill_value.try_as_float().ok_or_else(err)?,
            )),
            #[allow(clippy::cast_possible_truncation)]
            DataTypeKind::Float32 => {
                FV::from(fill_value.try_as_float().ok_or_else(err)? as f32)
            }
            DataTypeKind::Float64 => FV::from(fill_value.try_as_float().ok_or_else(err)?),
            #[allow(clippy::cast_possible_truncation)]
            DataTypeKind::Complex64 => FV::from(num::complex::Complex32::new(
                fill_value.try_as_float().ok_or_else(err)? as f32,
                0.0,
            )),
            DataTypeKind::Complex128 => FV::from(num::complex::Complex64::new(
                fill_value.try_as_float().ok_or_else(err)?,
                0.0,
            )),
            DataTypeKind::Bytes(size) => {
                let string = fill_value.try_as_str().ok_or_else(err)?;
                let mut bytes = BASE64_STANDARD.decode(string).map_err(|_| err())?;
                if bytes.len() > *size {
                    return Err(err());
                }
                bytes.resize(*size, 0);
                FV::new(bytes)
            }
            DataTypeKind::Unicode(length) => {
                let string = fill_value.try_as_str().ok_or_else(err)?;
                if string.chars().count() > *length {
                    return Err(err());
                }
                let mut bytes = Vec::with_capacity(4 * length);
                for char in string.chars() {
                    bytes.extend((char as u32).to_ne_bytes());
                }
                bytes.resize(4 * length, 0);
                FV::new(bytes)
            }
            DataTypeKind::Structured(_) => {
                let string = fill_value.try_as_str().ok_or_else(err)?;
                let disk_bytes = BASE64_STANDARD.decode(string).map_err(|_| err())?;
                if disk_bytes.len() != self.size() {
                    return Err(err());
                }
                let mut bytes = Vec::with_capacity(disk_bytes.len());
                self.decode_element(&disk_bytes, &mut bytes);
                FV::new(bytes)
            }
        };
        Ok(Some(fill_value))
    }

    /// Create fill value metadata from a fill value.
    ///
    /// # Errors
    /// Returns [`IncompatibleFillValueError`] if the fill value size does not match the data type,
    /// or the fill value cannot be represented in metadata
    /// (a complex fill value with a non-zero imaginary component, or unicode bytes that are not valid code points).
    #[allow(clippy::missing_panics_doc, clippy::too_many_lines)]
    pub fn metadata_fill_value(
        &self,
        fill_value: &FillValue,
    ) -> Result<FillValueMetadata, IncompatibleFillValueError> {
        use FillValueMetadata as FVM;
        let err = || IncompatibleFillValueError(self.name(), fill_value.clone());
        let bytes = fill_value.as_ne_bytes();
        if bytes.len() != self.size() {
            return Err(err());
        }
        let metadata = match &self.kind {
            DataTypeKind::Bool => FVM::Bool(bytes[0] != 0),
            DataTypeKind::Int8 => {
                FVM::Number(i64::from(i8::from_ne_bytes(bytes.try_into().unwrap())).into())
            }
            DataTypeKind::Int16 => {
                FVM::Number(i64::from(i16::from_ne_bytes(bytes.try_into().unwrap())).into())
            }
            DataTypeKind::Int32 => {
                FVM::Number(i64::from(i32::from_ne_bytes(bytes.try_into().unwrap())).into())
            }
            DataTypeKind::Int64 => {
                FVM::Number(i64::from_ne_bytes(bytes.try_into().unwrap()).into())
            }
            DataTypeKind::UInt8 => {
                FVM::Number(u64::from(u8::from_ne_bytes(bytes.try_into().unwrap())).into())
            }
            DataTypeKind::UInt16 => {
                FVM::Number(u64::from(u16::from_ne_bytes(bytes.try_into().unwrap())).into())
            }
            DataTypeKind::UInt32 => {
                FVM::Number(u64::from(u32::from_ne_bytes(bytes.try_into().unwrap())).into())
            }
            DataTypeKind::UInt64 => {
                FVM::Number(u64::from_ne_bytes(bytes.try_into().unwrap()).into())
            }
            DataTypeKind::Float16 => float_to_fill_value(f64::from(half::f16::from_ne_bytes(
                bytes.try_into().unwrap(),
            )))
            .ok_or_else(err)?,
            DataTypeKind::Float32 => {
                float_to_fill_value(f64::from(f32::from_ne_bytes(bytes.try_into().unwrap())))
                    .ok_or_else(err)?
            }
            DataTypeKind::Float64 => {
                float_to_fill_value(f64::from_ne_bytes(bytes.try_into().unwrap()))
                    .ok_or_else(err)?
            }
            DataTypeKind::Complex64 => {
                let re = f32::from_ne_bytes(bytes[0..4].try_into().unwrap());
                let im = f32::from_ne_bytes(bytes[4..8].try_into().unwrap());
                if im != 0.0 {
                    return Err(err());
                }
                float_to_fill_value(f64::from(re)).ok_or_else(err)?
            }
            DataTypeKind::Complex128 => {
                let re = f64::from_ne_bytes(bytes[0..8].try_into().unwrap());
                let im = f64::from_ne_bytes(bytes[8..16].try_into().unwrap());
                if im != 0.0 {
                    return Err(err());
                }
                float_to_fill_value(re).ok_or_else(err)?
            }
            DataTypeKind::Bytes(_) => FVM::String(BASE64_STANDARD.encode(bytes)),
            DataTypeKind::Unicode(_) => {
                let mut string = String::new();
                for chunk in bytes.chunks_exact(4) {
                    let code = u32::from_ne_bytes(chunk.try_into().unwrap());
                    string.push(char::from_u32(code).ok_or_else(err)?);
                }
                FVM::String(string.trim_end_matches('\0').to_string())
            }
            DataTypeKind::Structured(_) => {
                let mut disk_bytes = Vec::with_capacity(bytes.len());
                self.encode_element(bytes, &mut disk_bytes);
                FVM::String(BASE64_STANDARD.encode(disk_bytes))
            }
        };
        Ok(metadata)
    }
}

impl core::fmt::Display for DataType {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl TryFrom<&DataTypeMetadata> for DataType {
    type Error = UnsupportedDataTypeError;

    fn try_from(metadata: &DataTypeMetadata) -> Result<Self, Self::Error> {
        Self::from_metadata(metadata)
    }
}

/// The width of the scalar lanes of a kind, the unit of byte swapping.
fn lane_size(kind: &DataTypeKind) -> usize {
    match kind {
        DataTypeKind::Bool
        | DataTypeKind::Int8
        | DataTypeKind::UInt8
        | DataTypeKind::Bytes(_)
        | DataTypeKind::Structured(_) => 1,
        DataTypeKind::Int16 | DataTypeKind::UInt16 | DataTypeKind::Float16 => 2,
        DataTypeKind::Int32
        | DataTypeKind::UInt32
        | DataTypeKind::Float32
        | DataTypeKind::Complex64
        | DataTypeKind::Unicode(_) => 4,
        DataTypeKind::Int64
        | DataTypeKind::UInt64
        | DataTypeKind::Float64
        | DataTypeKind::Complex128 => 8,
    }
}

fn float_to_fill_value(f: f64) -> Option<FillValueMetadata> {
    if f.is_nan() {
        Some(FillValueMetadata::NaN)
    } else if f.is_infinite() && f.is_sign_positive() {
        Some(FillValueMetadata::Infinity)
    } else if f.is_infinite() && f.is_sign_negative() {
        Some(FillValueMetadata::NegInfinity)
    } else {
        serde_json::Number::from_f64(f).map(FillValueMetadata::Number)
    }
}
