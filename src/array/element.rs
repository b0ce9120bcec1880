//! Typed views over array element bytes.
//!
//! Array elements are held as packed bytes in the native in-memory layout.
//! The [`Element`] trait provides typed access for the Rust types that represent each data type kind.

use super::{DataType, DataTypeKind};

/// A Rust type that is the in-memory representation of a [`DataType`] kind.
pub trait Element: Sized + Copy {
    /// Returns true if this type is the in-memory representation of `data_type`.
    fn is_compatible(data_type: &DataType) -> bool;

    /// Append the native byte representation of the element to `bytes`.
    fn to_ne_bytes(self, bytes: &mut Vec<u8>);

    /// Read an element from its native byte representation.
    ///
    /// `bytes` must hold exactly the element size of the corresponding data type.
    fn from_ne_bytes(bytes: &[u8]) -> Self;
}

impl Element for bool {
    fn is_compatible(data_type: &DataType) -> bool {
        matches!(data_type.kind(), DataTypeKind::Bool)
    }

    fn to_ne_bytes(self, bytes: &mut Vec<u8>) {
        bytes.push(u8::from(self));
    }

    fn from_ne_bytes(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }
}

macro_rules! impl_element_numeric {
    ($type:ty, $kind:ident) => {
        impl Element for $type {
            fn is_compatible(data_type: &DataType) -> bool {
                matches!(data_type.kind(), DataTypeKind::$kind)
            }

            fn to_ne_bytes(self, bytes: &mut Vec<u8>) {
                bytes.extend(<$type>::to_ne_bytes(self));
            }

            fn from_ne_bytes(bytes: &[u8]) -> Self {
                <$type>::from_ne_bytes(bytes.try_into().unwrap())
            }
        }
    };
}

impl_element_numeric!(i8, Int8);
impl_element_numeric!(i16, Int16);
impl_element_numeric!(i32, Int32);
impl_element_numeric!(i64, Int64);
impl_element_numeric!(u8, UInt8);
impl_element_numeric!(u16, UInt16);
impl_element_numeric!(u32, UInt32);
impl_element_numeric!(u64, UInt64);
impl_element_numeric!(half::f16, Float16);
impl_element_numeric!(f32, Float32);
impl_element_numeric!(f64, Float64);

impl Element for num::complex::Complex32 {
    fn is_compatible(data_type: &DataType) -> bool {
        matches!(data_type.kind(), DataTypeKind::Complex64)
    }

    fn to_ne_bytes(self, bytes: &mut Vec<u8>) {
        bytes.extend(self.re.to_ne_bytes());
        bytes.extend(self.im.to_ne_bytes());
    }

    fn from_ne_bytes(bytes: &[u8]) -> Self {
        Self::new(
            f32::from_ne_bytes(bytes[0..4].try_into().unwrap()),
            f32::from_ne_bytes(bytes[4..8].try_into().unwrap()),
        )
    }
}

impl Element for num::complex::Complex64 {
    fn is_compatible(data_type: &DataType) -> bool {
        matches!(data_type.kind(), DataTypeKind::Complex128)
    }

    fn to_ne_bytes(self, bytes: &mut Vec<u8>) {
        bytes.extend(self.re.to_ne_bytes());
        bytes.extend(self.im.to_ne_bytes());
    }

    fn from_ne_bytes(bytes: &[u8]) -> Self {
        Self::new(
            f64::from_ne_bytes(bytes[0..8].try_into().unwrap()),
            f64::from_ne_bytes(bytes[8..16].try_into().unwrap()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_compatibility() {
        let data_type = DataType::from_typestr("<i4").unwrap();
        assert!(i32::is_compatible(&data_type));
        assert!(!u32::is_compatible(&data_type));
        assert!(!f32::is_compatible(&data_type));
    }

    #[test]
    fn element_round_trips() {
        let mut bytes = Vec::new();
        Element::to_ne_bytes(-7i16, &mut bytes);
        assert_eq!(<i16 as Element>::from_ne_bytes(&bytes), -7);

        let mut bytes = Vec::new();
        Element::to_ne_bytes(true, &mut bytes);
        assert!(<bool as Element>::from_ne_bytes(&bytes));

        let mut bytes = Vec::new();
        Element::to_ne_bytes(num::complex::Complex32::new(1.0, -2.0), &mut bytes);
        assert_eq!(
            <num::complex::Complex32 as Element>::from_ne_bytes(&bytes),
            num::complex::Complex32::new(1.0, -2.0)
        );
    }
}
