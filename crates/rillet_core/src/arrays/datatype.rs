use std::fmt::{self, Debug};
use std::sync::Arc;

use super::array::{Array, ArrayData};

/// Data type ids used for matching function signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataTypeId {
    /// Matches any data type.
    Any,
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Utf8,
}

impl fmt::Display for DataTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "Any"),
            Self::Boolean => write!(f, "Boolean"),
            Self::Int8 => write!(f, "Int8"),
            Self::Int16 => write!(f, "Int16"),
            Self::Int32 => write!(f, "Int32"),
            Self::Int64 => write!(f, "Int64"),
            Self::UInt8 => write!(f, "UInt8"),
            Self::UInt16 => write!(f, "UInt16"),
            Self::UInt32 => write!(f, "UInt32"),
            Self::UInt64 => write!(f, "UInt64"),
            Self::Float32 => write!(f, "Float32"),
            Self::Float64 => write!(f, "Float64"),
            Self::Utf8 => write!(f, "Utf8"),
        }
    }
}

/// Concrete element data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Utf8,
}

impl DataType {
    pub const fn id(&self) -> DataTypeId {
        match self {
            DataType::Boolean => DataTypeId::Boolean,
            DataType::Int8 => DataTypeId::Int8,
            DataType::Int16 => DataTypeId::Int16,
            DataType::Int32 => DataTypeId::Int32,
            DataType::Int64 => DataTypeId::Int64,
            DataType::UInt8 => DataTypeId::UInt8,
            DataType::UInt16 => DataTypeId::UInt16,
            DataType::UInt32 => DataTypeId::UInt32,
            DataType::UInt64 => DataTypeId::UInt64,
            DataType::Float32 => DataTypeId::Float32,
            DataType::Float64 => DataTypeId::Float64,
            DataType::Utf8 => DataTypeId::Utf8,
        }
    }

    /// If values of this type are exact integers, where two values are equal
    /// if and only if their bit patterns are equal.
    pub const fn is_exact_integer(&self) -> bool {
        matches!(
            self,
            DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
        )
    }

    /// Parse a data type from a (case-insensitive) SQL-ish name.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_ascii_lowercase().as_str() {
            "boolean" | "bool" => DataType::Boolean,
            "tinyint" | "int8" => DataType::Int8,
            "smallint" | "int16" => DataType::Int16,
            "integer" | "int" | "int32" => DataType::Int32,
            "bigint" | "int64" => DataType::Int64,
            "uint8" => DataType::UInt8,
            "uint16" => DataType::UInt16,
            "uint32" => DataType::UInt32,
            "uint64" => DataType::UInt64,
            "real" | "float" | "float32" => DataType::Float32,
            "double" | "float64" => DataType::Float64,
            "varchar" | "text" | "utf8" => DataType::Utf8,
            _ => return None,
        })
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.id(), f)
    }
}

/// Rust types that can be stored as elements in an array.
pub trait ElementType: Debug + Clone + Default + PartialEq + Send + Sync + 'static {
    const DATATYPE: DataType;

    /// Wrap a typed array in the type-erased array representation.
    fn into_array_data(array: Arc<Array<Self>>) -> ArrayData;

    /// Get the typed array from the type-erased representation, returning
    /// None if the types don't match.
    fn try_from_array_data(data: &ArrayData) -> Option<&Arc<Array<Self>>>;
}

macro_rules! impl_element_type {
    ($typ:ty, $variant:ident) => {
        impl ElementType for $typ {
            const DATATYPE: DataType = DataType::$variant;

            fn into_array_data(array: Arc<Array<Self>>) -> ArrayData {
                ArrayData::$variant(array)
            }

            fn try_from_array_data(data: &ArrayData) -> Option<&Arc<Array<Self>>> {
                match data {
                    ArrayData::$variant(array) => Some(array),
                    _ => None,
                }
            }
        }
    };
}

impl_element_type!(bool, Boolean);
impl_element_type!(i8, Int8);
impl_element_type!(i16, Int16);
impl_element_type!(i32, Int32);
impl_element_type!(i64, Int64);
impl_element_type!(u8, UInt8);
impl_element_type!(u16, UInt16);
impl_element_type!(u32, UInt32);
impl_element_type!(u64, UInt64);
impl_element_type!(f32, Float32);
impl_element_type!(f64, Float64);
impl_element_type!(String, Utf8);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_types_exact() {
        assert!(DataType::Int64.is_exact_integer());
        assert!(DataType::UInt8.is_exact_integer());
        assert!(!DataType::Float64.is_exact_integer());
        assert!(!DataType::Boolean.is_exact_integer());
        assert!(!DataType::Utf8.is_exact_integer());
    }

    #[test]
    fn display_uses_id() {
        assert_eq!("Int64", DataType::Int64.to_string());
        assert_eq!("Utf8", format!("{}", DataType::Utf8));
        assert_eq!("Any", DataTypeId::Any.to_string());
    }

    #[test]
    fn names() {
        assert_eq!(Some(DataType::Int64), DataType::from_name("BIGINT"));
        assert_eq!(Some(DataType::Float32), DataType::from_name("real"));
        assert_eq!(None, DataType::from_name("decimal"));
    }
}
