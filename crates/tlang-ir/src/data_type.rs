use std::fmt;

use strum::IntoEnumIterator;

use crate::immediate::Immediate;

/// Scalar element kind carried by a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, strum::EnumIter)]
pub enum DataType {
    F16,
    F32,
    F64,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    Unknown,
}

impl DataType {
    /// Canonical name of the type. `Unknown` has no name and yields an empty string.
    pub const fn name(self) -> &'static str {
        match self {
            DataType::F16 => "float16",
            DataType::F32 => "float32",
            DataType::F64 => "float64",
            DataType::I8 => "int8",
            DataType::I16 => "int16",
            DataType::I32 => "int32",
            DataType::I64 => "int64",
            DataType::U8 => "uint8",
            DataType::U16 => "uint16",
            DataType::U32 => "uint32",
            DataType::U64 => "uint64",
            DataType::Unknown => "",
        }
    }

    /// Reverse lookup of [`DataType::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        if name.is_empty() {
            return None;
        }

        DataType::iter().find(|data_type| data_type.name() == name)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for f32 {}
    impl Sealed for i32 {}
}

/// Native scalar types the graph can take constants from.
///
/// Only `f32` and `i32` are recognised. Asking for the data type of any other
/// type does not compile.
pub trait NativeType: sealed::Sealed + Copy {
    const DATA_TYPE: DataType;

    fn into_immediate(self) -> Immediate;
}

impl NativeType for f32 {
    const DATA_TYPE: DataType = DataType::F32;

    fn into_immediate(self) -> Immediate {
        Immediate::Float(f64::from(self))
    }
}

impl NativeType for i32 {
    const DATA_TYPE: DataType = DataType::I32;

    fn into_immediate(self) -> Immediate {
        Immediate::Int(i64::from(self))
    }
}

/// Maps a native scalar type to its [`DataType`].
pub const fn data_type_of<T: NativeType>() -> DataType {
    T::DATA_TYPE
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(DataType::F16, "float16")]
    #[case(DataType::F32, "float32")]
    #[case(DataType::F64, "float64")]
    #[case(DataType::I8, "int8")]
    #[case(DataType::I32, "int32")]
    #[case(DataType::U64, "uint64")]
    #[case(DataType::Unknown, "")]
    fn test_name(#[case] data_type: DataType, #[case] expected: &str) {
        assert_eq!(data_type.name(), expected);
        assert_eq!(data_type.to_string(), expected);
    }

    #[test]
    fn test_from_name_round_trips_every_named_type() {
        for data_type in DataType::iter().filter(|t| *t != DataType::Unknown) {
            assert_eq!(DataType::from_name(data_type.name()), Some(data_type));
        }
    }

    #[rstest]
    #[case("")]
    #[case("float128")]
    #[case("f32")]
    fn test_from_name_rejects(#[case] name: &str) {
        assert_eq!(DataType::from_name(name), None);
    }

    #[test]
    fn test_data_type_of() {
        assert_eq!(data_type_of::<f32>(), DataType::F32);
        assert_eq!(data_type_of::<i32>(), DataType::I32);
    }

    #[test]
    fn test_into_immediate() {
        assert_eq!(1.5f32.into_immediate(), Immediate::Float(1.5));
        assert_eq!((-7i32).into_immediate(), Immediate::Int(-7));
    }

    #[test]
    fn test_declaration_order() {
        assert!(DataType::F16 < DataType::F32);
        assert!(DataType::U64 < DataType::Unknown);
    }
}
