// Functions are created in a const context through `const fn new`
// constructors, a Default implementation would never be used.
#![allow(clippy::new_without_default)]

pub mod aggregate;
pub mod documentation;
pub mod function_set;
pub mod scalar;

use crate::arrays::datatype::{DataType, DataTypeId};

/// Function signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    /// Expected positional input argument types for this signature.
    pub positional_args: &'static [DataTypeId],

    /// The expected return type.
    ///
    /// For signatures accepting `Any`, the concrete return type is the type
    /// of the input.
    pub return_type: DataTypeId,
}

impl Signature {
    pub const fn new(inputs: &'static [DataTypeId], return_type: DataTypeId) -> Self {
        Signature {
            positional_args: inputs,
            return_type,
        }
    }

    /// Return if inputs given data types exactly satisfy the signature.
    pub fn exact_match(&self, inputs: &[DataType]) -> bool {
        if inputs.len() != self.positional_args.len() {
            return false;
        }

        self.positional_args
            .iter()
            .zip(inputs)
            .all(|(&expected, have)| expected == DataTypeId::Any || have.id() == expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_positional() {
        let sig = Signature::new(&[DataTypeId::Boolean, DataTypeId::Int64], DataTypeId::Int64);

        assert!(sig.exact_match(&[DataType::Boolean, DataType::Int64]));
        assert!(!sig.exact_match(&[DataType::Boolean, DataType::Float64]));
        assert!(!sig.exact_match(&[DataType::Boolean]));
        assert!(!sig.exact_match(&[DataType::Boolean, DataType::Int64, DataType::Int64]));
    }

    #[test]
    fn exact_match_any() {
        let sig = Signature::new(&[DataTypeId::Any], DataTypeId::Any);

        assert!(sig.exact_match(&[DataType::Utf8]));
        assert!(sig.exact_match(&[DataType::UInt16]));
        assert!(!sig.exact_match(&[]));
    }
}
