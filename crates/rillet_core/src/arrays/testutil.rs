//! Test utilities.
//!
//! Not behind a `#[cfg(test)]` flag so that integration tests can use it.
//!
//! Should not be used outside of tests.

use super::array::{Array, ArrayData};
use super::datatype::ElementType;

/// Asserts that two arrays are logically equal.
///
/// Values at null positions are ignored.
pub fn assert_arrays_eq<T: ElementType>(a: &Array<T>, b: &Array<T>) {
    assert_eq!(a.len(), b.len(), "lengths differ");

    for idx in 0..a.len() {
        assert_eq!(a.value(idx), b.value(idx), "values differ at index {idx}");
    }
}

/// Asserts that two type-erased arrays are logically equal.
pub fn assert_array_data_eq(a: &ArrayData, b: &ArrayData) {
    assert_eq!(a.datatype(), b.datatype(), "data types differ");
    assert_eq!(a.len(), b.len(), "lengths differ");

    for idx in 0..a.len() {
        assert_eq!(a.format_value(idx), b.format_value(idx), "values differ at index {idx}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arrays::bitmap::Bitmap;

    #[test]
    fn arrays_eq_ignores_null_values() {
        let a = Array::try_new(vec![1_i32, 5], Some(Bitmap::from_iter([true, false]))).unwrap();
        let b = Array::from_iter([Some(1_i32), None]);

        assert_arrays_eq(&a, &b);
    }

    #[test]
    #[should_panic]
    fn arrays_not_eq() {
        let a = Array::from(vec![1_i32, 2]);
        let b = Array::from_iter([Some(1_i32), None]);

        assert_arrays_eq(&a, &b);
    }

    #[test]
    fn array_data_eq() {
        let a = ArrayData::from(Array::from(vec!["a".to_string()]));
        let b = ArrayData::from(Array::from_iter([Some("a".to_string())]));

        assert_array_data_eq(&a, &b);
    }
}
