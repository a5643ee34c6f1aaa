//! Membership sets used for removing duplicate elements from an array.

mod primitive;
mod typed;

use std::sync::Arc;

pub use primitive::*;
use rillet_error::Result;
pub use typed::*;

use super::array::{Array, ArrayBuilder};
use super::datatype::ElementType;

/// A set tracking which elements of a single array have been retained.
///
/// A set is bound to the array it was created for, and elements are
/// referenced by their position in that array. Nulls are tracked with a
/// single flag, at most one null is ever retained.
pub trait DistinctSet {
    /// Try to insert the element at `idx`.
    ///
    /// Returns true if the element was not previously in the set.
    fn insert(&mut self, idx: usize) -> Result<bool>;

    /// Try to insert the element at `idx`, which the caller guarantees is not
    /// null.
    fn insert_non_null(&mut self, idx: usize) -> Result<bool>;
}

/// Scan `array` once, retaining the first occurrence of each element.
///
/// The prescan inserts elements until the first duplicate. If there is none,
/// the input array is returned as is. Otherwise a new array is built from the
/// already known distinct prefix, and the scan continues with the same set.
///
/// An error from the set aborts the scan with no partial output.
pub fn distinct_scan<T, S>(array: &Arc<Array<T>>, set: &mut S) -> Result<Arc<Array<T>>>
where
    T: ElementType,
    S: DistinctSet,
{
    let len = array.len();
    let may_have_nulls = array.may_have_nulls();

    let mut insert = |idx: usize| {
        if may_have_nulls {
            set.insert(idx)
        } else {
            set.insert_non_null(idx)
        }
    };

    let mut first_duplicate = 0;
    while first_duplicate < len && insert(first_duplicate)? {
        first_duplicate += 1;
    }

    if first_duplicate == len {
        tracing::trace!(%len, "array already distinct");
        return Ok(array.clone());
    }

    tracing::trace!(%len, %first_duplicate, "building distinct array");

    let mut builder = ArrayBuilder::with_capacity(len);
    for idx in 0..first_duplicate {
        builder.push_from(array, idx);
    }

    // `first_duplicate` already failed insertion.
    for idx in (first_duplicate + 1)..len {
        if insert(idx)? {
            builder.push_from(array, idx);
        }
    }

    Ok(Arc::new(builder.finish()))
}
