use hashbrown::raw::RawTable;
use rillet_error::{DbError, Result};

use super::DistinctSet;
use crate::arrays::array::Array;
use crate::arrays::compare::ElementComparer;
use crate::arrays::datatype::ElementType;
use crate::arrays::executor::hash::HashValue;

/// Distinct set for arbitrary element types.
///
/// Elements are fingerprinted with their hash, and hash matches are confirmed
/// with the element comparer.
pub struct TypedDistinctSet<'a, T, C> {
    array: &'a Array<T>,
    comparer: &'a C,
    /// (hash, position in array) for every retained non-null element.
    table: RawTable<(u64, usize)>,
    /// If we've already retained a null.
    null_retained: bool,
}

impl<'a, T, C> TypedDistinctSet<'a, T, C>
where
    T: ElementType + HashValue,
    C: ElementComparer<T>,
{
    pub fn new(array: &'a Array<T>, comparer: &'a C, capacity: usize) -> Self {
        TypedDistinctSet {
            array,
            comparer,
            table: RawTable::with_capacity(capacity),
            null_retained: false,
        }
    }

    /// Number of elements retained, including the null.
    pub fn len(&self) -> usize {
        self.table.len() + usize::from(self.null_retained)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert_value(&mut self, idx: usize, value: &T) -> Result<bool> {
        let hash = value.hash_one();

        let array = self.array;
        let comparer = self.comparer;
        let mut failure: Option<(usize, DbError)> = None;

        let found = self.table.find(hash, |&(entry_hash, entry_idx)| {
            if entry_hash != hash {
                return false;
            }
            match comparer.is_distinct_from(array.value(entry_idx), Some(value)) {
                Ok(distinct) => !distinct,
                Err(e) => {
                    failure = Some((entry_idx, e));
                    // Stop probing.
                    true
                }
            }
        });

        if let Some((entry_idx, e)) = failure {
            return Err(
                DbError::with_source("Failed to compare array elements", Box::new(e))
                    .with_field("left_idx", entry_idx)
                    .with_field("right_idx", idx),
            );
        }

        if found.is_some() {
            return Ok(false);
        }

        self.table.insert(hash, (hash, idx), |&(hash, _)| hash);

        Ok(true)
    }
}

impl<T, C> DistinctSet for TypedDistinctSet<'_, T, C>
where
    T: ElementType + HashValue,
    C: ElementComparer<T>,
{
    fn insert(&mut self, idx: usize) -> Result<bool> {
        let array = self.array;
        match array.value(idx) {
            Some(value) => self.insert_value(idx, value),
            None => {
                if self.null_retained {
                    Ok(false)
                } else {
                    self.null_retained = true;
                    Ok(true)
                }
            }
        }
    }

    fn insert_non_null(&mut self, idx: usize) -> Result<bool> {
        let array = self.array;
        self.insert_value(idx, array.physical_value(idx))
    }
}
