use ahash::RandomState;
use hashbrown::HashSet;
use rillet_error::Result;

use super::DistinctSet;
use crate::arrays::array::Array;
use crate::arrays::datatype::ElementType;
use crate::arrays::executor::hash::HASH_RANDOM_STATE;

/// Fixed width elements where bit identity is equivalent to not being
/// distinct.
///
/// Only implemented for integer types. Floats don't qualify since NaN
/// payloads and signed zeros break the equivalence.
pub trait PrimitiveElement: ElementType + Copy {
    /// The value's bit pattern, widened to 64 bits.
    ///
    /// Widening must be injective for the type.
    fn bit_fingerprint(self) -> u64;
}

macro_rules! impl_primitive_element {
    ($typ:ty) => {
        impl PrimitiveElement for $typ {
            #[inline]
            fn bit_fingerprint(self) -> u64 {
                self as u64
            }
        }
    };
}

impl_primitive_element!(i8);
impl_primitive_element!(i16);
impl_primitive_element!(i32);
impl_primitive_element!(i64);
impl_primitive_element!(u8);
impl_primitive_element!(u16);
impl_primitive_element!(u32);
impl_primitive_element!(u64);

/// Distinct set for primitive integer elements.
///
/// Stores bit fingerprints directly, no comparer is involved.
#[derive(Debug)]
pub struct PrimitiveDistinctSet<'a, T> {
    array: &'a Array<T>,
    set: HashSet<u64, RandomState>,
    null_retained: bool,
}

impl<'a, T> PrimitiveDistinctSet<'a, T>
where
    T: PrimitiveElement,
{
    pub fn new(array: &'a Array<T>, capacity: usize) -> Self {
        PrimitiveDistinctSet {
            array,
            set: HashSet::with_capacity_and_hasher(capacity, HASH_RANDOM_STATE),
            null_retained: false,
        }
    }

    /// Number of elements retained, including the null.
    pub fn len(&self) -> usize {
        self.set.len() + usize::from(self.null_retained)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> DistinctSet for PrimitiveDistinctSet<'_, T>
where
    T: PrimitiveElement,
{
    fn insert(&mut self, idx: usize) -> Result<bool> {
        match self.array.value(idx) {
            Some(&value) => Ok(self.set.insert(value.bit_fingerprint())),
            None => {
                let newly_retained = !self.null_retained;
                self.null_retained = true;
                Ok(newly_retained)
            }
        }
    }

    fn insert_non_null(&mut self, idx: usize) -> Result<bool> {
        let value = *self.array.physical_value(idx);
        Ok(self.set.insert(value.bit_fingerprint()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_values_distinct_from_large_unsigned() {
        let arr = Array::from(vec![-1_i8, 127, -128, -1]);
        let mut set = PrimitiveDistinctSet::new(&arr, 4);

        let got: Vec<_> = (0..arr.len())
            .map(|idx| set.insert_non_null(idx).unwrap())
            .collect();
        assert_eq!(vec![true, true, true, false], got);
    }

    #[test]
    fn nulls_tracked_by_flag() {
        let arr = Array::from_iter([None, Some(0_i64), None, Some(0)]);
        let mut set = PrimitiveDistinctSet::new(&arr, 4);

        let got: Vec<_> = (0..arr.len()).map(|idx| set.insert(idx).unwrap()).collect();
        assert_eq!(vec![true, true, false, false], got);
        assert_eq!(2, set.len());
    }
}
