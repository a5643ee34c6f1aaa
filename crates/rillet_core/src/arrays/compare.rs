//! Element distinctness comparisons.
//!
//! Comparers implement SQL `IS DISTINCT FROM` semantics over two possibly
//! null values:
//!
//! - two nulls are not distinct
//! - a null and a non-null value are distinct
//! - two non-null values are distinct if their values differ
use std::fmt::Debug;
use std::marker::PhantomData;

use rillet_error::Result;

/// Strategy for deciding if two (possibly null) elements are distinct.
///
/// Comparers used alongside hash fingerprints (see
/// [`HashValue`](crate::arrays::executor::hash::HashValue)) must be
/// consistent with them: two values that are not distinct must hash the same.
pub trait ElementComparer<T: ?Sized>: Debug {
    /// Returns true if `left` IS DISTINCT FROM `right`.
    fn is_distinct_from(&self, left: Option<&T>, right: Option<&T>) -> Result<bool>;
}

impl<T, C> ElementComparer<T> for &C
where
    T: ?Sized,
    C: ElementComparer<T> + ?Sized,
{
    fn is_distinct_from(&self, left: Option<&T>, right: Option<&T>) -> Result<bool> {
        (**self).is_distinct_from(left, right)
    }
}

/// Value equality as seen by SQL `IS NOT DISTINCT FROM`.
pub trait DistinctValue {
    fn not_distinct(&self, other: &Self) -> bool;
}

macro_rules! impl_distinct_value_eq {
    ($typ:ty) => {
        impl DistinctValue for $typ {
            fn not_distinct(&self, other: &Self) -> bool {
                self == other
            }
        }
    };
}

impl_distinct_value_eq!(bool);
impl_distinct_value_eq!(i8);
impl_distinct_value_eq!(i16);
impl_distinct_value_eq!(i32);
impl_distinct_value_eq!(i64);
impl_distinct_value_eq!(u8);
impl_distinct_value_eq!(u16);
impl_distinct_value_eq!(u32);
impl_distinct_value_eq!(u64);
impl_distinct_value_eq!(str);
impl_distinct_value_eq!(String);

// NaN is not distinct from NaN, and -0.0 is not distinct from 0.0.

impl DistinctValue for f32 {
    fn not_distinct(&self, other: &Self) -> bool {
        self == other || (self.is_nan() && other.is_nan())
    }
}

impl DistinctValue for f64 {
    fn not_distinct(&self, other: &Self) -> bool {
        self == other || (self.is_nan() && other.is_nan())
    }
}

/// Default `IS DISTINCT FROM` comparer for a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IsDistinctFrom;

impl<T> ElementComparer<T> for IsDistinctFrom
where
    T: DistinctValue + ?Sized,
{
    fn is_distinct_from(&self, left: Option<&T>, right: Option<&T>) -> Result<bool> {
        Ok(match (left, right) {
            (Some(left), Some(right)) => !left.not_distinct(right),
            (Some(_), None) | (None, Some(_)) => true,
            (None, None) => false,
        })
    }
}

/// Comparer wrapping a function over two non-null values.
///
/// Null handling follows the standard rules, the function is only called when
/// both values are non-null.
pub struct FnComparer<T: ?Sized, F> {
    f: F,
    _t: PhantomData<fn(&T)>,
}

impl<T, F> FnComparer<T, F>
where
    T: ?Sized,
    F: Fn(&T, &T) -> Result<bool>,
{
    /// Create a new comparer where `f` returns true if the two values are
    /// distinct.
    ///
    /// `f` must agree with
    /// [`HashValue`](crate::arrays::executor::hash::HashValue): values that
    /// are not distinct must hash equal. Distinct sets only call the comparer
    /// for elements whose hashes match, so values `f` treats as equal but that
    /// hash differently are kept as separate elements.
    pub const fn new(f: F) -> Self {
        FnComparer { f, _t: PhantomData }
    }
}

impl<T: ?Sized, F> Debug for FnComparer<T, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnComparer").finish_non_exhaustive()
    }
}

impl<T, F> ElementComparer<T> for FnComparer<T, F>
where
    T: ?Sized,
    F: Fn(&T, &T) -> Result<bool>,
{
    fn is_distinct_from(&self, left: Option<&T>, right: Option<&T>) -> Result<bool> {
        match (left, right) {
            (Some(left), Some(right)) => (self.f)(left, right),
            (Some(_), None) | (None, Some(_)) => Ok(true),
            (None, None) => Ok(false),
        }
    }
}
