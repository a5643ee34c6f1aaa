use std::fmt::Debug;
use std::sync::Arc;

use rillet_error::{DbError, Result};

use super::bitmap::Bitmap;
use super::datatype::{DataType, ElementType};

/// An ordered, fixed length sequence of possibly null values.
///
/// Arrays are immutable once built. Functions that may return their input
/// unchanged operate on `Arc<Array<T>>` so that doing so never copies.
#[derive(Debug, Clone, PartialEq)]
pub struct Array<T> {
    /// Validity bitmap.
    ///
    /// "True" values indicate the value at index is valid, "false" indicates
    /// null. None means all values are valid.
    validity: Option<Bitmap>,

    /// Underlying values. Values at null positions hold `T::default()`.
    values: Vec<T>,
}

impl<T> Array<T>
where
    T: ElementType,
{
    pub fn try_new(values: Vec<T>, validity: Option<Bitmap>) -> Result<Self> {
        if let Some(validity) = &validity {
            if validity.len() != values.len() {
                return Err(DbError::new("Validity length does not match values length")
                    .with_field("validity_len", validity.len())
                    .with_field("values_len", values.len()));
            }
        }

        Ok(Array { validity, values })
    }

    pub fn empty() -> Self {
        Array {
            validity: None,
            values: Vec::new(),
        }
    }

    pub const fn datatype(&self) -> DataType {
        T::DATATYPE
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check if the value at the given index is valid (not null).
    ///
    /// Panics if index is out of bounds.
    #[inline]
    pub fn is_valid(&self, idx: usize) -> bool {
        assert!(idx < self.values.len(), "index {idx} out of bounds");
        match &self.validity {
            Some(validity) => validity.value(idx),
            None => true,
        }
    }

    /// Get the logical value at the given index, None if the value is null.
    ///
    /// Panics if index is out of bounds.
    #[inline]
    pub fn value(&self, idx: usize) -> Option<&T> {
        if self.is_valid(idx) {
            Some(&self.values[idx])
        } else {
            None
        }
    }

    /// Get the physical value at the given index, ignoring validity.
    #[inline]
    pub fn physical_value(&self, idx: usize) -> &T {
        &self.values[idx]
    }

    /// If this array may contain nulls.
    ///
    /// Arrays without a validity bitmap never contain nulls and can skip
    /// per-element null checks.
    pub fn may_have_nulls(&self) -> bool {
        self.validity.is_some()
    }

    pub fn null_count(&self) -> usize {
        match &self.validity {
            Some(validity) => validity.len() - validity.count_trues(),
            None => 0,
        }
    }

    pub fn validity(&self) -> Option<&Bitmap> {
        self.validity.as_ref()
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Iterate over the logical values of the array.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Option<&T>> + '_ {
        (0..self.len()).map(|idx| self.value(idx))
    }

    /// Create a new array containing only the value at `idx`.
    pub fn single_value_array(&self, idx: usize) -> Self {
        let mut builder = ArrayBuilder::with_capacity(1);
        builder.push_from(self, idx);
        builder.finish()
    }
}

impl<T> From<Vec<T>> for Array<T> {
    fn from(values: Vec<T>) -> Self {
        Array {
            validity: None,
            values,
        }
    }
}

impl<A> FromIterator<Option<A>> for Array<A>
where
    A: ElementType,
{
    fn from_iter<T: IntoIterator<Item = Option<A>>>(iter: T) -> Self {
        let iter = iter.into_iter();
        let mut builder = ArrayBuilder::with_capacity(iter.size_hint().0);
        for item in iter {
            match item {
                Some(v) => builder.push_value(v),
                None => builder.push_null(),
            }
        }
        builder.finish()
    }
}

/// Incrementally builds an array.
///
/// The validity bitmap is only allocated once the first null is pushed.
#[derive(Debug)]
pub struct ArrayBuilder<T> {
    values: Vec<T>,
    validity: Option<Bitmap>,
}

impl<T> ArrayBuilder<T>
where
    T: ElementType,
{
    pub fn with_capacity(cap: usize) -> Self {
        ArrayBuilder {
            values: Vec::with_capacity(cap),
            validity: None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn push_value(&mut self, value: T) {
        self.values.push(value);
        if let Some(validity) = &mut self.validity {
            validity.push(true);
        }
    }

    pub fn push_null(&mut self) {
        let validity = self.validity.get_or_insert_with(|| {
            let mut validity = Bitmap::with_capacity(self.values.capacity());
            for _ in 0..self.values.len() {
                validity.push(true);
            }
            validity
        });
        validity.push(false);
        self.values.push(T::default());
    }

    /// Append the value (or null) at `idx` in `array` to this builder.
    pub fn push_from(&mut self, array: &Array<T>, idx: usize) {
        match array.value(idx) {
            Some(v) => self.push_value(v.clone()),
            None => self.push_null(),
        }
    }

    pub fn finish(self) -> Array<T> {
        Array {
            validity: self.validity,
            values: self.values,
        }
    }
}

/// Type-erased array.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    Boolean(Arc<Array<bool>>),
    Int8(Arc<Array<i8>>),
    Int16(Arc<Array<i16>>),
    Int32(Arc<Array<i32>>),
    Int64(Arc<Array<i64>>),
    UInt8(Arc<Array<u8>>),
    UInt16(Arc<Array<u16>>),
    UInt32(Arc<Array<u32>>),
    UInt64(Arc<Array<u64>>),
    Float32(Arc<Array<f32>>),
    Float64(Arc<Array<f64>>),
    Utf8(Arc<Array<String>>),
}

impl ArrayData {
    pub fn datatype(&self) -> DataType {
        match self {
            Self::Boolean(_) => DataType::Boolean,
            Self::Int8(_) => DataType::Int8,
            Self::Int16(_) => DataType::Int16,
            Self::Int32(_) => DataType::Int32,
            Self::Int64(_) => DataType::Int64,
            Self::UInt8(_) => DataType::UInt8,
            Self::UInt16(_) => DataType::UInt16,
            Self::UInt32(_) => DataType::UInt32,
            Self::UInt64(_) => DataType::UInt64,
            Self::Float32(_) => DataType::Float32,
            Self::Float64(_) => DataType::Float64,
            Self::Utf8(_) => DataType::Utf8,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Boolean(a) => a.len(),
            Self::Int8(a) => a.len(),
            Self::Int16(a) => a.len(),
            Self::Int32(a) => a.len(),
            Self::Int64(a) => a.len(),
            Self::UInt8(a) => a.len(),
            Self::UInt16(a) => a.len(),
            Self::UInt32(a) => a.len(),
            Self::UInt64(a) => a.len(),
            Self::Float32(a) => a.len(),
            Self::Float64(a) => a.len(),
            Self::Utf8(a) => a.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get a typed reference to the underlying array.
    pub fn try_as_typed<T: ElementType>(&self) -> Result<&Arc<Array<T>>> {
        T::try_from_array_data(self).ok_or_else(|| {
            DbError::new("Unexpected array type")
                .with_field("expected", T::DATATYPE)
                .with_field("got", self.datatype())
        })
    }

    /// Format the value at `idx` for display, "NULL" for nulls.
    pub fn format_value(&self, idx: usize) -> String {
        fn fmt<T: ElementType + ToString>(array: &Array<T>, idx: usize) -> String {
            match array.value(idx) {
                Some(v) => v.to_string(),
                None => "NULL".to_string(),
            }
        }

        match self {
            Self::Boolean(a) => fmt(a, idx),
            Self::Int8(a) => fmt(a, idx),
            Self::Int16(a) => fmt(a, idx),
            Self::Int32(a) => fmt(a, idx),
            Self::Int64(a) => fmt(a, idx),
            Self::UInt8(a) => fmt(a, idx),
            Self::UInt16(a) => fmt(a, idx),
            Self::UInt32(a) => fmt(a, idx),
            Self::UInt64(a) => fmt(a, idx),
            Self::Float32(a) => fmt(a, idx),
            Self::Float64(a) => fmt(a, idx),
            Self::Utf8(a) => fmt(a, idx),
        }
    }
}

impl<T> From<Array<T>> for ArrayData
where
    T: ElementType,
{
    fn from(array: Array<T>) -> Self {
        T::into_array_data(Arc::new(array))
    }
}
