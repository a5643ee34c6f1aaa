use std::sync::Arc;

use rillet_error::{DbError, Result};

use crate::arrays::array::{Array, ArrayData};
use crate::arrays::compare::{DistinctValue, ElementComparer, IsDistinctFrom};
use crate::arrays::datatype::{DataType, DataTypeId, ElementType};
use crate::arrays::distinct::{PrimitiveDistinctSet, PrimitiveElement, TypedDistinctSet, distinct_scan};
use crate::arrays::executor::hash::HashValue;
use crate::config::function::FunctionConfig;
use crate::functions::Signature;
use crate::functions::documentation::{Category, Documentation, Example};
use crate::functions::function_set::ScalarFunctionSet;
use crate::functions::scalar::{RawScalarFunction, ScalarFunction};

pub const FUNCTION_SET_ARRAY_DISTINCT: ScalarFunctionSet = ScalarFunctionSet {
    name: "array_distinct",
    aliases: &["list_distinct"],
    doc: Some(&Documentation {
        category: Category::List,
        description: r#"
Removes duplicate elements from an array, keeping the first occurrence of each
element in order. At most one NULL is kept. NaN is considered equal to NaN."#,
        arguments: &["array"],
        example: Some(Example {
            example: "array_distinct([1, 2, 2, 3, NULL, NULL])",
            output: "[1, 2, 3, NULL]",
        }),
    }),
    functions: &[RawScalarFunction::new(
        &Signature::new(&[DataTypeId::Any], DataTypeId::Any),
        &ArrayDistinct,
    )],
};

/// How duplicates are detected for an element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistinctStrategy {
    /// Hash fingerprints confirmed with an element comparer.
    Comparer,
    /// Exact bit patterns, no comparer involved.
    BitFingerprint,
}

impl DistinctStrategy {
    /// Pick the strategy for deduplicating elements of `datatype`.
    ///
    /// Only exact integer types can use bit fingerprints. Everything else
    /// falls back to the comparer.
    pub fn for_datatype(datatype: DataType, config: &FunctionConfig) -> Self {
        if config.enable_primitive_distinct && datatype.is_exact_integer() {
            DistinctStrategy::BitFingerprint
        } else {
            DistinctStrategy::Comparer
        }
    }
}

fn comparer_error(err: DbError, left_idx: usize, right_idx: usize) -> DbError {
    DbError::with_source("Failed to compare array elements", Box::new(err))
        .with_field("left_idx", left_idx)
        .with_field("right_idx", right_idx)
}

/// Removes duplicates from arrays using an element comparer.
#[derive(Debug, Clone)]
pub struct DistinctExecutor<C> {
    comparer: C,
    min_capacity: usize,
}

impl<C> DistinctExecutor<C> {
    pub const fn new(comparer: C) -> Self {
        DistinctExecutor {
            comparer,
            min_capacity: 0,
        }
    }

    /// Reserve at least `capacity` entries in the distinct set.
    pub const fn with_min_capacity(mut self, capacity: usize) -> Self {
        self.min_capacity = capacity;
        self
    }

    /// Return an array with only the first occurrence of every element.
    ///
    /// The input array is returned if it has no duplicates.
    pub fn execute<T>(&self, array: &Arc<Array<T>>) -> Result<Arc<Array<T>>>
    where
        T: ElementType + HashValue,
        C: ElementComparer<T>,
    {
        match array.len() {
            0 | 1 => Ok(array.clone()),
            2 => {
                let distinct = self
                    .comparer
                    .is_distinct_from(array.value(0), array.value(1))
                    .map_err(|e| comparer_error(e, 0, 1))?;
                if distinct {
                    Ok(array.clone())
                } else {
                    tracing::trace!("pair not distinct");
                    Ok(Arc::new(array.single_value_array(0)))
                }
            }
            len => {
                let mut set =
                    TypedDistinctSet::new(array, &self.comparer, len.max(self.min_capacity));
                distinct_scan(array, &mut set)
            }
        }
    }
}

/// Removes duplicates from integer arrays using bit fingerprints.
///
/// Produces the same output as [`DistinctExecutor`] with the default
/// comparer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimitiveDistinctExecutor {
    min_capacity: usize,
}

impl PrimitiveDistinctExecutor {
    pub const fn new() -> Self {
        PrimitiveDistinctExecutor { min_capacity: 0 }
    }

    pub const fn with_min_capacity(mut self, capacity: usize) -> Self {
        self.min_capacity = capacity;
        self
    }

    pub fn execute<T>(&self, array: &Arc<Array<T>>) -> Result<Arc<Array<T>>>
    where
        T: PrimitiveElement,
    {
        match array.len() {
            0 | 1 => Ok(array.clone()),
            2 => {
                let first = array.value(0).map(|v| v.bit_fingerprint());
                let second = array.value(1).map(|v| v.bit_fingerprint());
                if first != second {
                    Ok(array.clone())
                } else {
                    tracing::trace!("pair not distinct");
                    Ok(Arc::new(array.single_value_array(0)))
                }
            }
            len => {
                let mut set = PrimitiveDistinctSet::new(array, len.max(self.min_capacity));
                distinct_scan(array, &mut set)
            }
        }
    }
}

/// `array_distinct` over any supported element type.
#[derive(Debug, Clone, Copy)]
pub struct ArrayDistinct;

impl ArrayDistinct {
    /// Deduplicate a type-erased array, picking the strategy from its data
    /// type and `config`.
    pub fn execute_array(&self, config: &FunctionConfig, input: &ArrayData) -> Result<ArrayData> {
        let strategy = DistinctStrategy::for_datatype(input.datatype(), config);
        let capacity = config.distinct_initial_capacity;

        tracing::trace!(datatype = %input.datatype(), len = input.len(), ?strategy, "array_distinct");

        Ok(match input {
            ArrayData::Boolean(a) => ArrayData::Boolean(distinct_with_comparer(a, capacity)?),
            ArrayData::Int8(a) => ArrayData::Int8(distinct_integers(a, strategy, capacity)?),
            ArrayData::Int16(a) => ArrayData::Int16(distinct_integers(a, strategy, capacity)?),
            ArrayData::Int32(a) => ArrayData::Int32(distinct_integers(a, strategy, capacity)?),
            ArrayData::Int64(a) => ArrayData::Int64(distinct_integers(a, strategy, capacity)?),
            ArrayData::UInt8(a) => ArrayData::UInt8(distinct_integers(a, strategy, capacity)?),
            ArrayData::UInt16(a) => ArrayData::UInt16(distinct_integers(a, strategy, capacity)?),
            ArrayData::UInt32(a) => ArrayData::UInt32(distinct_integers(a, strategy, capacity)?),
            ArrayData::UInt64(a) => ArrayData::UInt64(distinct_integers(a, strategy, capacity)?),
            ArrayData::Float32(a) => ArrayData::Float32(distinct_with_comparer(a, capacity)?),
            ArrayData::Float64(a) => ArrayData::Float64(distinct_with_comparer(a, capacity)?),
            ArrayData::Utf8(a) => ArrayData::Utf8(distinct_with_comparer(a, capacity)?),
        })
    }
}

impl ScalarFunction for ArrayDistinct {
    fn execute(&self, config: &FunctionConfig, inputs: &[ArrayData]) -> Result<ArrayData> {
        match inputs {
            [input] => self.execute_array(config, input),
            other => Err(DbError::new("array_distinct expects a single input")
                .with_field("got", other.len())),
        }
    }
}

fn distinct_with_comparer<T>(array: &Arc<Array<T>>, capacity: usize) -> Result<Arc<Array<T>>>
where
    T: ElementType + HashValue + DistinctValue,
{
    DistinctExecutor::new(IsDistinctFrom)
        .with_min_capacity(capacity)
        .execute(array)
}

fn distinct_integers<T>(
    array: &Arc<Array<T>>,
    strategy: DistinctStrategy,
    capacity: usize,
) -> Result<Arc<Array<T>>>
where
    T: PrimitiveElement + HashValue + DistinctValue,
{
    match strategy {
        DistinctStrategy::BitFingerprint => PrimitiveDistinctExecutor::new()
            .with_min_capacity(capacity)
            .execute(array),
        DistinctStrategy::Comparer => distinct_with_comparer(array, capacity),
    }
}
