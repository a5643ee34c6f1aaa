use std::marker::PhantomData;

use num_traits::WrappingAdd;
use rillet_error::{DbError, Result};

use crate::arrays::array::ArrayData;
use crate::arrays::datatype::{DataTypeId, ElementType};
use crate::arrays::executor::aggregate::{
    AggregateInput,
    AggregateState,
    StateCombiner,
    StateFinalizer,
    StateUpdater,
    new_states,
};
use crate::functions::Signature;
use crate::functions::aggregate::{AggregateFunction, AggregatePartition, RawAggregateFunction};
use crate::functions::documentation::{Category, Documentation, Example};
use crate::functions::function_set::AggregateFunctionSet;

pub const FUNCTION_SET_SUM_IF: AggregateFunctionSet = AggregateFunctionSet {
    name: "sum_if",
    aliases: &[],
    doc: Some(&Documentation {
        category: Category::Aggregate,
        description: r#"
Sums `value` over rows where `condition` is true. With a `default`, rows where
`condition` is false contribute `default` instead.

Without a `default`, returns NULL if `condition` was never true. With a
`default`, returns NULL only when there were no input rows. A NULL condition is
treated as false. Integer sums wrap on overflow."#,
        arguments: &["condition", "value", "default"],
        example: Some(Example {
            example: "sum_if(x > 2, x)",
            output: "7",
        }),
    }),
    functions: &[
        RawAggregateFunction::new(
            &Signature::new(&[DataTypeId::Boolean, DataTypeId::Int64], DataTypeId::Int64),
            &SumIf::<NullableSumState<i64>>::new(),
        ),
        RawAggregateFunction::new(
            &Signature::new(
                &[DataTypeId::Boolean, DataTypeId::Int64, DataTypeId::Int64],
                DataTypeId::Int64,
            ),
            &SumIf::<NullableSumState<i64>>::new(),
        ),
        RawAggregateFunction::new(
            &Signature::new(
                &[DataTypeId::Boolean, DataTypeId::Float32],
                DataTypeId::Float32,
            ),
            &SumIf::<NullableSumState<f32>>::new(),
        ),
        RawAggregateFunction::new(
            &Signature::new(
                &[DataTypeId::Boolean, DataTypeId::Float32, DataTypeId::Float32],
                DataTypeId::Float32,
            ),
            &SumIf::<NullableSumState<f32>>::new(),
        ),
        RawAggregateFunction::new(
            &Signature::new(
                &[DataTypeId::Boolean, DataTypeId::Float64],
                DataTypeId::Float64,
            ),
            &SumIf::<NullableSumState<f64>>::new(),
        ),
        RawAggregateFunction::new(
            &Signature::new(
                &[DataTypeId::Boolean, DataTypeId::Float64, DataTypeId::Float64],
                DataTypeId::Float64,
            ),
            &SumIf::<NullableSumState<f64>>::new(),
        ),
    ],
};

pub const FUNCTION_SET_SUM_IF_NON_NULL: AggregateFunctionSet = AggregateFunctionSet {
    name: "sum_if_non_null",
    aliases: &[],
    doc: Some(&Documentation {
        category: Category::Aggregate,
        description: "Like `sum_if`, but never returns NULL. Returns 0 if `condition` was never true.",
        arguments: &["condition", "value", "default"],
        example: Some(Example {
            example: "sum_if_non_null(false, x)",
            output: "0",
        }),
    }),
    functions: &[
        RawAggregateFunction::new(
            &Signature::new(
                &[DataTypeId::Boolean, DataTypeId::Float64],
                DataTypeId::Float64,
            ),
            &SumIf::<SumState<f64>>::new(),
        ),
        RawAggregateFunction::new(
            &Signature::new(
                &[DataTypeId::Boolean, DataTypeId::Float64, DataTypeId::Float64],
                DataTypeId::Float64,
            ),
            &SumIf::<SumState<f64>>::new(),
        ),
    ],
};

/// Values that can be summed.
///
/// `Default` provides the additive identity.
pub trait SumValue: ElementType + Copy {
    fn sum(self, other: Self) -> Self;
}

macro_rules! impl_sum_value_wrapping {
    ($typ:ty) => {
        impl SumValue for $typ {
            #[inline]
            fn sum(self, other: Self) -> Self {
                WrappingAdd::wrapping_add(&self, &other)
            }
        }
    };
}

impl_sum_value_wrapping!(i8);
impl_sum_value_wrapping!(i16);
impl_sum_value_wrapping!(i32);
impl_sum_value_wrapping!(i64);
impl_sum_value_wrapping!(u8);
impl_sum_value_wrapping!(u16);
impl_sum_value_wrapping!(u32);
impl_sum_value_wrapping!(u64);

impl SumValue for f32 {
    #[inline]
    fn sum(self, other: Self) -> Self {
        self + other
    }
}

impl SumValue for f64 {
    #[inline]
    fn sum(self, other: Self) -> Self {
        self + other
    }
}

/// Running sum that starts out NULL.
///
/// The state becomes non-null once a value has been added to it. While null,
/// `sum` holds the additive identity.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct NullableSumState<T> {
    sum: T,
    valid: bool,
}

impl<T> NullableSumState<T>
where
    T: SumValue,
{
    /// Create a non-null state holding `sum`.
    pub fn with_sum(sum: T) -> Self {
        NullableSumState { sum, valid: true }
    }

    pub fn is_null(&self) -> bool {
        !self.valid
    }

    /// Add `value` if `cond` holds. A false condition leaves the state as is.
    pub fn input(&mut self, cond: bool, value: T) {
        if cond {
            self.sum = self.sum.sum(value);
            self.valid = true;
        }
    }

    /// Add `value` if `cond` holds, otherwise add `default`.
    ///
    /// The state is always non-null afterwards.
    pub fn input_with_default(&mut self, cond: bool, value: T, default: T) {
        let addend = if cond { value } else { default };
        self.sum = self.sum.sum(addend);
        self.valid = true;
    }

    /// Merge `other` into this state.
    pub fn combine(&mut self, other: &Self) {
        match (self.valid, other.valid) {
            (_, false) => (),
            (false, true) => *self = *other,
            (true, true) => self.sum = self.sum.sum(other.sum),
        }
    }

    pub fn output(&self) -> Option<T> {
        self.valid.then_some(self.sum)
    }
}

impl<T> AggregateState for NullableSumState<T>
where
    T: SumValue,
{
    type Output = T;

    fn merge(&mut self, other: &mut Self) -> Result<()> {
        self.combine(other);
        Ok(())
    }

    fn finalize(&mut self) -> Result<Option<T>> {
        Ok(self.output())
    }
}

impl<T> AggregateInput<(bool, T)> for NullableSumState<T>
where
    T: SumValue,
{
    fn update(&mut self, (cond, value): (bool, T)) -> Result<()> {
        self.input(cond, value);
        Ok(())
    }
}

impl<T> AggregateInput<(bool, T, T)> for NullableSumState<T>
where
    T: SumValue,
{
    fn update(&mut self, (cond, value, default): (bool, T, T)) -> Result<()> {
        self.input_with_default(cond, value, default);
        Ok(())
    }
}

/// Running sum starting at the additive identity, never NULL.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SumState<T> {
    sum: T,
}

impl<T> SumState<T>
where
    T: SumValue,
{
    pub fn with_sum(sum: T) -> Self {
        SumState { sum }
    }

    pub fn input(&mut self, cond: bool, value: T) {
        if cond {
            self.sum = self.sum.sum(value);
        }
    }

    pub fn input_with_default(&mut self, cond: bool, value: T, default: T) {
        self.sum = self.sum.sum(if cond { value } else { default });
    }

    pub fn combine(&mut self, other: &Self) {
        self.sum = self.sum.sum(other.sum);
    }

    pub fn output(&self) -> T {
        self.sum
    }
}

impl<T> AggregateState for SumState<T>
where
    T: SumValue,
{
    type Output = T;

    fn merge(&mut self, other: &mut Self) -> Result<()> {
        self.combine(other);
        Ok(())
    }

    fn finalize(&mut self) -> Result<Option<T>> {
        Ok(Some(self.output()))
    }
}

impl<T> AggregateInput<(bool, T)> for SumState<T>
where
    T: SumValue,
{
    fn update(&mut self, (cond, value): (bool, T)) -> Result<()> {
        self.input(cond, value);
        Ok(())
    }
}

impl<T> AggregateInput<(bool, T, T)> for SumState<T>
where
    T: SumValue,
{
    fn update(&mut self, (cond, value, default): (bool, T, T)) -> Result<()> {
        self.input_with_default(cond, value, default);
        Ok(())
    }
}

/// Conditional sum driving group states of type `S`.
#[derive(Debug, Clone, Copy)]
pub struct SumIf<S> {
    _s: PhantomData<fn() -> S>,
}

impl<S> SumIf<S> {
    pub const fn new() -> Self {
        SumIf { _s: PhantomData }
    }
}

impl<S, T> AggregateFunction for SumIf<S>
where
    S: AggregateState<Output = T> + AggregateInput<(bool, T)> + AggregateInput<(bool, T, T)>,
    S: 'static,
    T: SumValue,
{
    fn aggregate(&self, partitions: &[AggregatePartition], num_groups: usize) -> Result<ArrayData> {
        let mut states = new_states::<S>(num_groups);
        // Partial states map one to one onto the final states.
        let combine_mapping: Vec<usize> = (0..num_groups).collect();

        for (partition_idx, partition) in partitions.iter().enumerate() {
            let mut partial = new_states::<S>(num_groups);

            match partition.inputs.as_slice() {
                [conditions, values] => StateUpdater::update_binary::<T, S>(
                    conditions.try_as_typed::<bool>()?,
                    values.try_as_typed::<T>()?,
                    &partition.mapping,
                    &mut partial,
                )?,
                [conditions, values, defaults] => StateUpdater::update_ternary::<T, S>(
                    conditions.try_as_typed::<bool>()?,
                    values.try_as_typed::<T>()?,
                    defaults.try_as_typed::<T>()?,
                    &partition.mapping,
                    &mut partial,
                )?,
                other => {
                    return Err(DbError::new("sum_if expects 2 or 3 inputs")
                        .with_field("got", other.len()));
                }
            }

            tracing::trace!(%partition_idx, rows = partition.num_rows(), "combining sum_if partition");
            StateCombiner::combine(partial, &combine_mapping, &mut states)?;
        }

        let out = StateFinalizer::finalize(&mut states)?;
        Ok(out.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arrays::array::Array;
    use crate::arrays::datatype::DataType;
    use crate::arrays::testutil::assert_array_data_eq;

    fn nullable_over(rows: &[(bool, i64)]) -> NullableSumState<i64> {
        let mut state = NullableSumState::default();
        for &(cond, value) in rows {
            state.input(cond, value);
        }
        state
    }

    #[test]
    fn sum_if_some_true() {
        let state = nullable_over(&[(true, 1), (false, 2), (true, 3), (false, 4)]);
        assert_eq!(Some(4), state.output());
    }

    #[test]
    fn sum_if_never_true_is_null() {
        let state = nullable_over(&[(false, 1), (false, 2)]);
        assert!(state.is_null());
        assert_eq!(None, state.output());
    }

    #[test]
    fn sum_if_with_default() {
        let mut state = NullableSumState::<i64>::default();
        state.input_with_default(true, 1, 10);
        state.input_with_default(false, 2, 10);
        assert_eq!(Some(11), state.output());
    }

    #[test]
    fn sum_if_with_default_all_false_not_null() {
        let mut state = NullableSumState::<i64>::default();
        state.input_with_default(false, 1, 0);
        assert_eq!(Some(0), state.output());
    }

    #[test]
    fn combine_null_either_side() {
        let five = NullableSumState::with_sum(5_i64);

        let mut left = NullableSumState::default();
        left.combine(&five);
        assert_eq!(Some(5), left.output());

        let mut right = five;
        right.combine(&NullableSumState::default());
        assert_eq!(Some(5), right.output());

        let mut both = NullableSumState::<i64>::default();
        both.combine(&NullableSumState::default());
        assert_eq!(None, both.output());
    }

    #[test]
    fn combine_both_non_null() {
        let mut state = NullableSumState::with_sum(5_i64);
        state.combine(&NullableSumState::with_sum(-7));
        assert_eq!(Some(-2), state.output());
    }

    #[test]
    fn integer_overflow_wraps() {
        let mut state = NullableSumState::with_sum(i64::MAX);
        state.input(true, 1);
        assert_eq!(Some(i64::MIN), state.output());

        let mut state = SumState::with_sum(i64::MIN);
        state.combine(&SumState::with_sum(-1));
        assert_eq!(i64::MAX, state.output());
    }

    #[test]
    fn float_plain_addition() {
        let mut state = NullableSumState::<f64>::default();
        state.input(true, 0.1);
        state.input(true, 0.2);
        assert_eq!(Some(0.1 + 0.2), state.output());
    }

    #[test]
    fn non_null_never_true_is_identity() {
        let mut state = SumState::<f64>::default();
        state.input(false, 3.5);
        assert_eq!(0.0, state.output());
    }

    #[test]
    fn non_null_with_default_always_adds() {
        let mut state = SumState::<f64>::default();
        state.input_with_default(true, 1.5, 10.0);
        state.input_with_default(false, 1.5, 10.0);
        assert_eq!(11.5, state.output());
    }

    fn find(set: &AggregateFunctionSet, inputs: &[DataType]) -> &'static RawAggregateFunction {
        set.find_exact(inputs).unwrap()
    }

    #[test]
    fn aggregate_two_partitions_two_groups() {
        let func = find(&FUNCTION_SET_SUM_IF, &[DataType::Boolean, DataType::Int64]);

        let partitions = [
            AggregatePartition {
                inputs: vec![
                    Array::from(vec![true, false, true]).into(),
                    Array::from(vec![1_i64, 2, 3]).into(),
                ],
                mapping: vec![0, 1, 0],
            },
            AggregatePartition {
                inputs: vec![
                    Array::from(vec![false, true]).into(),
                    Array::from(vec![4_i64, 5]).into(),
                ],
                mapping: vec![1, 0],
            },
        ];

        let out = func.aggregate(&partitions, 2).unwrap();
        let expected: ArrayData = Array::from_iter([Some(9_i64), None]).into();
        assert_array_data_eq(&expected, &out);
    }

    #[test]
    fn aggregate_with_default_and_nulls() {
        let func = find(
            &FUNCTION_SET_SUM_IF,
            &[DataType::Boolean, DataType::Float64, DataType::Float64],
        );

        let partitions = [AggregatePartition::ungrouped(vec![
            Array::from_iter([Some(true), None, Some(false)]).into(),
            Array::from_iter([Some(1.0_f64), Some(2.0), None]).into(),
            Array::from_iter([Some(10.0_f64), Some(20.0), Some(30.0)]).into(),
        ])];

        let out = func.aggregate(&partitions, 1).unwrap();
        // NULL condition picks the default.
        let expected: ArrayData = Array::from(vec![51.0_f64]).into();
        assert_array_data_eq(&expected, &out);
    }

    #[test]
    fn aggregate_null_value_skipped() {
        let func = find(&FUNCTION_SET_SUM_IF, &[DataType::Boolean, DataType::Float32]);

        let partitions = [AggregatePartition::ungrouped(vec![
            Array::from(vec![true]).into(),
            Array::from_iter([None::<f32>]).into(),
        ])];

        let out = func.aggregate(&partitions, 1).unwrap();
        let expected: ArrayData = Array::from_iter([None::<f32>]).into();
        assert_array_data_eq(&expected, &out);
    }

    #[test]
    fn aggregate_non_null_variant() {
        let func = find(
            &FUNCTION_SET_SUM_IF_NON_NULL,
            &[DataType::Boolean, DataType::Float64],
        );

        let partitions = [AggregatePartition::ungrouped(vec![
            Array::from(vec![false, false]).into(),
            Array::from(vec![1.0_f64, 2.0]).into(),
        ])];

        let out = func.aggregate(&partitions, 1).unwrap();
        let expected: ArrayData = Array::from(vec![0.0_f64]).into();
        assert_array_data_eq(&expected, &out);
    }

    #[test]
    fn aggregate_no_partitions() {
        let func = find(&FUNCTION_SET_SUM_IF, &[DataType::Boolean, DataType::Int64]);
        let out = func.aggregate(&[], 1).unwrap();
        let expected: ArrayData = Array::from_iter([None::<i64>]).into();
        assert_array_data_eq(&expected, &out);
    }

    #[test]
    fn aggregate_wrong_input_type() {
        let func = find(&FUNCTION_SET_SUM_IF, &[DataType::Boolean, DataType::Int64]);

        let partitions = [AggregatePartition::ungrouped(vec![
            Array::from(vec![true]).into(),
            Array::from(vec![1.0_f64]).into(),
        ])];

        func.aggregate(&partitions, 1).unwrap_err();
    }

    #[test]
    fn aggregate_wrong_input_count() {
        let func = find(&FUNCTION_SET_SUM_IF, &[DataType::Boolean, DataType::Int64]);

        let partitions = [AggregatePartition::ungrouped(vec![Array::from(vec![true]).into()])];

        func.aggregate(&partitions, 1).unwrap_err();
    }

    #[test]
    fn no_signature_for_utf8() {
        FUNCTION_SET_SUM_IF
            .try_find_exact(&[DataType::Boolean, DataType::Utf8])
            .unwrap_err();
    }
}
