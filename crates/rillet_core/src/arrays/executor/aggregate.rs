//! Vectorized aggregate executors.
use std::fmt::Debug;

use rillet_error::{DbError, OptionExt, Result};

use crate::arrays::array::{Array, ArrayBuilder};
use crate::arrays::datatype::ElementType;

/// State for a single group's aggregate.
///
/// An example state for SUM would be a struct that takes a running sum from
/// values provided in `update`.
pub trait AggregateState: Default + Debug + Send {
    type Output: ElementType;

    /// Merge other state into this state.
    ///
    /// Merging must be associative and commutative, partial states may be
    /// merged in any order.
    fn merge(&mut self, other: &mut Self) -> Result<()>;

    /// Produce a single value from the state, None if the output is NULL.
    fn finalize(&mut self) -> Result<Option<Self::Output>>;
}

/// Updates an aggregate state with a single row of input.
pub trait AggregateInput<Input>: AggregateState {
    fn update(&mut self, input: Input) -> Result<()>;
}

/// Create default states for `num_groups` groups.
///
/// The index of a state is the group's id.
pub fn new_states<S: AggregateState>(num_groups: usize) -> Vec<S> {
    (0..num_groups).map(|_| S::default()).collect()
}

fn check_input_len(name: &'static str, got: usize, expected: usize) -> Result<()> {
    if got != expected {
        return Err(DbError::new("Aggregate input lengths differ")
            .with_field("input", name)
            .with_field("expected", expected)
            .with_field("got", got));
    }
    Ok(())
}

fn state_for_row<'a, S>(states: &'a mut [S], mapping: &[usize], row: usize) -> Result<&'a mut S> {
    let num_states = states.len();
    states.get_mut(mapping[row]).ok_or_else(|| {
        DbError::new("Row mapped to missing state")
            .with_field("row", row)
            .with_field("state", mapping[row])
            .with_field("num_states", num_states)
    })
}

#[derive(Debug, Clone, Copy)]
pub struct StateUpdater;

impl StateUpdater {
    /// Update states with `(condition, value)` rows.
    ///
    /// `mapping` maps each row to the index of the state it updates.
    ///
    /// A NULL condition counts as false. A row with a NULL value is skipped.
    pub fn update_binary<T, S>(
        conditions: &Array<bool>,
        values: &Array<T>,
        mapping: &[usize],
        states: &mut [S],
    ) -> Result<()>
    where
        T: ElementType + Copy,
        S: AggregateInput<(bool, T)>,
    {
        check_input_len("values", values.len(), conditions.len())?;
        check_input_len("mapping", mapping.len(), conditions.len())?;

        for row in 0..conditions.len() {
            let cond = conditions.value(row).copied().unwrap_or(false);
            let Some(&value) = values.value(row) else {
                continue;
            };
            state_for_row(states, mapping, row)?.update((cond, value))?;
        }

        Ok(())
    }

    /// Update states with `(condition, value, default)` rows.
    ///
    /// A NULL condition counts as false. Every row is applied. If the addend
    /// chosen by the condition is NULL, the additive identity is used instead.
    pub fn update_ternary<T, S>(
        conditions: &Array<bool>,
        values: &Array<T>,
        defaults: &Array<T>,
        mapping: &[usize],
        states: &mut [S],
    ) -> Result<()>
    where
        T: ElementType + Copy,
        S: AggregateInput<(bool, T, T)>,
    {
        check_input_len("values", values.len(), conditions.len())?;
        check_input_len("defaults", defaults.len(), conditions.len())?;
        check_input_len("mapping", mapping.len(), conditions.len())?;

        for row in 0..conditions.len() {
            let cond = conditions.value(row).copied().unwrap_or(false);
            let value = values.value(row).copied().unwrap_or_default();
            let default = defaults.value(row).copied().unwrap_or_default();
            state_for_row(states, mapping, row)?.update((cond, value, default))?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StateCombiner;

impl StateCombiner {
    /// Combine states, merging states from `consume` into `targets`.
    ///
    /// `mapping` provides a mapping of consume states to the target index. The
    /// 'n'th state in `consume` corresponds to the 'n'th value `mapping`. With the value
    /// in mapping being the index of the target state.
    pub fn combine<S>(consume: Vec<S>, mapping: &[usize], targets: &mut [S]) -> Result<()>
    where
        S: AggregateState,
    {
        check_input_len("mapping", mapping.len(), consume.len())?;

        for (&target_idx, mut consume_state) in mapping.iter().zip(consume) {
            let target = targets
                .get_mut(target_idx)
                .required("target state for combine")?;
            target.merge(&mut consume_state)?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StateFinalizer;

impl StateFinalizer {
    /// Finalize all states into an array, one value per state.
    pub fn finalize<S>(states: &mut [S]) -> Result<Array<S::Output>>
    where
        S: AggregateState,
    {
        let mut builder = ArrayBuilder::with_capacity(states.len());
        for state in states {
            match state.finalize()? {
                Some(v) => builder.push_value(v),
                None => builder.push_null(),
            }
        }

        Ok(builder.finish())
    }
}
