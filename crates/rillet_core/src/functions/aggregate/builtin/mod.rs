pub mod sum_if;

use crate::functions::function_set::AggregateFunctionSet;

/// All builtin aggregate function sets.
pub const BUILTIN_AGGREGATE_FUNCTION_SETS: &[AggregateFunctionSet] = &[
    sum_if::FUNCTION_SET_SUM_IF,
    sum_if::FUNCTION_SET_SUM_IF_NON_NULL,
];

/// Find a builtin aggregate function set by name or alias.
pub fn find_builtin_aggregate(name: &str) -> Option<&'static AggregateFunctionSet> {
    BUILTIN_AGGREGATE_FUNCTION_SETS
        .iter()
        .find(|set| set.matches_name(name))
}
