pub mod list;

use crate::functions::function_set::ScalarFunctionSet;

/// All builtin scalar function sets.
pub const BUILTIN_SCALAR_FUNCTION_SETS: &[ScalarFunctionSet] =
    &[list::array_distinct::FUNCTION_SET_ARRAY_DISTINCT];

/// Find a builtin scalar function set by name or alias.
pub fn find_builtin_scalar(name: &str) -> Option<&'static ScalarFunctionSet> {
    BUILTIN_SCALAR_FUNCTION_SETS
        .iter()
        .find(|set| set.matches_name(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_by_alias() {
        let set = find_builtin_scalar("list_distinct").unwrap();
        assert_eq!("array_distinct", set.name);
        assert!(find_builtin_scalar("sum_if").is_none());
    }
}
