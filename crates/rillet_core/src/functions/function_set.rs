use std::fmt;

use rillet_error::{DbError, Result};

use super::aggregate::RawAggregateFunction;
use super::documentation::Documentation;
use super::scalar::RawScalarFunction;
use crate::arrays::datatype::DataType;

/// A named group of aggregate functions, one per signature.
#[derive(Debug, Clone, Copy)]
pub struct AggregateFunctionSet {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub doc: Option<&'static Documentation>,
    pub functions: &'static [RawAggregateFunction],
}

impl AggregateFunctionSet {
    /// Return if `name` is the set's name or one of its aliases.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name == name || self.aliases.contains(&name)
    }

    /// Find the function whose signature exactly matches `inputs`.
    pub fn find_exact(&self, inputs: &[DataType]) -> Option<&'static RawAggregateFunction> {
        self.functions
            .iter()
            .find(|func| func.signature().exact_match(inputs))
    }

    /// Like `find_exact`, but errors if no function matches.
    pub fn try_find_exact(&self, inputs: &[DataType]) -> Result<&'static RawAggregateFunction> {
        self.find_exact(inputs)
            .ok_or_else(|| no_function_error(self.name, inputs))
    }
}

/// A named group of scalar functions, one per signature.
#[derive(Debug, Clone, Copy)]
pub struct ScalarFunctionSet {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub doc: Option<&'static Documentation>,
    pub functions: &'static [RawScalarFunction],
}

impl ScalarFunctionSet {
    pub fn matches_name(&self, name: &str) -> bool {
        self.name == name || self.aliases.contains(&name)
    }

    pub fn find_exact(&self, inputs: &[DataType]) -> Option<&'static RawScalarFunction> {
        self.functions
            .iter()
            .find(|func| func.signature().exact_match(inputs))
    }

    pub fn try_find_exact(&self, inputs: &[DataType]) -> Result<&'static RawScalarFunction> {
        self.find_exact(inputs)
            .ok_or_else(|| no_function_error(self.name, inputs))
    }
}

struct DisplayInputs<'a>(&'a [DataType]);

impl fmt::Display for DisplayInputs<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (idx, datatype) in self.0.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{datatype}")?;
        }
        write!(f, ")")
    }
}

fn no_function_error(name: &str, inputs: &[DataType]) -> DbError {
    DbError::new(format!("No function matches '{name}'"))
        .with_field("inputs", DisplayInputs(inputs))
}
