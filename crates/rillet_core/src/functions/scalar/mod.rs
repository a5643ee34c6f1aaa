pub mod builtin;

use std::fmt::Debug;

use rillet_error::{DbError, Result};

use super::Signature;
use crate::arrays::array::ArrayData;
use crate::arrays::datatype::DataType;
use crate::config::function::FunctionConfig;

/// A scalar function implementation for a single signature.
pub trait ScalarFunction: Debug + Sync + Send + 'static {
    /// Execute the function on the inputs.
    ///
    /// Inputs are expected to match the signature the function was registered
    /// with.
    fn execute(&self, config: &FunctionConfig, inputs: &[ArrayData]) -> Result<ArrayData>;
}

/// A scalar function paired with the signature it implements.
#[derive(Debug, Clone, Copy)]
pub struct RawScalarFunction {
    signature: &'static Signature,
    function: &'static dyn ScalarFunction,
}

impl RawScalarFunction {
    pub const fn new(sig: &'static Signature, function: &'static dyn ScalarFunction) -> Self {
        RawScalarFunction {
            signature: sig,
            function,
        }
    }

    pub const fn signature(&self) -> &'static Signature {
        self.signature
    }

    pub fn execute(&self, config: &FunctionConfig, inputs: &[ArrayData]) -> Result<ArrayData> {
        let datatypes: Vec<DataType> = inputs.iter().map(|input| input.datatype()).collect();
        if !self.signature.exact_match(&datatypes) {
            return Err(DbError::new("Inputs do not match function signature")
                .with_field("num_inputs", inputs.len()));
        }

        self.function.execute(config, inputs)
    }
}
