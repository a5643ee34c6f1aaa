pub mod builtin;

use std::fmt::Debug;

use rillet_error::{DbError, Result};

use super::Signature;
use crate::arrays::array::ArrayData;

/// Inputs to an aggregate from a single partition.
///
/// Each partition produces its own partial states which are then combined.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatePartition {
    /// Input columns, all of the same length.
    pub inputs: Vec<ArrayData>,
    /// Row to group mapping, one entry per row.
    pub mapping: Vec<usize>,
}

impl AggregatePartition {
    /// Create a partition where every row belongs to group 0.
    pub fn ungrouped(inputs: Vec<ArrayData>) -> Self {
        let num_rows = inputs.first().map(|input| input.len()).unwrap_or(0);
        AggregatePartition {
            inputs,
            mapping: vec![0; num_rows],
        }
    }

    pub fn num_rows(&self) -> usize {
        self.mapping.len()
    }
}

/// An aggregate function implementation for a single signature.
pub trait AggregateFunction: Debug + Sync + Send + 'static {
    /// Aggregate all partitions into `num_groups` output values.
    ///
    /// Partials states are produced per partition, then combined in the
    /// order the partitions are given.
    fn aggregate(&self, partitions: &[AggregatePartition], num_groups: usize) -> Result<ArrayData>;
}

/// An aggregate function paired with the signature it implements.
#[derive(Debug, Clone, Copy)]
pub struct RawAggregateFunction {
    signature: &'static Signature,
    function: &'static dyn AggregateFunction,
}

impl RawAggregateFunction {
    pub const fn new(sig: &'static Signature, function: &'static dyn AggregateFunction) -> Self {
        RawAggregateFunction {
            signature: sig,
            function,
        }
    }

    pub const fn signature(&self) -> &'static Signature {
        self.signature
    }

    pub fn aggregate(
        &self,
        partitions: &[AggregatePartition],
        num_groups: usize,
    ) -> Result<ArrayData> {
        for partition in partitions {
            if partition.inputs.len() != self.signature.positional_args.len() {
                return Err(DbError::new("Unexpected number of aggregate inputs")
                    .with_field("expected", self.signature.positional_args.len())
                    .with_field("got", partition.inputs.len()));
            }
        }

        self.function.aggregate(partitions, num_groups)
    }
}
