//! # Cost estimates
//!
//! Work estimates used to choose between equivalent operations. These are heuristics: the
//! constants below are placeholders that have not been measured, and can be recalibrated through
//! `CostModel` without touching the dispatch code.
use enum_map::{enum_map, EnumMap};

use crate::operator::TagKind;

/// Estimated amount of work, roughly the number of floating point operations.
pub type Cost = usize;

/// Cost reported by operations whose operands can't be combined.
pub const INCOMPATIBLE: Cost = Cost::MAX;

/// Fixed cost per qualification step, added on top of the work a check does on the values.
#[derive(Clone, Debug, PartialEq)]
pub struct CostModel {
    qualification: EnumMap<TagKind, Cost>,
}

impl CostModel {
    /// Fixed cost of the check a tag adds to the checks of its ancestors.
    pub fn qualification(&self, kind: TagKind) -> Cost {
        self.qualification[kind]
    }

    /// Replace the fixed cost of one check.
    pub fn with_qualification(mut self, kind: TagKind, cost: Cost) -> Self {
        self.qualification[kind] = cost;
        self
    }
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            qualification: enum_map! {
                TagKind::General => 0,
                _ => 1,
            },
        }
    }
}

/// Add costs, staying at `INCOMPATIBLE` once it is reached.
pub fn total(costs: impl IntoIterator<Item=Cost>) -> Cost {
    costs.into_iter().fold(0, Cost::saturating_add)
}
