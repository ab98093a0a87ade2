use serde::{Deserialize, Serialize};

use crate::geometry::Bounds;
use crate::model::BooleanOperation;

/// What a boolean modifier asked for
///
/// Cheap to build; the polygon work happens when the plan is executed at
/// materialization time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooleanPlan {
    pub input_instance_ids: Vec<String>,
    pub operation: BooleanOperation,
    pub compute_on_materialize: bool,
    /// Content hash of the participants and the geometry settings
    pub cache_key: u64,
    /// Key of the inputs in `InstanceStorage`
    pub storage_key: String,
    pub boolean_group_id: String,
    pub collective_bounds: Bounds,
}
