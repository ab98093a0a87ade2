//! Per-modifier timing.

use serde::{Deserialize, Serialize};
use shapemod_core::ModifierId;
use std::time::Instant;

use crate::model::ModifierKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifierTiming {
    pub modifier_id: ModifierId,
    pub kind: ModifierKind,
    pub generation_level: u32,
    pub duration_us: u64,
    pub instances_in: usize,
    pub instances_out: usize,
}

/// Stopwatch around one processor call
#[derive(Debug)]
pub struct ModifierTimer {
    modifier_id: ModifierId,
    kind: ModifierKind,
    generation_level: u32,
    instances_in: usize,
    started_at: Instant,
}

impl ModifierTimer {
    pub fn start(
        modifier_id: &str,
        kind: ModifierKind,
        generation_level: u32,
        instances_in: usize,
    ) -> Self {
        Self {
            modifier_id: modifier_id.to_string(),
            kind,
            generation_level,
            instances_in,
            started_at: Instant::now(),
        }
    }

    pub fn finish(self, instances_out: usize) -> ModifierTiming {
        let duration_us = u64::try_from(self.started_at.elapsed().as_micros()).unwrap_or(u64::MAX);
        tracing::debug!(
            modifier = %self.modifier_id,
            kind = %self.kind,
            generation = self.generation_level,
            instances_in = self.instances_in,
            instances_out,
            duration_us,
            "modifier applied"
        );
        ModifierTiming {
            modifier_id: self.modifier_id,
            kind: self.kind,
            generation_level: self.generation_level,
            duration_us,
            instances_in: self.instances_in,
            instances_out,
        }
    }
}
