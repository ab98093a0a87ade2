//! # Transform Composer
//!
//! Folds a shape's enabled modifiers, in `order`, over a state that starts
//! as the single untransformed source instance, then materializes the
//! result.
//!
//! Failures are contained at the modifier boundary and handled according
//! to the configured [`RecoveryStrategy`]; only `Abort` hands the error
//! back to the caller.

use shapemod_core::{ModifierError, ProcessorResult, ShapeId};
use shapemod_settings::{EngineSettings, RecoveryStrategy};

use crate::boolean::BooleanProcessor;
use crate::cache::ModifierCaches;
use crate::context::ProcessContext;
use crate::host::ShapeHost;
use crate::materialize::{MaterializationDiff, Materializer};
use crate::model::{
    AppliedModifier, FailedModifier, GroupContext, Modifier, ModifierSettings, ShapeRecord,
    VirtualInstance, VirtualModifierState,
};
use crate::perf::ModifierTimer;
use crate::processors::{
    CircularArrayProcessor, GridArrayProcessor, LinearArrayProcessor, MirrorProcessor,
    ModifierProcessor,
};

/// Output of one processor call
struct Step {
    instances: Vec<VirtualInstance>,
    retired: Vec<VirtualInstance>,
}

impl From<Vec<VirtualInstance>> for Step {
    fn from(instances: Vec<VirtualInstance>) -> Self {
        Self {
            instances,
            retired: Vec::new(),
        }
    }
}

pub struct TransformComposer<'a> {
    settings: &'a EngineSettings,
    caches: &'a ModifierCaches,
}

impl<'a> TransformComposer<'a> {
    pub fn new(settings: &'a EngineSettings, caches: &'a ModifierCaches) -> Self {
        Self { settings, caches }
    }

    /// Runs the enabled modifiers of `modifiers` over `shape`.
    ///
    /// Disabled modifiers are skipped entirely; ties in `order` keep their
    /// position in `modifiers`.
    pub fn process_modifiers(
        &self,
        shape: &ShapeRecord,
        modifiers: &[Modifier],
        group: Option<&GroupContext>,
    ) -> Result<VirtualModifierState, ModifierError> {
        let mut stack: Vec<&Modifier> = modifiers.iter().filter(|m| m.enabled).collect();
        stack.sort_by_key(|m| m.order);

        let recovery = self.settings.processing.recovery;
        let mut state = VirtualModifierState::initial(shape);

        for (position, modifier) in stack.into_iter().enumerate() {
            let generation_level = position as u32 + 1;
            let kind = modifier.kind();
            let span = tracing::debug_span!(
                "modifier",
                id = %modifier.id,
                kind = %kind,
                generation = generation_level,
                shape = %shape.id
            );
            let _enter = span.enter();

            let ctx = ProcessContext {
                original_shape: shape,
                group,
                generation_level,
                modifier_id: &modifier.id,
                settings: self.settings,
                caches: self.caches,
            };
            let timer = ModifierTimer::start(
                &modifier.id,
                kind,
                generation_level,
                state.virtual_instances.len(),
            );

            let mut result = Self::apply_modifier(&state.virtual_instances, &modifier.settings, &ctx);
            if result.is_err() && recovery == RecoveryStrategy::RetryOnce {
                tracing::debug!("modifier failed, retrying once");
                result = Self::apply_modifier(&state.virtual_instances, &modifier.settings, &ctx);
            }

            match result {
                Ok(step) => {
                    state.metadata.retired.extend(step.retired);
                    state.virtual_instances = step.instances;
                    state.metadata.applied.push(AppliedModifier {
                        modifier_id: modifier.id.clone(),
                        kind,
                        generation_level,
                        instances_out: state.virtual_instances.len(),
                    });
                }
                Err(source) => {
                    let error = ModifierError::Processing {
                        modifier_id: modifier.id.clone(),
                        modifier_type: kind.to_string(),
                        shape_id: shape.id.clone(),
                        source,
                    };
                    if recovery == RecoveryStrategy::Abort {
                        tracing::error!(
                            modifier_type = %kind,
                            shape = %shape.id,
                            error = %error,
                            "modifier failed, aborting stack"
                        );
                        return Err(error);
                    }

                    tracing::warn!(
                        modifier_type = %kind,
                        shape = %shape.id,
                        error = %error,
                        recovery = %recovery,
                        "modifier failed, recovering"
                    );
                    if recovery == RecoveryStrategy::EmptyResult {
                        state.virtual_instances.clear();
                    }
                    state.metadata.failures.push(FailedModifier {
                        modifier_id: modifier.id.clone(),
                        kind,
                        generation_level,
                        error: error.to_string(),
                        recovery,
                    });
                }
            }

            state
                .metadata
                .timings
                .push(timer.finish(state.virtual_instances.len()));
        }

        Ok(state)
    }

    fn apply_modifier(
        instances: &[VirtualInstance],
        settings: &ModifierSettings,
        ctx: &ProcessContext<'_>,
    ) -> ProcessorResult<Step> {
        match settings {
            ModifierSettings::LinearArray(s) => {
                LinearArrayProcessor::apply(instances, s, ctx).map(Step::from)
            }
            ModifierSettings::CircularArray(s) => {
                CircularArrayProcessor::apply(instances, s, ctx).map(Step::from)
            }
            ModifierSettings::GridArray(s) => {
                GridArrayProcessor::apply(instances, s, ctx).map(Step::from)
            }
            ModifierSettings::Mirror(s) => MirrorProcessor::apply(instances, s, ctx).map(Step::from),
            ModifierSettings::Boolean(s) => {
                let outcome = BooleanProcessor::plan(instances, s, ctx)?;
                Ok(Step {
                    instances: outcome.result,
                    retired: outcome.retired,
                })
            }
        }
    }

    /// Diff of the state's derived instances against what was materialized
    /// for the same source shape before.
    pub fn materialize(
        &self,
        state: &VirtualModifierState,
        host: &dyn ShapeHost,
        group: Option<&GroupContext>,
    ) -> Result<MaterializationDiff, ModifierError> {
        Materializer::new(self.settings, self.caches, host)
            .with_group(group)
            .materialize(state)
    }

    /// `process_modifiers` followed by `materialize`
    pub fn evaluate(
        &self,
        shape: &ShapeRecord,
        modifiers: &[Modifier],
        group: Option<&GroupContext>,
        host: &dyn ShapeHost,
    ) -> shapemod_core::Result<MaterializationDiff> {
        let state = self.process_modifiers(shape, modifiers, group)?;
        Ok(self.materialize(&state, host, group)?)
    }

    /// Forgets the shapes materialized for `source_shape_id`, returning their
    /// ids.
    pub fn forget(&self, source_shape_id: &str) -> Vec<ShapeId> {
        self.caches
            .materialized
            .remove(source_shape_id)
            .unwrap_or_default()
    }
}
