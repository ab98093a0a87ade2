//! # Materialization
//!
//! Turns the derived instances of a [`VirtualModifierState`] into host shape
//! operations, diffed against the shapes emitted for the same source shape
//! last time so the host only touches what changed. Updates never change a
//! shape's kind; a position whose kind changed is deleted and created anew.
//!
//! Records always carry `rotation = 0` and the unscaled top-left of the
//! instance; the intended rotation and scale travel in
//! `meta.targetRotation/targetScaleX/targetScaleY` for the host to apply
//! around the shape's center.

use serde::{Deserialize, Serialize};
use shapemod_core::{ModifierError, ShapeId};
use shapemod_settings::EngineSettings;

use crate::boolean::{BooleanExecutor, BooleanGeometry, BooleanPlan};
use crate::cache::{MaterializedEntry, ModifierCaches};
use crate::geometry::{Affine2, Point};
use crate::host::ShapeHost;
use crate::model::{
    GroupContext, ShapeKind, ShapeMeta, ShapeProps, ShapeRecord, ShapeStyle, ShapeUpdate,
    VirtualInstance, VirtualModifierState,
};

/// Operations for the host to apply
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterializationDiff {
    pub create: Vec<ShapeRecord>,
    pub update: Vec<ShapeUpdate>,
    pub delete: Vec<ShapeId>,
}

impl MaterializationDiff {
    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.update.is_empty() && self.delete.is_empty()
    }
}

pub struct Materializer<'a> {
    settings: &'a EngineSettings,
    caches: &'a ModifierCaches,
    host: &'a dyn ShapeHost,
    group: Option<&'a GroupContext>,
}

impl<'a> Materializer<'a> {
    pub fn new(
        settings: &'a EngineSettings,
        caches: &'a ModifierCaches,
        host: &'a dyn ShapeHost,
    ) -> Self {
        Self {
            settings,
            caches,
            host,
            group: None,
        }
    }

    pub fn with_group(mut self, group: Option<&'a GroupContext>) -> Self {
        self.group = group;
        self
    }

    pub fn materialize(
        &self,
        state: &VirtualModifierState,
    ) -> Result<MaterializationDiff, ModifierError> {
        let source_id = state.source_shape_id().clone();
        let previous = self.caches.materialized.get(&source_id);

        let (diff, shapes) = if state.has_boolean_result() {
            self.replace_all(state, previous)?
        } else {
            self.diff_ordinal(state, previous)?
        };
        self.caches.materialized.insert(source_id.clone(), shapes);

        tracing::debug!(
            shape = %source_id,
            create = diff.create.len(),
            update = diff.update.len(),
            delete = diff.delete.len(),
            "materialized"
        );
        Ok(diff)
    }

    /// Position `i` reuses the shape emitted at position `i` last time when
    /// it is a clone of the same kind; otherwise that shape is replaced.
    fn diff_ordinal(
        &self,
        state: &VirtualModifierState,
        previous: Vec<MaterializedEntry>,
    ) -> Result<(MaterializationDiff, Vec<MaterializedEntry>), ModifierError> {
        let mut diff = MaterializationDiff::default();
        let mut shapes = Vec::new();
        let mut previous = previous.into_iter();

        for (index, instance) in state.derived_instances().enumerate() {
            let record = self.clone_record(state, instance, index)?;
            match previous.next() {
                Some(entry) if entry.accepts(&record) => {
                    shapes.push(MaterializedEntry::new(entry.id.clone(), record.kind));
                    diff.update.push(ShapeUpdate::from_record(entry.id, record));
                }
                stale => {
                    if let Some(entry) = stale {
                        diff.delete.push(entry.id);
                    }
                    let id = self.host.create_shape_id();
                    shapes.push(MaterializedEntry::new(id.clone(), record.kind));
                    diff.create.push(ShapeRecord { id, ..record });
                }
            }
        }

        diff.delete.extend(previous.map(|entry| entry.id));
        Ok((diff, shapes))
    }

    /// Boolean results replace every previously emitted shape.
    fn replace_all(
        &self,
        state: &VirtualModifierState,
        previous: Vec<MaterializedEntry>,
    ) -> Result<(MaterializationDiff, Vec<MaterializedEntry>), ModifierError> {
        let executor =
            BooleanExecutor::new(self.settings, self.caches, self.host).with_group(self.group);
        let mut diff = MaterializationDiff {
            delete: previous.into_iter().map(|entry| entry.id).collect(),
            ..MaterializationDiff::default()
        };
        let mut shapes = Vec::new();
        let mut consumed = Vec::new();

        for (index, instance) in state.derived_instances().enumerate() {
            let record = match instance.boolean_plan() {
                Some(plan) => {
                    let geometry = executor.execute(plan, state)?;
                    self.consumed_keys(&executor, plan, state, &mut consumed)?;
                    match geometry {
                        Some(geometry) => {
                            let style = self.shared_style(&executor, plan, state)?;
                            self.boolean_record(state, instance, plan, &geometry, style, index)?
                        }
                        None => {
                            tracing::warn!(
                                shape = %state.original_shape.id,
                                operation = %plan.operation,
                                "boolean produced no geometry, nothing to create"
                            );
                            continue;
                        }
                    }
                }
                None => self.clone_record(state, instance, index)?,
            };
            let id = self.host.create_shape_id();
            shapes.push(if record.meta.boolean_result {
                MaterializedEntry::boolean_result(id.clone())
            } else {
                MaterializedEntry::new(id.clone(), record.kind)
            });
            diff.create.push(ShapeRecord { id, ..record });
        }

        for key in &consumed {
            self.caches.storage.remove(key);
        }
        Ok((diff, shapes))
    }

    /// Storage keys of `plan` and the nested plans among its inputs
    fn consumed_keys(
        &self,
        executor: &BooleanExecutor<'_>,
        plan: &BooleanPlan,
        state: &VirtualModifierState,
        keys: &mut Vec<String>,
    ) -> Result<(), ModifierError> {
        if keys.contains(&plan.storage_key) {
            return Ok(());
        }
        keys.push(plan.storage_key.clone());
        for input in executor.inputs(plan, state)?.iter() {
            if let Some(nested) = input.boolean_plan() {
                self.consumed_keys(executor, nested, state, keys)?;
            }
        }
        Ok(())
    }

    fn clone_record(
        &self,
        state: &VirtualModifierState,
        instance: &VirtualInstance,
        index: usize,
    ) -> Result<ShapeRecord, ModifierError> {
        let shape = self.resolve_shape(state, &instance.source_shape_id)?;
        let (w, h) = self.host.local_size(shape);
        let top_left = self.top_left(state, instance, w, h)?;

        Ok(ShapeRecord {
            id: String::new(),
            kind: shape.kind,
            x: top_left.x,
            y: top_left.y,
            rotation: 0.0,
            props: shape.props.clone(),
            meta: self.derived_meta(state, instance, index, false),
            parent_id: shape.parent_id.clone(),
        })
    }

    /// Path shape sized to the collective bounds of the boolean inputs.
    fn boolean_record(
        &self,
        state: &VirtualModifierState,
        instance: &VirtualInstance,
        plan: &BooleanPlan,
        geometry: &BooleanGeometry,
        style: ShapeStyle,
        index: usize,
    ) -> Result<ShapeRecord, ModifierError> {
        let bounds = plan.collective_bounds;
        let (w, h) = (bounds.width(), bounds.height());
        let top_left = self.top_left(state, instance, w, h)?;
        let to_local = Affine2::translation(-bounds.min_x, -bounds.min_y);

        let paths = geometry
            .rings()
            .map(|ring| ring.iter().map(|p| to_local.transform_point(*p)).collect())
            .collect();

        Ok(ShapeRecord {
            id: String::new(),
            kind: ShapeKind::Path,
            x: top_left.x,
            y: top_left.y,
            rotation: 0.0,
            props: ShapeProps {
                w: Some(w),
                h: Some(h),
                paths,
                style,
                ..ShapeProps::default()
            },
            meta: self.derived_meta(state, instance, index, true),
            parent_id: state.original_shape.parent_id.clone(),
        })
    }

    fn top_left(
        &self,
        state: &VirtualModifierState,
        instance: &VirtualInstance,
        w: f64,
        h: f64,
    ) -> Result<Point, ModifierError> {
        let top_left = instance.center() - Point::new(w / 2.0, h / 2.0);
        if !instance.transform.is_finite() || !top_left.is_finite() {
            return Err(ModifierError::Materialization {
                shape_id: state.original_shape.id.clone(),
                reason: format!("instance {} has a non-finite transform", instance.id),
            });
        }
        Ok(top_left)
    }

    fn derived_meta(
        &self,
        state: &VirtualModifierState,
        instance: &VirtualInstance,
        index: usize,
        boolean_result: bool,
    ) -> ShapeMeta {
        ShapeMeta {
            source_shape_id: Some(state.original_shape.id.clone()),
            modifier_index: Some(index),
            target_rotation: Some(instance.rotation()),
            target_scale_x: Some(instance.scale_x()),
            target_scale_y: Some(instance.scale_y()),
            boolean_result,
        }
    }

    /// Style fields every boolean input shape agrees on
    fn shared_style(
        &self,
        executor: &BooleanExecutor<'_>,
        plan: &BooleanPlan,
        state: &VirtualModifierState,
    ) -> Result<ShapeStyle, ModifierError> {
        let inputs = executor.inputs(plan, state)?;
        let mut styles = Vec::with_capacity(inputs.len());
        for input in inputs.iter() {
            styles.push(&executor.resolve_shape(plan, &input.source_shape_id, state)?.props.style);
        }
        Ok(ShapeStyle::shared(styles))
    }

    fn resolve_shape<'s>(
        &'s self,
        state: &'s VirtualModifierState,
        shape_id: &str,
    ) -> Result<&'s ShapeRecord, ModifierError> {
        if state.original_shape.id == shape_id {
            return Ok(&state.original_shape);
        }
        self.group
            .and_then(|g| g.shape(shape_id))
            .ok_or_else(|| ModifierError::Materialization {
                shape_id: state.original_shape.id.clone(),
                reason: format!("source shape {shape_id} not found"),
            })
    }
}
