//! # Modifier Caches
//!
//! Host-owned caches shared by every evaluation that is handed the same
//! [`ModifierCaches`]:
//! - [`BooleanCache`]: computed boolean geometry keyed by content hash
//! - [`InstanceStorage`]: boolean inputs keyed by storage key
//! - [`MaterializedShapes`]: host shape ids previously emitted per source shape
//!
//! Each sits behind a `parking_lot` mutex, so one set of caches can serve
//! evaluations running on several threads.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use shapemod_core::{thread_safe, ShapeId, ThreadSafe};
use shapemod_settings::EngineSettings;
use std::collections::VecDeque;
use std::sync::Arc;

use crate::boolean::BooleanGeometry;
use crate::model::{ShapeKind, ShapeRecord, VirtualInstance};

/// Counters of a [`BooleanCache`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    /// Polygon computations stored through [`BooleanCache::insert`]
    pub computations: u64,
}

/// Map with first-in first-out eviction once `capacity` is reached
#[derive(Debug)]
struct Fifo<K, V> {
    entries: FxHashMap<K, V>,
    order: VecDeque<K>,
    capacity: usize,
}

impl<K: std::hash::Hash + Eq + Clone, V> Fifo<K, V> {
    fn new(capacity: usize) -> Self {
        Self {
            entries: FxHashMap::default(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    fn insert(&mut self, key: K, value: V) {
        if self.entries.insert(key.clone(), value).is_none() {
            self.order.push_back(key);
        }
        while self.entries.len() > self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        let value = self.entries.remove(key)?;
        self.order.retain(|k| k != key);
        Some(value)
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

#[derive(Debug)]
struct BooleanCacheState {
    geometry: Fifo<u64, Arc<BooleanGeometry>>,
    hits: u64,
    misses: u64,
    computations: u64,
}

/// Boolean geometry keyed by [`BooleanPlan::cache_key`](crate::boolean::BooleanPlan)
#[derive(Debug, Clone)]
pub struct BooleanCache {
    state: ThreadSafe<BooleanCacheState>,
}

impl BooleanCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            state: thread_safe(BooleanCacheState {
                geometry: Fifo::new(capacity),
                hits: 0,
                misses: 0,
                computations: 0,
            }),
        }
    }

    /// Looks up a result, counting the hit or miss.
    pub fn get(&self, key: u64) -> Option<Arc<BooleanGeometry>> {
        let mut state = self.state.lock();
        match state.geometry.entries.get(&key).cloned() {
            Some(geometry) => {
                state.hits += 1;
                Some(geometry)
            }
            None => {
                state.misses += 1;
                None
            }
        }
    }

    pub fn insert(&self, key: u64, geometry: Arc<BooleanGeometry>) {
        let mut state = self.state.lock();
        state.computations += 1;
        state.geometry.insert(key, geometry);
    }

    pub fn contains(&self, key: u64) -> bool {
        self.state.lock().geometry.entries.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.state.lock().geometry.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry; counters are kept.
    pub fn clear(&self) {
        self.state.lock().geometry.clear();
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        CacheStats {
            entries: state.geometry.entries.len(),
            hits: state.hits,
            misses: state.misses,
            computations: state.computations,
        }
    }
}

/// Inputs of boolean modifiers, kept until the result is materialized
#[derive(Debug, Clone)]
pub struct InstanceStorage {
    entries: ThreadSafe<Fifo<String, Arc<Vec<VirtualInstance>>>>,
}

impl InstanceStorage {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: thread_safe(Fifo::new(capacity)),
        }
    }

    pub fn insert(&self, key: impl Into<String>, instances: Vec<VirtualInstance>) {
        self.entries.lock().insert(key.into(), Arc::new(instances));
    }

    pub fn get(&self, key: &str) -> Option<Arc<Vec<VirtualInstance>>> {
        self.entries.lock().entries.get(key).cloned()
    }

    pub fn remove(&self, key: &str) -> Option<Arc<Vec<VirtualInstance>>> {
        self.entries.lock().remove(&key.to_string())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

/// A host shape emitted for a source shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializedEntry {
    pub id: ShapeId,
    pub kind: ShapeKind,
    /// Path shape carrying boolean geometry rather than a clone of a source
    pub boolean_result: bool,
}

impl MaterializedEntry {
    pub fn new(id: impl Into<ShapeId>, kind: ShapeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            boolean_result: false,
        }
    }

    pub fn boolean_result(id: impl Into<ShapeId>) -> Self {
        Self {
            id: id.into(),
            kind: ShapeKind::Path,
            boolean_result: true,
        }
    }

    /// Whether an update can turn this shape into `record` in place.
    pub fn accepts(&self, record: &ShapeRecord) -> bool {
        !self.boolean_result && !record.meta.boolean_result && self.kind == record.kind
    }
}

/// Host shapes emitted for each source shape, in ordinal position
#[derive(Debug, Clone, Default)]
pub struct MaterializedShapes {
    entries: ThreadSafe<FxHashMap<ShapeId, Vec<MaterializedEntry>>>,
}

impl MaterializedShapes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, source_shape_id: &str) -> Vec<MaterializedEntry> {
        self.entries
            .lock()
            .get(source_shape_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn ids(&self, source_shape_id: &str) -> Vec<ShapeId> {
        self.get(source_shape_id).into_iter().map(|e| e.id).collect()
    }

    pub fn insert(&self, source_shape_id: impl Into<ShapeId>, shapes: Vec<MaterializedEntry>) {
        let mut entries = self.entries.lock();
        let key = source_shape_id.into();
        if shapes.is_empty() {
            entries.remove(&key);
        } else {
            entries.insert(key, shapes);
        }
    }

    pub fn remove(&self, source_shape_id: &str) -> Option<Vec<ShapeId>> {
        self.entries
            .lock()
            .remove(source_shape_id)
            .map(|shapes| shapes.into_iter().map(|e| e.id).collect())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

/// The three caches an evaluation reads and writes
///
/// Cloning shares the underlying storage.
#[derive(Debug, Clone)]
pub struct ModifierCaches {
    pub boolean: BooleanCache,
    pub storage: InstanceStorage,
    pub materialized: MaterializedShapes,
}

impl ModifierCaches {
    pub fn new(settings: &EngineSettings) -> Self {
        Self {
            boolean: BooleanCache::new(settings.cache.boolean_capacity),
            storage: InstanceStorage::new(settings.cache.storage_capacity),
            materialized: MaterializedShapes::new(),
        }
    }

    /// Memory pressure or document reset: forget everything.
    pub fn clear_all(&self) {
        self.boolean.clear();
        self.storage.clear();
        self.materialized.clear();
        tracing::debug!("modifier caches cleared");
    }
}

impl Default for ModifierCaches {
    fn default() -> Self {
        Self::new(&EngineSettings::default())
    }
}
