#![allow(dead_code)]

use shapemod_engine::geometry::Point;
use shapemod_engine::{ModifierCaches, ShapeHost, ShapeKind, ShapeRecord, TransformComposer};
use shapemod_settings::EngineSettings;
use std::cell::Cell;

pub const EPS: f64 = 1e-9;

/// Host handing out `derived:1`, `derived:2`, ...
#[derive(Default)]
pub struct SequentialHost {
    next: Cell<usize>,
}

impl ShapeHost for SequentialHost {
    fn create_shape_id(&self) -> String {
        let id = self.next.get() + 1;
        self.next.set(id);
        format!("derived:{id}")
    }
}

pub fn square(id: &str, x: f64, y: f64, size: f64) -> ShapeRecord {
    ShapeRecord::new(id, ShapeKind::Rectangle, x, y, size, size)
}

pub fn assert_point(actual: Point, expected: Point) {
    assert!(
        (actual.x - expected.x).abs() < 1e-6 && (actual.y - expected.y).abs() < 1e-6,
        "expected {expected:?}, got {actual:?}"
    );
}

pub struct Fixture {
    pub settings: EngineSettings,
    pub caches: ModifierCaches,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_settings(EngineSettings::default())
    }

    pub fn with_settings(settings: EngineSettings) -> Self {
        let caches = ModifierCaches::new(&settings);
        Self { settings, caches }
    }

    pub fn composer(&self) -> TransformComposer<'_> {
        TransformComposer::new(&self.settings, &self.caches)
    }
}
