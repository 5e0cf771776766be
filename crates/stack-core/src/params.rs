//! Slider parameters: one tunable scalar per stacked shape.

use std::fmt;

use crate::math::snap_to_step;
use crate::shapes::ShapeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamKey {
    CylinderSmallRadius,
    SphereRadius,
    CylinderMediumRadius,
    CubeSize,
    ConeRadius,
}

impl ParamKey {
    pub const ALL: [ParamKey; 5] = [
        ParamKey::CylinderSmallRadius,
        ParamKey::SphereRadius,
        ParamKey::CylinderMediumRadius,
        ParamKey::CubeSize,
        ParamKey::ConeRadius,
    ];

    /// Stable string id used by the panel and the JS API.
    pub fn id(self) -> &'static str {
        match self {
            ParamKey::CylinderSmallRadius => "cylinder_small.radius",
            ParamKey::SphereRadius => "sphere.radius",
            ParamKey::CylinderMediumRadius => "cylinder_medium.radius",
            ParamKey::CubeSize => "cube.size",
            ParamKey::ConeRadius => "cone.radius",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.id() == id)
    }

    /// The shape this parameter resizes.
    pub fn shape(self) -> ShapeId {
        match self {
            ParamKey::CylinderSmallRadius => ShapeId::CylinderSmall,
            ParamKey::SphereRadius => ShapeId::Sphere,
            ParamKey::CylinderMediumRadius => ShapeId::CylinderMedium,
            ParamKey::CubeSize => ShapeId::Cube,
            ParamKey::ConeRadius => ShapeId::Cone,
        }
    }

    pub fn spec(self) -> &'static ParamSpec {
        &PARAM_SPECS[self as usize]
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Slider declaration: range, step, labels and starting value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamSpec {
    pub key: ParamKey,
    pub folder: &'static str,
    pub label: &'static str,
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub initial: f32,
}

impl ParamSpec {
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp to `[min, max]` and snap to the nearest step, the way a range
    /// slider would report it. Non-finite input falls back to `initial`.
    pub fn sanitize(&self, value: f32) -> f32 {
        if !value.is_finite() {
            return self.initial;
        }
        let clamped = value.clamp(self.min, self.max);
        snap_to_step(clamped, self.min, self.step).clamp(self.min, self.max)
    }
}

/// Indexed by `ParamKey as usize`.
pub static PARAM_SPECS: [ParamSpec; 5] = [
    ParamSpec {
        key: ParamKey::CylinderSmallRadius,
        folder: "Cylinder Small",
        label: "Radius",
        min: 0.3,
        max: 0.6,
        step: 0.01,
        initial: 0.5,
    },
    ParamSpec {
        key: ParamKey::SphereRadius,
        folder: "Sphere",
        label: "Radius",
        min: 0.2,
        max: 0.31,
        step: 0.001,
        initial: 0.3,
    },
    ParamSpec {
        key: ParamKey::CylinderMediumRadius,
        folder: "Cylinder Medium",
        label: "Radius",
        min: 0.15,
        max: 0.6,
        step: 0.01,
        initial: 0.5,
    },
    ParamSpec {
        key: ParamKey::CubeSize,
        folder: "Cube",
        label: "Cube size",
        min: 0.15,
        max: 0.5,
        step: 0.01,
        initial: 0.25,
    },
    ParamSpec {
        key: ParamKey::ConeRadius,
        folder: "Cone",
        label: "Radius",
        min: 0.2,
        max: 0.3,
        step: 0.01,
        initial: 0.2,
    },
];

/// Current value of one parameter and the value it held before the last change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamState {
    pub value: f32,
    pub previous: f32,
}

impl ParamState {
    pub fn new(initial: f32) -> Self {
        Self {
            value: initial,
            previous: initial,
        }
    }

    /// Store `value` and return its signed difference from the old value.
    pub fn apply(&mut self, value: f32) -> f32 {
        let delta = value - self.value;
        self.previous = self.value;
        self.value = value;
        delta
    }
}

/// Per-shape parameter state owned by the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterSet {
    states: [ParamState; 5],
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            states: PARAM_SPECS.map(|spec| ParamState::new(spec.initial)),
        }
    }
}

impl ParameterSet {
    pub fn get(&self, key: ParamKey) -> f32 {
        self.states[key.index()].value
    }

    pub fn state(&self, key: ParamKey) -> &ParamState {
        &self.states[key.index()]
    }

    /// Record a new value and return the delta from the previous one.
    pub fn apply(&mut self, key: ParamKey, value: f32) -> f32 {
        self.states[key.index()].apply(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParamKey, f32)> + '_ {
        ParamKey::ALL.into_iter().map(move |key| (key, self.get(key)))
    }
}
