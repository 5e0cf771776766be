//! Primitive shapes of the stack and their CPU meshes.
//!
//! `primitives` builds indexed triangle meshes, `mesh` holds the vertex
//! layout shared with the GPU, and `dispatcher` picks a generator for a
//! [`Primitive`].

pub mod dispatcher;
pub mod mesh;
pub mod primitives;

use std::f32::consts::{FRAC_PI_2, PI};
use std::fmt;

use glam::Quat;

/// Every object in the scene, stacked ones listed bottom to top.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeId {
    CylinderSmall,
    Sphere,
    CylinderMedium,
    Cube,
    Cone,
    Ground,
}

impl ShapeId {
    /// Stacked shapes in order from the ground upward.
    pub const STACK: [ShapeId; 5] = [
        ShapeId::CylinderSmall,
        ShapeId::Sphere,
        ShapeId::CylinderMedium,
        ShapeId::Cube,
        ShapeId::Cone,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ShapeId::CylinderSmall => "Cylinder Small",
            ShapeId::Sphere => "Sphere",
            ShapeId::CylinderMedium => "Cylinder Medium",
            ShapeId::Cube => "Cube",
            ShapeId::Cone => "Cone",
            ShapeId::Ground => "Ground",
        }
    }

    pub fn is_stacked(self) -> bool {
        self != ShapeId::Ground
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a primitive is turned before it is placed on the stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Upright,
    /// Rotated -90° about X: a cylinder rests on its rim, a plane lies flat.
    Lying,
    /// Rotated 180° about X: a cone points down.
    Inverted,
}

impl Orientation {
    pub fn rotation(self) -> Quat {
        match self {
            Orientation::Upright => Quat::IDENTITY,
            Orientation::Lying => Quat::from_rotation_x(-FRAC_PI_2),
            Orientation::Inverted => Quat::from_rotation_x(PI),
        }
    }
}

/// Dimensions of one renderable primitive, in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Primitive {
    Cylinder { radius: f32, height: f32 },
    Sphere { radius: f32 },
    Cube { size: f32 },
    /// The cone's height tracks its radius when resized through a parameter.
    Cone { radius: f32, height: f32 },
    Plane { width: f32, depth: f32 },
}

impl Primitive {
    /// The scalar a slider controls: radius for round shapes, edge length for
    /// the cube. Planes have no tunable dimension and report their width.
    pub fn dimension(&self) -> f32 {
        match *self {
            Primitive::Cylinder { radius, .. } => radius,
            Primitive::Sphere { radius } => radius,
            Primitive::Cube { size } => size,
            Primitive::Cone { radius, .. } => radius,
            Primitive::Plane { width, .. } => width,
        }
    }

    /// Copy of `self` resized to `value`. Planes are returned unchanged.
    pub fn with_dimension(self, value: f32) -> Self {
        match self {
            Primitive::Cylinder { height, .. } => Primitive::Cylinder { radius: value, height },
            Primitive::Sphere { .. } => Primitive::Sphere { radius: value },
            Primitive::Cube { .. } => Primitive::Cube { size: value },
            Primitive::Cone { .. } => Primitive::Cone { radius: value, height: value },
            plane @ Primitive::Plane { .. } => plane,
        }
    }

    /// Height the primitive occupies along world Y once turned by `orientation`.
    pub fn vertical_extent(&self, orientation: Orientation) -> f32 {
        match (*self, orientation) {
            (Primitive::Cylinder { radius, .. }, Orientation::Lying) => 2.0 * radius,
            (Primitive::Cylinder { height, .. }, _) => height,
            (Primitive::Sphere { radius }, _) => 2.0 * radius,
            (Primitive::Cube { size }, _) => size,
            (Primitive::Cone { radius, .. }, Orientation::Lying) => 2.0 * radius,
            (Primitive::Cone { height, .. }, _) => height,
            (Primitive::Plane { depth, .. }, Orientation::Upright | Orientation::Inverted) => depth,
            (Primitive::Plane { .. }, Orientation::Lying) => 0.0,
        }
    }
}
