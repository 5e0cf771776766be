//! Selects the mesh generator for a [`Primitive`].

use crate::config::MeshResolution;
use crate::shapes::mesh::MeshData;
use crate::shapes::primitives::{cone, cuboid, cylinder, plane, sphere};
use crate::shapes::Primitive;

/// Build the mesh for `primitive` at the given tessellation.
pub fn mesh_for(primitive: &Primitive, resolution: &MeshResolution) -> MeshData {
    match *primitive {
        Primitive::Cylinder { radius, height } => {
            cylinder(radius, radius, height, resolution.radial_segments)
        }
        Primitive::Sphere { radius } => sphere(
            radius,
            resolution.sphere_width_segments,
            resolution.sphere_height_segments,
        ),
        Primitive::Cube { size } => cuboid(size, size, size),
        Primitive::Cone { radius, height } => cone(radius, height, resolution.radial_segments),
        Primitive::Plane { width, depth } => plane(width, depth),
    }
}
