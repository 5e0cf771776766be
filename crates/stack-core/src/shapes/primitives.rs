//! Indexed triangle meshes for the stack's primitives.
//!
//! Layouts follow the usual WebGL conventions: shapes are centred on the
//! origin, cylinders and cones stand along +Y, planes lie in XY facing +Z,
//! and triangles wind counter-clockwise when seen from outside.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use super::mesh::{MeshData, Vertex};

/// Open-ended tube plus caps. A zero radius at either end drops that cap, which
/// is how [`cone`] is built.
///
/// Vertex count: `2 * (radial + 1)` for the side plus `radial + 2` per cap.
pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> MeshData {
    let radial = radial_segments.max(3);
    let half_height = height * 0.5;
    let slope = if height > 0.0 {
        (radius_bottom - radius_top) / height
    } else {
        0.0
    };

    let mut mesh = MeshData::default();

    // Row 0 is the top ring, row 1 the bottom ring.
    for row in 0..=1 {
        let v = row as f32;
        let radius = v * (radius_bottom - radius_top) + radius_top;
        let y = -v * height + half_height;
        for x in 0..=radial {
            let theta = x as f32 / radial as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            mesh.vertices.push(Vertex::new(
                Vec3::new(radius * sin, y, radius * cos),
                Vec3::new(sin, slope, cos).normalize(),
            ));
        }
    }

    let row_len = radial + 1;
    for x in 0..radial {
        let a = x;
        let b = row_len + x;
        let c = row_len + x + 1;
        let d = x + 1;
        mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    if radius_top > 0.0 {
        mesh.extend(cap(radius_top, half_height, radial, true));
    }
    if radius_bottom > 0.0 {
        mesh.extend(cap(radius_bottom, -half_height, radial, false));
    }
    mesh
}

/// Disc at height `y`: one centre vertex followed by a closed ring.
fn cap(radius: f32, y: f32, radial: u32, top: bool) -> MeshData {
    let normal = if top { Vec3::Y } else { Vec3::NEG_Y };
    let mut mesh = MeshData::default();
    mesh.vertices.push(Vertex::new(Vec3::new(0.0, y, 0.0), normal));
    for x in 0..=radial {
        let theta = x as f32 / radial as f32 * TAU;
        let (sin, cos) = theta.sin_cos();
        mesh.vertices.push(Vertex::new(Vec3::new(radius * sin, y, radius * cos), normal));
    }
    for x in 0..radial {
        let i = 1 + x;
        if top {
            mesh.indices.extend_from_slice(&[i, i + 1, 0]);
        } else {
            mesh.indices.extend_from_slice(&[i + 1, i, 0]);
        }
    }
    mesh
}

/// Cone with its apex at `+height / 2` and base at `-height / 2`.
pub fn cone(radius: f32, height: f32, radial_segments: u32) -> MeshData {
    cylinder(0.0, radius, height, radial_segments)
}

/// UV sphere. Poles sit on the Y axis; the first and last bands are fans.
pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let w = width_segments.max(3);
    let h = height_segments.max(2);
    let mut mesh = MeshData::default();

    for iy in 0..=h {
        let v = iy as f32 / h as f32;
        let (sin_v, cos_v) = (v * PI).sin_cos();
        for ix in 0..=w {
            let u = ix as f32 / w as f32;
            let (sin_u, cos_u) = (u * TAU).sin_cos();
            let unit = Vec3::new(-cos_u * sin_v, cos_v, sin_u * sin_v);
            mesh.vertices.push(Vertex::new(unit * radius, unit));
        }
    }

    let row_len = w + 1;
    for iy in 0..h {
        for ix in 0..w {
            let a = iy * row_len + ix + 1;
            let b = iy * row_len + ix;
            let c = (iy + 1) * row_len + ix;
            let d = (iy + 1) * row_len + ix + 1;
            if iy != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != h - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    mesh
}

/// Axis-aligned box with separate vertices per face so normals stay flat.
pub fn cuboid(width: f32, height: f32, depth: f32) -> MeshData {
    // (normal, u, v) with u × v = normal, so the quad below winds outward.
    const FACES: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];
    const CORNERS: [(f32, f32); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

    let half = Vec3::new(width, height, depth) * 0.5;
    let mut mesh = MeshData::default();
    for (normal, u, v) in FACES {
        let base = mesh.vertices.len() as u32;
        for (su, sv) in CORNERS {
            let p = (normal + u * su + v * sv) * half;
            mesh.vertices.push(Vertex::new(p, normal));
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

/// Single quad in the XY plane facing +Z.
pub fn plane(width: f32, depth: f32) -> MeshData {
    let hw = width * 0.5;
    let hd = depth * 0.5;
    let vertices = [(-hw, -hd), (hw, -hd), (hw, hd), (-hw, hd)]
        .into_iter()
        .map(|(x, y)| Vertex::new(Vec3::new(x, y, 0.0), Vec3::Z))
        .collect();
    MeshData {
        vertices,
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}
