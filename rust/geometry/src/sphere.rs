// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! UV sphere generator

use std::f64::consts::PI;

use nalgebra::{Point3, Vector3};

use crate::mesh::Mesh;

/// Sphere tessellation parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereSpec {
    pub radius: f64,
    /// Segments around the equator (at least 3)
    pub width_segments: usize,
    /// Segments from pole to pole (at least 2)
    pub height_segments: usize,
}

impl SphereSpec {
    pub fn new(radius: f64, width_segments: usize, height_segments: usize) -> Self {
        Self {
            radius,
            width_segments: width_segments.max(3),
            height_segments: height_segments.max(2),
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        (self.width_segments + 1) * (self.height_segments + 1)
    }

    /// The pole rows contribute one triangle per quad instead of two
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.width_segments * (2 * self.height_segments - 2)
    }
}

impl Default for SphereSpec {
    fn default() -> Self {
        Self::new(1.0, 32, 16)
    }
}

/// Append a sphere centred at `center`, offsetting its indices past the
/// vertices already in `mesh`
pub fn append_sphere(mesh: &mut Mesh, center: Point3<f64>, spec: &SphereSpec) {
    let ws = spec.width_segments.max(3);
    let hs = spec.height_segments.max(2);
    let start = mesh.vertex_count() as u32;
    let row = (ws + 1) as u32;

    for iy in 0..=hs {
        let v = iy as f64 / hs as f64;

        // Pole vertices sit halfway between their neighbours in u
        let u_offset = if iy == 0 {
            0.5 / ws as f64
        } else if iy == hs {
            -0.5 / ws as f64
        } else {
            0.0
        };

        for ix in 0..=ws {
            let u = ix as f64 / ws as f64;
            let offset = Vector3::new(
                -spec.radius * (u * 2.0 * PI).cos() * (v * PI).sin(),
                spec.radius * (v * PI).cos(),
                spec.radius * (u * 2.0 * PI).sin() * (v * PI).sin(),
            );
            let normal = offset.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::z);
            mesh.add_vertex(center + offset, normal, [u + u_offset, 1.0 - v]);
        }
    }

    let grid = |iy: usize, ix: usize| start + iy as u32 * row + ix as u32;
    for iy in 0..hs {
        for ix in 0..ws {
            let a = grid(iy, ix + 1);
            let b = grid(iy, ix);
            let c = grid(iy + 1, ix);
            let d = grid(iy + 1, ix + 1);

            if iy != 0 {
                mesh.add_triangle(a, b, d);
            }
            if iy != hs - 1 {
                mesh.add_triangle(b, c, d);
            }
        }
    }
}

/// Standalone sphere mesh
pub fn uv_sphere(center: Point3<f64>, spec: &SphereSpec) -> Mesh {
    let mut mesh = Mesh::with_capacity(spec.vertex_count(), spec.triangle_count() * 3);
    append_sphere(&mut mesh, center, spec);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_counts() {
        let spec = SphereSpec::new(2.0, 8, 4);
        let mesh = uv_sphere(Point3::origin(), &spec);
        assert_eq!(mesh.vertex_count(), spec.vertex_count());
        assert_eq!(mesh.triangle_count(), spec.triangle_count());
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_vertices_on_surface() {
        let center = Point3::new(10.0, -5.0, 3.0);
        let mesh = uv_sphere(center, &SphereSpec::new(2.0, 6, 3));
        for i in 0..mesh.vertex_count() {
            let p = mesh.position(i);
            let d = Vector3::new(p.x as f64 - center.x, p.y as f64 - center.y, p.z as f64 - center.z);
            assert_relative_eq!(d.norm(), 2.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_segment_minimums() {
        let spec = SphereSpec::new(1.0, 1, 1);
        assert_eq!(spec.width_segments, 3);
        assert_eq!(spec.height_segments, 2);
    }

    #[test]
    fn test_append_offsets_indices() {
        let spec = SphereSpec::new(1.0, 4, 2);
        let mut mesh = Mesh::new();
        append_sphere(&mut mesh, Point3::origin(), &spec);
        append_sphere(&mut mesh, Point3::new(5.0, 0.0, 0.0), &spec);
        assert_eq!(mesh.vertex_count(), 2 * spec.vertex_count());
        let min_second = mesh.indices[mesh.indices.len() / 2..].iter().min().copied();
        assert_eq!(min_second, Some(spec.vertex_count() as u32));
        assert!(mesh.validate().is_ok());
    }
}
