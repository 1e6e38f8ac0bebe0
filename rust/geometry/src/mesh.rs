// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh data structures

use nalgebra::{Point3, Vector3};

use crate::colormap::Rgb;
use crate::error::{Error, Result};

/// Indexed triangle mesh, the buffer set handed to the drawing sink
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Vertex positions (x, y, z)
    pub positions: Vec<f32>,
    /// Vertex normals (nx, ny, nz)
    pub normals: Vec<f32>,
    /// Texture coordinates (u, v)
    pub uvs: Vec<f32>,
    /// Triangle indices (i0, i1, i2)
    pub indices: Vec<u32>,
    /// Per-vertex colours (r, g, b); empty when the mesh is not vertex-coloured
    pub colors: Vec<f32>,
}

/// Mesh holding the voxels of one scalar category
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryMesh {
    /// The category value every vertex of `mesh` carries
    pub value: f64,
    pub mesh: Mesh,
}

impl CategoryMesh {
    pub fn new(value: f64, mesh: Mesh) -> Self {
        Self { value, mesh }
    }
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            uvs: Vec::new(),
            indices: Vec::new(),
            colors: Vec::new(),
        }
    }

    /// Create a mesh with capacity
    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count * 3),
            normals: Vec::with_capacity(vertex_count * 3),
            uvs: Vec::with_capacity(vertex_count * 2),
            indices: Vec::with_capacity(index_count),
            colors: Vec::new(),
        }
    }

    /// Add a vertex with normal and texture coordinate
    #[inline]
    pub fn add_vertex(&mut self, position: Point3<f64>, normal: Vector3<f64>, uv: [f64; 2]) {
        self.positions.push(position.x as f32);
        self.positions.push(position.y as f32);
        self.positions.push(position.z as f32);

        self.normals.push(normal.x as f32);
        self.normals.push(normal.y as f32);
        self.normals.push(normal.z as f32);

        self.uvs.push(uv[0] as f32);
        self.uvs.push(uv[1] as f32);
    }

    /// Append one vertex colour
    #[inline]
    pub fn add_color(&mut self, color: Rgb) {
        self.colors.extend_from_slice(&color.to_f32());
    }

    /// Add a triangle
    #[inline]
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Merge another mesh into this one
    ///
    /// If only one side is vertex-coloured, the other side's vertices are
    /// filled with white so colours stay one per vertex.
    pub fn merge(&mut self, other: &Mesh) {
        if other.is_empty() {
            return;
        }

        let vertex_offset = self.vertex_count() as u32;
        let colored = self.has_colors() || other.has_colors();
        if colored && !self.has_colors() {
            self.colors = vec![1.0; self.positions.len()];
        }

        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.uvs.extend_from_slice(&other.uvs);
        self.indices
            .extend(other.indices.iter().map(|&i| i + vertex_offset));

        if colored {
            if other.has_colors() {
                self.colors.extend_from_slice(&other.colors);
            } else {
                self.colors.resize(self.positions.len(), 1.0);
            }
        }
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get triangle count
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn has_colors(&self) -> bool {
        !self.colors.is_empty()
    }

    /// Position of vertex `i`
    #[inline]
    pub fn position(&self, i: usize) -> Point3<f32> {
        Point3::new(
            self.positions[i * 3],
            self.positions[i * 3 + 1],
            self.positions[i * 3 + 2],
        )
    }

    /// Colour of vertex `i`, if the mesh is vertex-coloured
    #[inline]
    pub fn color(&self, i: usize) -> Option<[f32; 3]> {
        self.colors
            .get(i * 3..i * 3 + 3)
            .map(|c| [c[0], c[1], c[2]])
    }

    /// Calculate bounds (min, max)
    pub fn bounds(&self) -> (Point3<f32>, Point3<f32>) {
        if self.is_empty() {
            return (Point3::origin(), Point3::origin());
        }

        let mut min = Point3::new(f32::MAX, f32::MAX, f32::MAX);
        let mut max = Point3::new(f32::MIN, f32::MIN, f32::MIN);

        self.positions.chunks_exact(3).for_each(|chunk| {
            let (x, y, z) = (chunk[0], chunk[1], chunk[2]);
            min.x = min.x.min(x);
            min.y = min.y.min(y);
            min.z = min.z.min(z);
            max.x = max.x.max(x);
            max.y = max.y.max(y);
            max.z = max.z.max(z);
        });

        (min, max)
    }

    /// Paint every vertex with one colour
    pub fn set_uniform_color(&mut self, color: Rgb) {
        let rgb = color.to_f32();
        self.colors.clear();
        self.colors.reserve(self.positions.len());
        for _ in 0..self.vertex_count() {
            self.colors.extend_from_slice(&rgb);
        }
    }

    /// Replace all vertex colours; one colour per vertex is required
    pub fn set_colors(&mut self, colors: impl IntoIterator<Item = Rgb>) -> Result<()> {
        let mut buffer = Vec::with_capacity(self.positions.len());
        for color in colors {
            buffer.extend_from_slice(&color.to_f32());
        }
        if buffer.len() != self.positions.len() {
            return Err(Error::InvalidBuffer(format!(
                "{} colours for {} vertices",
                buffer.len() / 3,
                self.vertex_count()
            )));
        }
        self.colors = buffer;
        Ok(())
    }

    /// Check the buffer invariants
    ///
    /// Positions come in triples, normals match positions, uvs carry one
    /// pair per vertex, indices form whole triangles that reference existing
    /// vertices, and colours are absent or one triple per vertex.
    pub fn validate(&self) -> Result<()> {
        if self.positions.len() % 3 != 0 {
            return Err(Error::InvalidBuffer(format!(
                "position buffer length {} is not a multiple of 3",
                self.positions.len()
            )));
        }
        let vertices = self.vertex_count();
        if self.normals.len() != self.positions.len() {
            return Err(Error::InvalidBuffer(format!(
                "{} normals for {} vertices",
                self.normals.len() / 3,
                vertices
            )));
        }
        if self.uvs.len() != vertices * 2 {
            return Err(Error::InvalidBuffer(format!(
                "{} uvs for {} vertices",
                self.uvs.len() / 2,
                vertices
            )));
        }
        if self.indices.len() % 3 != 0 {
            return Err(Error::InvalidBuffer(format!(
                "index buffer length {} is not a multiple of 3",
                self.indices.len()
            )));
        }
        if let Some(&bad) = self.indices.iter().find(|&&i| i as usize >= vertices) {
            return Err(Error::InvalidBuffer(format!(
                "index {} out of range for {} vertices",
                bad, vertices
            )));
        }
        if self.has_colors() && self.colors.len() != self.positions.len() {
            return Err(Error::InvalidBuffer(format!(
                "{} colours for {} vertices",
                self.colors.len() / 3,
                vertices
            )));
        }
        Ok(())
    }

    /// Clear the mesh
    #[inline]
    pub fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.uvs.clear();
        self.indices.clear();
        self.colors.clear();
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
