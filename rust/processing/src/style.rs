// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-layer style and per-mesh material state.

use geolayer_geometry::{ColormapKind, Mesh, Rgb, SphereSpec, Transform};

/// Styling knobs a layer rebuilds or recolours from
#[derive(Debug, Clone, PartialEq)]
pub struct LayerStyle {
    pub colormap: ColormapKind,
    pub transform: Option<Transform>,
    pub opacity: f64,
    pub tube_radius: f64,
    pub tube_radial_segments: usize,
    pub collar_radius: f64,
    pub line_width: f64,
    pub sphere: SphereSpec,
    pub visibility_threshold: f64,
}

/// How the drawing sink should shade one mesh
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub opacity: f64,
    /// Use the mesh's per-vertex colours instead of `color`
    pub vertex_colors: bool,
    pub color: Rgb,
    pub visible: bool,
}

impl Material {
    pub fn vertex_colored(opacity: f64) -> Self {
        Self {
            opacity,
            vertex_colors: true,
            color: Rgb::WHITE,
            visible: true,
        }
    }

    pub fn solid(color: Rgb, opacity: f64) -> Self {
        Self {
            opacity,
            vertex_colors: false,
            color,
            visible: true,
        }
    }
}

/// One drawable: a mesh, its material and whether it is shown
#[derive(Debug, Clone, Copy)]
pub struct RenderItem<'a> {
    pub mesh: &'a Mesh,
    pub material: &'a Material,
    pub visible: bool,
}

/// Meshes and their materials, index-aligned
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub meshes: Vec<Mesh>,
    pub materials: Vec<Material>,
}

impl Scene {
    pub fn push(&mut self, mesh: Mesh, material: Material) {
        self.meshes.push(mesh);
        self.materials.push(material);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn clear(&mut self) {
        self.meshes.clear();
        self.materials.clear();
    }

    /// Apply one opacity to every material
    pub fn set_opacity(&mut self, opacity: f64) {
        for material in &mut self.materials {
            material.opacity = opacity;
        }
    }

    pub fn render_items(&self) -> Vec<RenderItem<'_>> {
        self.meshes
            .iter()
            .zip(&self.materials)
            .map(|(mesh, material)| RenderItem {
                mesh,
                material,
                visible: material.visible,
            })
            .collect()
    }

    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(Mesh::vertex_count).sum()
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(Mesh::triangle_count).sum()
    }
}
