// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use geolayer_core::PointsParameters;
use geolayer_geometry::{build_point_set, color_point_set};

use super::{material_for, primary};
use crate::error::Result;
use crate::style::{LayerStyle, Scene};

/// Point cloud drawn as one sphere per row
#[derive(Debug, Clone, PartialEq)]
pub struct PointsLayer {
    pub(crate) params: PointsParameters,
    pub(crate) style: LayerStyle,
    pub(crate) scene: Option<Scene>,
}

impl PointsLayer {
    pub fn new(params: PointsParameters, style: LayerStyle) -> Self {
        Self {
            params,
            style,
            scene: None,
        }
    }

    pub fn params(&self) -> &PointsParameters {
        &self.params
    }

    pub(crate) fn initialize(&mut self) -> Result<()> {
        let mut mesh = build_point_set(&self.params, &self.style.sphere)?;
        color_point_set(
            &mut mesh,
            &self.params,
            &self.style.sphere,
            self.style.colormap,
            self.style.transform,
        )?;

        let material = material_for(&mesh, self.style.opacity);
        let mut scene = Scene::default();
        scene.push(mesh, material);
        self.scene = Some(scene);
        Ok(())
    }

    pub(crate) fn recolor(&mut self) -> Result<()> {
        let (mesh, material) = primary(&mut self.scene)?;
        color_point_set(
            mesh,
            &self.params,
            &self.style.sphere,
            self.style.colormap,
            self.style.transform,
        )?;
        *material = material_for(mesh, material.opacity);
        Ok(())
    }

    pub(crate) fn set_opacity(&mut self, opacity: f64) -> Result<()> {
        let (_, material) = primary(&mut self.scene)?;
        material.opacity = opacity;
        self.style.opacity = opacity;
        Ok(())
    }

    /// Colour by `field`, or drop vertex colours with `None`
    ///
    /// The no-data filter follows the value column, so the spheres are
    /// rebuilt.
    pub fn set_colors(&mut self, field: Option<&str>) -> Result<()> {
        primary(&mut self.scene)?;
        let previous = std::mem::replace(&mut self.params.value_column, field.map(str::to_string));
        if let Err(e) = self.initialize() {
            self.params.value_column = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Change the sphere radius; rebuilds the geometry
    pub fn set_radius(&mut self, radius: f64) -> Result<()> {
        primary(&mut self.scene)?;
        self.style.sphere.radius = radius;
        self.initialize()
    }
}
