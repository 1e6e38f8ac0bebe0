// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use geolayer_core::LinesParameters;
use geolayer_geometry::{build_ribbons, color_ribbons};

use super::{material_for, primary};
use crate::error::Result;
use crate::style::{LayerStyle, Scene};

/// Line set drawn as flat mitered ribbons
#[derive(Debug, Clone, PartialEq)]
pub struct LinesLayer {
    pub(crate) params: LinesParameters,
    pub(crate) style: LayerStyle,
    pub(crate) scene: Option<Scene>,
}

impl LinesLayer {
    pub fn new(params: LinesParameters, style: LayerStyle) -> Self {
        Self {
            params,
            style,
            scene: None,
        }
    }

    pub fn params(&self) -> &LinesParameters {
        &self.params
    }

    pub(crate) fn initialize(&mut self) -> Result<()> {
        let mut mesh = build_ribbons(&self.params, self.style.line_width)?;
        color_ribbons(&mut mesh, &self.params, self.style.colormap, self.style.transform)?;

        let material = material_for(&mesh, self.style.opacity);
        let mut scene = Scene::default();
        scene.push(mesh, material);
        self.scene = Some(scene);
        Ok(())
    }

    pub(crate) fn recolor(&mut self) -> Result<()> {
        let (mesh, material) = primary(&mut self.scene)?;
        color_ribbons(mesh, &self.params, self.style.colormap, self.style.transform)?;
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
    pub fn set_colors(&mut self, field: Option<&str>) -> Result<()> {
        primary(&mut self.scene)?;
        let previous = std::mem::replace(&mut self.params.value_column, field.map(str::to_string));
        if let Err(e) = self.recolor() {
            self.params.value_column = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Change the ribbon half-width; rebuilds the geometry
    pub fn set_width(&mut self, width: f64) -> Result<()> {
        primary(&mut self.scene)?;
        self.style.line_width = width;
        self.initialize()
    }
}
