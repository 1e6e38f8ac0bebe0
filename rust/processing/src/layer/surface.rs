// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use geolayer_core::RasterParameters;
use geolayer_geometry::{build_surface, color_surface};

use super::primary;
use crate::error::{Error, Result};
use crate::style::{LayerStyle, Material, Scene};

/// Raster surface: elevation from one band, colour from another
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceLayer {
    pub(crate) params: RasterParameters,
    pub(crate) style: LayerStyle,
    pub(crate) scene: Option<Scene>,
}

impl SurfaceLayer {
    pub fn new(params: RasterParameters, style: LayerStyle) -> Self {
        Self {
            params,
            style,
            scene: None,
        }
    }

    pub fn params(&self) -> &RasterParameters {
        &self.params
    }

    pub(crate) fn initialize(&mut self) -> Result<()> {
        self.params.validate()?;
        self.params.fill_non_finite();
        let mut mesh = build_surface(&self.params)?;
        color_surface(&mut mesh, &self.params, self.style.colormap, self.style.transform)?;

        let mut scene = Scene::default();
        scene.push(mesh, Material::vertex_colored(self.style.opacity));
        self.scene = Some(scene);
        Ok(())
    }

    pub(crate) fn recolor(&mut self) -> Result<()> {
        let (mesh, _) = primary(&mut self.scene)?;
        color_surface(mesh, &self.params, self.style.colormap, self.style.transform)?;
        Ok(())
    }

    pub(crate) fn set_opacity(&mut self, opacity: f64) -> Result<()> {
        let (_, material) = primary(&mut self.scene)?;
        material.opacity = opacity;
        self.style.opacity = opacity;
        Ok(())
    }

    /// Select the 1-based band that drives vertex colours
    pub fn set_color_band(&mut self, band: usize) -> Result<()> {
        if band == 0 || band > self.params.n_bands {
            return Err(Error::InvalidStyle(format!(
                "band {} outside 1..={}",
                band, self.params.n_bands
            )));
        }
        if self.scene.is_none() {
            return Err(Error::NotInitialized);
        }
        self.params.color_band = band;
        self.recolor()
    }

    /// Append a band sampled on the same grid; the geometry is unchanged
    pub fn add_band(&mut self, samples: &[f32]) -> Result<()> {
        self.params.add_band(samples)?;
        Ok(())
    }

    /// Data range of a 1-based band, no-data excluded
    pub fn band_range(&self, band: usize) -> Option<(f64, f64)> {
        self.params.band_range(band)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewerConfig;
    use crate::layer::Layer;
    use geolayer_core::{LayerKind, LayerParameters, SurfaceImportOptions};
    use geolayer_geometry::ColormapKind;

    fn raster() -> RasterParameters {
        RasterParameters::from_samples(
            vec![0.0, 1.0, 2.0, 3.0],
            2,
            2,
            1,
            [0.0, 0.0],
            [1.0, -1.0],
            SurfaceImportOptions::default(),
        )
        .unwrap()
    }

    async fn layer() -> Layer {
        let config = ViewerConfig::from_env();
        let mut layer = Layer::new(LayerParameters::Surface(raster()), &config);
        layer.initialize().await.unwrap();
        layer
    }

    #[tokio::test]
    async fn test_surface_scene() {
        let layer = layer().await;
        assert_eq!(layer.kind(), LayerKind::Surface);
        let items = layer.render_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].mesh.triangle_count(), 2);
        assert!(items[0].material.vertex_colors);
    }

    #[tokio::test]
    async fn test_add_band_then_select_it() {
        let mut layer = layer().await;
        let surface = layer.as_surface_mut().unwrap();
        surface.add_band(&[30.0, 20.0, 10.0, 0.0]).unwrap();
        assert_eq!(surface.band_range(2), Some((0.0, 30.0)));

        let before = surface.scene.as_ref().unwrap().meshes[0].color(0);
        surface.set_color_band(2).unwrap();
        let after = surface.scene.as_ref().unwrap().meshes[0].color(0);
        assert_ne!(before, after);
        assert!(matches!(surface.set_color_band(3), Err(Error::InvalidStyle(_))));
    }

    #[tokio::test]
    async fn test_opacity_and_colormap() {
        let mut layer = layer().await;
        layer.set_opacity(0.4).unwrap();
        layer.set_colormap(ColormapKind::Seismic).unwrap();
        let items = layer.render_items();
        assert_eq!(items[0].material.opacity, 0.4);
        assert_eq!(items[0].mesh.color(0), Some([0.0, 0.0, 1.0]));
        assert_eq!(layer.style().colormap, ColormapKind::Seismic);
    }
}
