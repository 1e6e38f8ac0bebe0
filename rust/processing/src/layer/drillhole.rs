// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use geolayer_core::DrillholeParameters;
use geolayer_geometry::{build_tube, tube_colors, uv_sphere, value_range, DrillholePath, Rgb, SphereSpec, TubeSpec};

use super::primary;
use crate::error::{Error, Result};
use crate::style::{LayerStyle, Material, Scene};

/// Drillhole tube plus a black collar marker
///
/// The tube is coloured from one observation row at a time; the collar
/// sphere is always solid.
#[derive(Debug, Clone, PartialEq)]
pub struct DrillholeLayer {
    pub(crate) params: DrillholeParameters,
    pub(crate) style: LayerStyle,
    pub(crate) observation: usize,
    pub(crate) scene: Option<Scene>,
}

impl DrillholeLayer {
    pub fn new(params: DrillholeParameters, style: LayerStyle) -> Self {
        Self {
            params,
            style,
            observation: 0,
            scene: None,
        }
    }

    pub fn params(&self) -> &DrillholeParameters {
        &self.params
    }

    /// Index of the observation row colouring the tube
    pub fn observation(&self) -> usize {
        self.observation
    }

    fn tube_spec(&self) -> TubeSpec {
        TubeSpec::new(
            self.params.num_intervals().saturating_sub(1),
            self.style.tube_radius,
            self.style.tube_radial_segments,
        )
    }

    pub(crate) fn initialize(&mut self) -> Result<()> {
        let path = DrillholePath::from_parameters(&self.params);
        let tube = build_tube(&path, &self.tube_spec());
        let collar = uv_sphere(
            path.collar(),
            &SphereSpec::new(
                self.style.collar_radius,
                self.style.sphere.width_segments,
                self.style.sphere.height_segments,
            ),
        );

        let mut scene = Scene::default();
        scene.push(tube, Material::solid(Rgb::WHITE, self.style.opacity));
        scene.push(collar, Material::solid(Rgb::BLACK, self.style.opacity));
        self.scene = Some(scene);
        self.recolor()
    }

    pub(crate) fn recolor(&mut self) -> Result<()> {
        let spec = self.tube_spec();
        let values = self.params.observations.get(self.observation);
        let (mesh, material) = primary(&mut self.scene)?;
        match values {
            Some(values) if !values.is_empty() => {
                let (min, max) = value_range(values);
                let cmap = self.style.colormap.build(min, max, self.style.transform);
                tube_colors(mesh, &spec, values, &cmap)?;
                material.vertex_colors = true;
            }
            _ => {
                mesh.colors.clear();
                material.vertex_colors = false;
            }
        }
        Ok(())
    }

    pub(crate) fn set_opacity(&mut self, opacity: f64) -> Result<()> {
        let scene = self.scene.as_mut().ok_or(Error::NotInitialized)?;
        scene.set_opacity(opacity);
        self.style.opacity = opacity;
        Ok(())
    }

    /// Colour the tube from observation row `index`
    pub fn set_observation(&mut self, index: usize) -> Result<()> {
        if index >= self.params.num_observations() {
            return Err(Error::InvalidStyle(format!(
                "observation {} outside 0..{}",
                index,
                self.params.num_observations()
            )));
        }
        if self.scene.is_none() {
            return Err(Error::NotInitialized);
        }
        self.observation = index;
        self.recolor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewerConfig;
    use crate::layer::Layer;
    use geolayer_core::{parse_drillhole, LayerParameters};

    const DH: &str = "0 0 100 90 0 10\n3\n0\n10\n20\n2\n1\n2\n3\n30\n20\n10\n";

    async fn layer() -> Layer {
        let config = ViewerConfig {
            tube_radial_segments: 4,
            ..ViewerConfig::from_env()
        };
        let params = parse_drillhole(DH).unwrap();
        let mut layer = Layer::new(LayerParameters::Drillhole(params), &config);
        layer.initialize().await.unwrap();
        layer
    }

    #[tokio::test]
    async fn test_tube_and_collar() {
        let layer = layer().await;
        let items = layer.render_items();
        assert_eq!(items.len(), 2);

        // Two tubular segments, four sides
        assert_eq!(items[0].mesh.vertex_count(), 3 * 5);
        assert_eq!(items[0].mesh.triangle_count(), 2 * 2 * 4);
        assert!(items[0].material.vertex_colors);

        assert!(!items[1].material.vertex_colors);
        assert_eq!(items[1].material.color, Rgb::BLACK);
        assert!(!items[1].mesh.has_colors());
    }

    #[tokio::test]
    async fn test_observation_selects_colors() {
        let mut layer = layer().await;
        // Seismic: the first ring of row 0 is the minimum, blue
        assert_eq!(layer.render_items()[0].mesh.color(0), Some([0.0, 0.0, 1.0]));

        let drillhole = layer.as_drillhole_mut().unwrap();
        drillhole.set_observation(1).unwrap();
        assert_eq!(drillhole.observation(), 1);
        assert_eq!(layer.render_items()[0].mesh.color(0), Some([1.0, 0.0, 0.0]));
    }

    #[tokio::test]
    async fn test_observation_out_of_range() {
        let mut layer = layer().await;
        let drillhole = layer.as_drillhole_mut().unwrap();
        assert!(matches!(drillhole.set_observation(2), Err(Error::InvalidStyle(_))));
        assert_eq!(drillhole.observation(), 0);
    }

    #[tokio::test]
    async fn test_opacity_reaches_collar() {
        let mut layer = layer().await;
        layer.set_opacity(0.3).unwrap();
        assert!(layer.render_items().iter().all(|item| item.material.opacity == 0.3));
    }
}
