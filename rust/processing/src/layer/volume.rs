// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use geolayer_core::VolumeParameters;
use geolayer_geometry::{build_volume, color_volume, split_by_category, value_range, Colormap};

use super::primary;
use crate::error::{Error, Result};
use crate::style::{LayerStyle, Material, Scene};

/// Single hexahedral volume coloured per vertex
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeLayer {
    pub(crate) params: VolumeParameters,
    pub(crate) style: LayerStyle,
    pub(crate) scene: Option<Scene>,
}

impl VolumeLayer {
    pub fn new(params: VolumeParameters, style: LayerStyle) -> Self {
        Self {
            params,
            style,
            scene: None,
        }
    }

    pub fn params(&self) -> &VolumeParameters {
        &self.params
    }

    fn colormap(&self) -> Colormap {
        let (min, max) = value_range(&self.params.values);
        self.style.colormap.build(min, max, self.style.transform)
    }

    pub(crate) fn initialize(&mut self) -> Result<()> {
        let mut mesh = build_volume(&self.params)?;
        color_volume(&mut mesh, &self.params.values, &self.colormap())?;

        let mut scene = Scene::default();
        scene.push(mesh, Material::vertex_colored(self.style.opacity));
        self.scene = Some(scene);
        Ok(())
    }

    pub(crate) fn recolor(&mut self) -> Result<()> {
        let cmap = self.colormap();
        let (mesh, _) = primary(&mut self.scene)?;
        color_volume(mesh, &self.params.values, &cmap)?;
        Ok(())
    }

    pub(crate) fn set_opacity(&mut self, opacity: f64) -> Result<()> {
        let (_, material) = primary(&mut self.scene)?;
        material.opacity = opacity;
        self.style.opacity = opacity;
        Ok(())
    }
}

/// Volume split into one uniformly coloured sub-mesh per category value
#[derive(Debug, Clone, PartialEq)]
pub struct MultiVolumeLayer {
    pub(crate) params: VolumeParameters,
    pub(crate) style: LayerStyle,
    /// Category value of each sub-mesh, ascending
    pub(crate) categories: Vec<f64>,
    pub(crate) scene: Option<Scene>,
}

impl MultiVolumeLayer {
    pub fn new(params: VolumeParameters, style: LayerStyle) -> Self {
        Self {
            params,
            style,
            categories: Vec::new(),
            scene: None,
        }
    }

    pub fn params(&self) -> &VolumeParameters {
        &self.params
    }

    pub fn categories(&self) -> &[f64] {
        &self.categories
    }

    pub(crate) fn initialize(&mut self) -> Result<()> {
        let split = split_by_category(&self.params)?;

        let mut scene = Scene::default();
        self.categories = Vec::with_capacity(split.len());
        for category in split {
            self.categories.push(category.value);
            scene.push(category.mesh, Material::vertex_colored(self.style.opacity));
        }
        self.scene = Some(scene);
        self.recolor()
    }

    /// Each category takes its own colour over the span of all categories
    pub(crate) fn recolor(&mut self) -> Result<()> {
        let (min, max) = value_range(&self.categories);
        let cmap = self.style.colormap.build(min, max, self.style.transform);
        let scene = self.scene.as_mut().ok_or(Error::NotInitialized)?;
        for (mesh, &value) in scene.meshes.iter_mut().zip(&self.categories) {
            mesh.set_uniform_color(cmap.eval(value));
        }
        Ok(())
    }

    pub(crate) fn set_opacity(&mut self, opacity: f64) -> Result<()> {
        let threshold = self.style.visibility_threshold;
        let scene = self.scene.as_mut().ok_or(Error::NotInitialized)?;
        for material in &mut scene.materials {
            material.opacity = opacity;
            material.visible = opacity >= threshold;
        }
        self.style.opacity = opacity;
        Ok(())
    }

    /// Fade one category; below the visibility threshold it is hidden
    pub fn set_category_opacity(&mut self, value: f64, opacity: f64) -> Result<()> {
        let index = self
            .categories
            .iter()
            .position(|&c| c == value)
            .ok_or_else(|| Error::InvalidStyle(format!("no category {}", value)))?;
        let threshold = self.style.visibility_threshold;
        let scene = self.scene.as_mut().ok_or(Error::NotInitialized)?;
        let material = &mut scene.materials[index];
        material.opacity = opacity;
        material.visible = opacity >= threshold;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewerConfig;
    use crate::layer::Layer;
    use geolayer_core::{parse_volume, LayerParameters};
    use geolayer_geometry::ColormapKind;

    /// Two unit cubes side by side, one per category
    fn two_cubes() -> VolumeParameters {
        let mut text = String::from("16\n");
        for offset in [0, 2] {
            for z in 0..2 {
                for y in 0..2 {
                    for x in 0..2 {
                        text.push_str(&format!("{} {} {}\n", offset + x, y, z));
                    }
                }
            }
        }
        text.push_str("2\n0 1 2 3 4 5 6 7\n8 9 10 11 12 13 14 15\n");
        for i in 0..16 {
            text.push_str(if i < 8 { "4\n" } else { "9\n" });
        }
        parse_volume(&text).unwrap()
    }

    #[tokio::test]
    async fn test_volume_single_mesh() {
        let mut layer = Layer::new(LayerParameters::Volume(two_cubes()), &ViewerConfig::from_env());
        layer.initialize().await.unwrap();
        let items = layer.render_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].mesh.triangle_count(), 24);
        assert!(items[0].mesh.has_colors());
    }

    #[tokio::test]
    async fn test_multi_volume_categories() {
        let mut layer = Layer::new(LayerParameters::MultiVolume(two_cubes()), &ViewerConfig::from_env());
        layer.initialize().await.unwrap();
        layer.set_colormap(ColormapKind::Seismic).unwrap();

        let items = layer.render_items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].mesh.color(0), Some([0.0, 0.0, 1.0]));
        assert_eq!(items[1].mesh.color(0), Some([1.0, 0.0, 0.0]));

        let multi = layer.as_multi_volume_mut().unwrap();
        assert_eq!(multi.categories(), &[4.0, 9.0]);
        multi.set_category_opacity(9.0, 0.01).unwrap();
        let items = layer.render_items();
        assert!(items[0].visible);
        assert!(!items[1].visible);
        assert_eq!(items[1].material.opacity, 0.01);
    }

    #[tokio::test]
    async fn test_unknown_category() {
        let mut layer = Layer::new(LayerParameters::MultiVolume(two_cubes()), &ViewerConfig::from_env());
        layer.initialize().await.unwrap();
        let multi = layer.as_multi_volume_mut().unwrap();
        assert!(matches!(multi.set_category_opacity(5.0, 0.5), Err(Error::InvalidStyle(_))));
    }
}
