// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use geolayer_core::EnsembleParameters;
use geolayer_geometry::{split_by_category, value_range};
use rustc_hash::FxHashSet;

use crate::error::{Error, Result};
use crate::style::{LayerStyle, Material, Scene};

/// Stack of categorical volume realizations, one shown at a time
///
/// Every realization is split into per-category sub-meshes up front.
/// Switching realizations only flips visibility flags.
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleLayer {
    pub(crate) params: EnsembleParameters,
    pub(crate) style: LayerStyle,
    /// `(realization, category)` of each sub-mesh
    pub(crate) owners: Vec<(usize, f64)>,
    pub(crate) currently_visible: usize,
    pub(crate) scene: Option<Scene>,
}

impl EnsembleLayer {
    pub fn new(params: EnsembleParameters, style: LayerStyle) -> Self {
        Self {
            params,
            style,
            owners: Vec::new(),
            currently_visible: 0,
            scene: None,
        }
    }

    pub fn params(&self) -> &EnsembleParameters {
        &self.params
    }

    pub fn file_names(&self) -> &[String] {
        &self.params.file_names
    }

    pub fn num_realizations(&self) -> usize {
        self.params.num_realizations()
    }

    pub fn currently_visible(&self) -> usize {
        self.currently_visible
    }

    /// Distinct category values across all realizations, ascending
    pub fn categories(&self) -> Vec<f64> {
        let mut seen = FxHashSet::default();
        let mut values: Vec<f64> = self
            .owners
            .iter()
            .map(|&(_, value)| value)
            .filter(|value| seen.insert(value.to_bits()))
            .collect();
        values.sort_by(|a, b| a.total_cmp(b));
        values
    }

    pub(crate) fn initialize(&mut self) -> Result<()> {
        let mut scene = Scene::default();
        let mut owners = Vec::new();
        for (realization, params) in self.params.realization_parameters.iter().enumerate() {
            for category in split_by_category(params)? {
                owners.push((realization, category.value));
                scene.push(category.mesh, Material::vertex_colored(self.style.opacity));
            }
        }
        self.owners = owners;
        self.scene = Some(scene);
        self.recolor()?;
        self.set_visible(0)
    }

    /// One domain spans every realization so colours stay comparable
    pub(crate) fn recolor(&mut self) -> Result<()> {
        let values: Vec<f64> = self.owners.iter().map(|&(_, value)| value).collect();
        let (min, max) = value_range(&values);
        let cmap = self.style.colormap.build(min, max, self.style.transform);
        let scene = self.scene.as_mut().ok_or(Error::NotInitialized)?;
        for (mesh, &(_, value)) in scene.meshes.iter_mut().zip(&self.owners) {
            mesh.set_uniform_color(cmap.eval(value));
        }
        Ok(())
    }

    pub(crate) fn set_opacity(&mut self, opacity: f64) -> Result<()> {
        let threshold = self.style.visibility_threshold;
        let current = self.currently_visible;
        let scene = self.scene.as_mut().ok_or(Error::NotInitialized)?;
        for (material, &(realization, _)) in scene.materials.iter_mut().zip(&self.owners) {
            material.opacity = opacity;
            material.visible = opacity >= threshold && realization == current;
        }
        self.style.opacity = opacity;
        Ok(())
    }

    /// Show realization `index` and hide the others
    ///
    /// Sub-meshes faded below the visibility threshold stay hidden.
    pub fn set_visible(&mut self, index: usize) -> Result<()> {
        let count = self.num_realizations();
        if index >= count && count > 0 {
            return Err(Error::InvalidStyle(format!(
                "realization {} outside 0..{}",
                index, count
            )));
        }
        let threshold = self.style.visibility_threshold;
        let scene = self.scene.as_mut().ok_or(Error::NotInitialized)?;
        for (material, &(realization, _)) in scene.materials.iter_mut().zip(&self.owners) {
            if material.opacity >= threshold {
                material.visible = realization == index;
            }
        }
        self.currently_visible = index;
        Ok(())
    }

    /// Fade one category in every realization
    pub fn set_category_opacity(&mut self, value: f64, opacity: f64) -> Result<()> {
        if !self.owners.iter().any(|&(_, v)| v == value) {
            return Err(Error::InvalidStyle(format!("no category {}", value)));
        }
        let threshold = self.style.visibility_threshold;
        let current = self.currently_visible;
        let scene = self.scene.as_mut().ok_or(Error::NotInitialized)?;
        for (material, &(realization, v)) in scene.materials.iter_mut().zip(&self.owners) {
            if v == value {
                material.opacity = opacity;
                material.visible = opacity >= threshold && realization == current;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewerConfig;
    use crate::layer::Layer;
    use geolayer_core::{LayerParameters, VolumeParameters};

    fn cube(values: [f64; 2]) -> VolumeParameters {
        let mut vertices = Vec::new();
        let mut cell_values = Vec::new();
        for (offset, value) in [(0.0, values[0]), (2.0, values[1])] {
            for z in 0..2 {
                for y in 0..2 {
                    for x in 0..2 {
                        vertices.push([offset + x as f64, y as f64, z as f64]);
                        cell_values.push(value);
                    }
                }
            }
        }
        VolumeParameters {
            vertices,
            voxels: vec![[0, 1, 2, 3, 4, 5, 6, 7], [8, 9, 10, 11, 12, 13, 14, 15]],
            values: cell_values,
        }
    }

    async fn layer() -> Layer {
        let params = EnsembleParameters {
            realization_parameters: vec![cube([1.0, 2.0]), cube([2.0, 3.0]), cube([1.0, 1.0])],
            file_names: vec!["r0.mesh".into(), "r1.mesh".into(), "r2.mesh".into()],
        };
        let mut layer = Layer::new(LayerParameters::Ensemble(params), &ViewerConfig::from_env());
        layer.initialize().await.unwrap();
        layer
    }

    fn visible_owners(layer: &mut Layer) -> Vec<(usize, f64)> {
        let ensemble = layer.as_ensemble_mut().unwrap();
        let owners = ensemble.owners.clone();
        ensemble
            .scene
            .as_ref()
            .unwrap()
            .materials
            .iter()
            .zip(owners)
            .filter(|(m, _)| m.visible)
            .map(|(_, o)| o)
            .collect()
    }

    #[tokio::test]
    async fn test_first_realization_visible_after_initialize() {
        let mut layer = layer().await;
        assert_eq!(layer.render_items().len(), 5);
        assert_eq!(visible_owners(&mut layer), vec![(0, 1.0), (0, 2.0)]);

        let ensemble = layer.as_ensemble_mut().unwrap();
        assert_eq!(ensemble.currently_visible(), 0);
        assert_eq!(ensemble.categories(), vec![1.0, 2.0, 3.0]);
        assert_eq!(ensemble.file_names()[2], "r2.mesh");
    }

    #[tokio::test]
    async fn test_set_visible_switches_realization() {
        let mut layer = layer().await;
        layer.as_ensemble_mut().unwrap().set_visible(1).unwrap();
        assert_eq!(visible_owners(&mut layer), vec![(1, 2.0), (1, 3.0)]);
        assert!(matches!(
            layer.as_ensemble_mut().unwrap().set_visible(3),
            Err(Error::InvalidStyle(_))
        ));
    }

    #[tokio::test]
    async fn test_faded_category_stays_hidden() {
        let mut layer = layer().await;
        let ensemble = layer.as_ensemble_mut().unwrap();
        ensemble.set_category_opacity(2.0, 0.0).unwrap();
        ensemble.set_visible(1).unwrap();
        assert_eq!(visible_owners(&mut layer), vec![(1, 3.0)]);

        let ensemble = layer.as_ensemble_mut().unwrap();
        ensemble.set_category_opacity(2.0, 0.8).unwrap();
        assert_eq!(visible_owners(&mut layer), vec![(1, 2.0), (1, 3.0)]);
    }

    #[tokio::test]
    async fn test_global_color_domain() {
        let layer = layer().await;
        let items = layer.render_items();
        let first = items[0].mesh.color(0);
        // Category 1 in realization 0 and realization 2 share a colour
        assert_eq!(items[4].mesh.color(0), first);
        assert_ne!(items[1].mesh.color(0), first);
    }
}
