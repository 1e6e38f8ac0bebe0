// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Layer objects
//!
//! A [`Layer`] is a tagged union over the seven renderable variants. Each
//! variant owns its import parameters, its [`LayerStyle`] and, once
//! initialized, a [`Scene`] of meshes and materials. Style operations
//! mutate the scene in place and fail with [`Error::NotInitialized`] before
//! [`Layer::initialize`] has run.

mod drillhole;
mod ensemble;
mod lines;
mod points;
mod surface;
mod volume;

pub use drillhole::DrillholeLayer;
pub use ensemble::EnsembleLayer;
pub use lines::LinesLayer;
pub use points::PointsLayer;
pub use surface::SurfaceLayer;
pub use volume::{MultiVolumeLayer, VolumeLayer};

use geolayer_core::{LayerKind, LayerParameters};
use geolayer_geometry::{ColormapKind, Mesh, Rgb, Transform};

use crate::config::ViewerConfig;
use crate::error::{Error, Result};
use crate::style::{LayerStyle, Material, RenderItem, Scene};

/// A renderable geological dataset
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    Surface(SurfaceLayer),
    Lines(LinesLayer),
    Points(PointsLayer),
    Drillhole(DrillholeLayer),
    Volume(VolumeLayer),
    MultiVolume(MultiVolumeLayer),
    Ensemble(EnsembleLayer),
}

/// Dispatch one expression over every variant
macro_rules! each_layer {
    ($layer:expr, $inner:ident => $body:expr) => {
        match $layer {
            Layer::Surface($inner) => $body,
            Layer::Lines($inner) => $body,
            Layer::Points($inner) => $body,
            Layer::Drillhole($inner) => $body,
            Layer::Volume($inner) => $body,
            Layer::MultiVolume($inner) => $body,
            Layer::Ensemble($inner) => $body,
        }
    };
}

impl Layer {
    /// Uninitialized layer styled with the configured defaults for its kind
    pub fn new(parameters: LayerParameters, config: &ViewerConfig) -> Self {
        let style = config.default_style(parameters.kind());
        match parameters {
            LayerParameters::Surface(p) => Layer::Surface(SurfaceLayer::new(p, style)),
            LayerParameters::Lines(p) => Layer::Lines(LinesLayer::new(p, style)),
            LayerParameters::Points(p) => Layer::Points(PointsLayer::new(p, style)),
            LayerParameters::Drillhole(p) => Layer::Drillhole(DrillholeLayer::new(p, style)),
            LayerParameters::Volume(p) => Layer::Volume(VolumeLayer::new(p, style)),
            LayerParameters::MultiVolume(p) => Layer::MultiVolume(MultiVolumeLayer::new(p, style)),
            LayerParameters::Ensemble(p) => Layer::Ensemble(EnsembleLayer::new(p, style)),
        }
    }

    pub fn kind(&self) -> LayerKind {
        match self {
            Layer::Surface(_) => LayerKind::Surface,
            Layer::Lines(_) => LayerKind::Lines,
            Layer::Points(_) => LayerKind::Points,
            Layer::Drillhole(_) => LayerKind::Drillhole,
            Layer::Volume(_) => LayerKind::Volume,
            Layer::MultiVolume(_) => LayerKind::MultiVolume,
            Layer::Ensemble(_) => LayerKind::Ensemble,
        }
    }

    /// Build geometry and materials from the parameters
    ///
    /// Running it again discards the previous scene and rebuilds it, so
    /// geometry is never duplicated.
    pub async fn initialize(&mut self) -> Result<()> {
        each_layer!(self, l => l.initialize())
    }

    pub fn is_initialized(&self) -> bool {
        self.scene().is_some()
    }

    /// Import parameters the layer was built from
    pub fn parameters(&self) -> LayerParameters {
        match self {
            Layer::Surface(l) => LayerParameters::Surface(l.params.clone()),
            Layer::Lines(l) => LayerParameters::Lines(l.params.clone()),
            Layer::Points(l) => LayerParameters::Points(l.params.clone()),
            Layer::Drillhole(l) => LayerParameters::Drillhole(l.params.clone()),
            Layer::Volume(l) => LayerParameters::Volume(l.params.clone()),
            Layer::MultiVolume(l) => LayerParameters::MultiVolume(l.params.clone()),
            Layer::Ensemble(l) => LayerParameters::Ensemble(l.params.clone()),
        }
    }

    pub fn style(&self) -> &LayerStyle {
        each_layer!(self, l => &l.style)
    }

    pub fn scene(&self) -> Option<&Scene> {
        each_layer!(self, l => l.scene.as_ref())
    }

    /// Meshes with their materials, empty before initialization
    pub fn render_items(&self) -> Vec<RenderItem<'_>> {
        self.scene().map(Scene::render_items).unwrap_or_default()
    }

    pub fn set_opacity(&mut self, opacity: f64) -> Result<()> {
        each_layer!(self, l => l.set_opacity(opacity))
    }

    pub fn set_colormap(&mut self, colormap: ColormapKind) -> Result<()> {
        each_layer!(self, l => {
            l.style.colormap = colormap;
            l.recolor()
        })
    }

    pub fn set_transform(&mut self, transform: Option<Transform>) -> Result<()> {
        each_layer!(self, l => {
            l.style.transform = transform;
            l.recolor()
        })
    }

    pub fn as_surface_mut(&mut self) -> Result<&mut SurfaceLayer> {
        match self {
            Layer::Surface(l) => Ok(l),
            other => Err(mismatch(other.kind(), LayerKind::Surface)),
        }
    }

    pub fn as_lines_mut(&mut self) -> Result<&mut LinesLayer> {
        match self {
            Layer::Lines(l) => Ok(l),
            other => Err(mismatch(other.kind(), LayerKind::Lines)),
        }
    }

    pub fn as_points_mut(&mut self) -> Result<&mut PointsLayer> {
        match self {
            Layer::Points(l) => Ok(l),
            other => Err(mismatch(other.kind(), LayerKind::Points)),
        }
    }

    pub fn as_drillhole_mut(&mut self) -> Result<&mut DrillholeLayer> {
        match self {
            Layer::Drillhole(l) => Ok(l),
            other => Err(mismatch(other.kind(), LayerKind::Drillhole)),
        }
    }

    pub fn as_multi_volume_mut(&mut self) -> Result<&mut MultiVolumeLayer> {
        match self {
            Layer::MultiVolume(l) => Ok(l),
            other => Err(mismatch(other.kind(), LayerKind::MultiVolume)),
        }
    }

    pub fn as_ensemble_mut(&mut self) -> Result<&mut EnsembleLayer> {
        match self {
            Layer::Ensemble(l) => Ok(l),
            other => Err(mismatch(other.kind(), LayerKind::Ensemble)),
        }
    }
}

fn mismatch(actual: LayerKind, wanted: LayerKind) -> Error {
    Error::InvalidStyle(format!("{} layer has no {} styling", actual, wanted))
}

/// Vertex-coloured material when the mesh carries colours, solid white otherwise
pub(crate) fn material_for(mesh: &Mesh, opacity: f64) -> Material {
    if mesh.has_colors() {
        Material::vertex_colored(opacity)
    } else {
        Material::solid(Rgb::WHITE, opacity)
    }
}

/// First mesh of an initialized scene
pub(crate) fn primary(scene: &mut Option<Scene>) -> Result<(&mut Mesh, &mut Material)> {
    let scene = scene.as_mut().ok_or(Error::NotInitialized)?;
    match (scene.meshes.first_mut(), scene.materials.first_mut()) {
        (Some(mesh), Some(material)) => Ok((mesh, material)),
        _ => Err(Error::NotInitialized),
    }
}
