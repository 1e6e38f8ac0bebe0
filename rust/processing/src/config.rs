// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Viewer configuration loaded from environment variables.

use geolayer_core::{LayerKind, SurfaceImportOptions, DEFAULT_NO_DATA};
use geolayer_geometry::{ColormapKind, SphereSpec};

use crate::style::LayerStyle;

/// Viewer configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// Fixed number of layer slots.
    pub slot_count: usize,
    /// No-data sentinel applied to imported surfaces.
    pub no_data: f64,
    /// Drillhole tube radius.
    pub tube_radius: f64,
    /// Sides of the drillhole tube cross-section.
    pub tube_radial_segments: usize,
    /// Radius of the collar marker sphere.
    pub collar_radius: f64,
    /// Half-width of line ribbons.
    pub line_width: f64,
    /// Radius of point spheres.
    pub point_radius: f64,
    pub sphere_width_segments: usize,
    pub sphere_height_segments: usize,
    /// Opacity below which a sub-mesh is hidden.
    pub visibility_threshold: f64,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl ViewerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            slot_count: env_or("GEOLAYER_SLOT_COUNT", 20),
            no_data: env_or("GEOLAYER_NO_DATA", DEFAULT_NO_DATA),
            tube_radius: env_or("GEOLAYER_TUBE_RADIUS", 25.0),
            tube_radial_segments: env_or("GEOLAYER_TUBE_RADIAL_SEGMENTS", 8),
            collar_radius: env_or("GEOLAYER_COLLAR_RADIUS", 50.0),
            line_width: env_or("GEOLAYER_LINE_WIDTH", 50.0),
            point_radius: env_or("GEOLAYER_POINT_RADIUS", 100.0),
            sphere_width_segments: env_or("GEOLAYER_SPHERE_WIDTH_SEGMENTS", 32),
            sphere_height_segments: env_or("GEOLAYER_SPHERE_HEIGHT_SEGMENTS", 16),
            visibility_threshold: env_or("GEOLAYER_VISIBILITY_THRESHOLD", 0.02),
        }
    }

    /// Options handed to the surface importer
    pub fn surface_options(&self) -> SurfaceImportOptions {
        SurfaceImportOptions {
            no_data: self.no_data,
            ..Default::default()
        }
    }

    /// Style a freshly created layer of `kind` starts with
    pub fn default_style(&self, kind: LayerKind) -> LayerStyle {
        let colormap = match kind {
            LayerKind::Surface | LayerKind::Points | LayerKind::Volume | LayerKind::MultiVolume => {
                ColormapKind::Terrain
            }
            LayerKind::Lines | LayerKind::Drillhole | LayerKind::Ensemble => ColormapKind::Seismic,
        };
        LayerStyle {
            colormap,
            transform: None,
            opacity: 1.0,
            tube_radius: self.tube_radius,
            tube_radial_segments: self.tube_radial_segments,
            collar_radius: self.collar_radius,
            line_width: self.line_width,
            sphere: SphereSpec::new(
                self.point_radius,
                self.sphere_width_segments,
                self.sphere_height_segments,
            ),
            visibility_threshold: self.visibility_threshold,
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
