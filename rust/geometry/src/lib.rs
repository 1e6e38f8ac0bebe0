// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geolayer Geometry
//!
//! Mesh builders for geological layers: raster surfaces, drillhole tubes,
//! point spheres, line ribbons and hexahedral volumes, plus the colormap
//! engine that paints them. Uses nalgebra for vector maths.

pub mod colormap;
pub mod error;
pub mod mesh;
pub mod points;
pub mod ribbon;
pub mod sphere;
pub mod surface;
pub mod tube;
pub mod volume;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector2, Vector3};

pub use colormap::{Colormap, ColormapKind, Rgb, Transform};
pub use error::{Error, Result};
pub use mesh::{CategoryMesh, Mesh};
pub use points::{build_point_set, color_point_set, point_samples, PointSample};
pub use ribbon::{build_ribbons, color_ribbons};
pub use sphere::{append_sphere, uv_sphere, SphereSpec};
pub use surface::{build_surface, color_surface, surface_colors};
pub use tube::{build_tube, compute_frenet_frames, tube_colors, DrillholePath, FrenetFrames, SweepPath, TubeSpec};
pub use volume::{build_volume, color_volume, slice_by_value, split_by_category, unique_values, value_range};
