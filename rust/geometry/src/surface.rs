// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raster surface mesh
//!
//! One vertex per non-no-data pixel; each grid cell is split along b-d:
//!
//! ```text
//!  (ix, iy)    a ---- d   (ix+1, iy)
//!              |    / |
//!              |  /   |
//! (ix, iy+1)   b ---- c   (ix+1, iy+1)
//! ```
//!
//! A triangle is emitted only when all three of its corners carry data.

use geolayer_core::RasterParameters;
use nalgebra::{Point3, Vector3};

use crate::colormap::{ColormapKind, Rgb, Transform};
use crate::error::{Error, Result};
use crate::mesh::Mesh;

/// Build the surface mesh from the elevation band
pub fn build_surface(raster: &RasterParameters) -> Result<Mesh> {
    raster.validate()?;

    let (w, h) = (raster.width, raster.height);
    if w * h > u32::MAX as usize {
        return Err(Error::InvalidRaster(format!("{}x{} grid exceeds u32 indexing", w, h)));
    }

    let u_den = w.saturating_sub(1).max(1) as f64;
    let v_den = h.saturating_sub(1).max(1) as f64;

    let mut mesh = Mesh::with_capacity(w * h, w.saturating_sub(1) * h.saturating_sub(1) * 6);
    // Compacted vertex index per grid point, None for no-data
    let mut remap: Vec<Option<u32>> = Vec::with_capacity(w * h);
    let mut next = 0u32;

    for iy in 0..h {
        let y = iy as f64 * raster.resolution[1] + raster.origin[1];
        for ix in 0..w {
            let x = ix as f64 * raster.resolution[0] + raster.origin[0];
            let elev = raster.sample(ix, iy, raster.elevation_band);
            if raster.is_no_data(elev) {
                remap.push(None);
                continue;
            }
            mesh.add_vertex(
                Point3::new(x, y, elev),
                Vector3::z(),
                [ix as f64 / u_den, 1.0 - iy as f64 / v_den],
            );
            remap.push(Some(next));
            next += 1;
        }
    }

    for iy in 0..h.saturating_sub(1) {
        for ix in 0..w.saturating_sub(1) {
            let a = remap[ix + w * iy];
            let b = remap[ix + w * (iy + 1)];
            let c = remap[(ix + 1) + w * (iy + 1)];
            let d = remap[(ix + 1) + w * iy];

            if let (Some(a), Some(b), Some(d)) = (a, b, d) {
                mesh.add_triangle(a, b, d);
            }
            if let (Some(b), Some(c), Some(d)) = (b, c, d) {
                mesh.add_triangle(b, c, d);
            }
        }
    }

    Ok(mesh)
}

/// Per-vertex colours from the colour band, in mesh vertex order
///
/// The domain is the colour band's data range; an all-no-data band maps to
/// a degenerate domain.
pub fn surface_colors(raster: &RasterParameters, kind: ColormapKind, transform: Option<Transform>) -> Vec<Rgb> {
    let (min, max) = raster.band_range(raster.color_band).unwrap_or((0.0, 0.0));
    let cmap = kind.build(min, max, transform);

    let mut colors = Vec::new();
    for iy in 0..raster.height {
        for ix in 0..raster.width {
            if raster.is_no_data(raster.sample(ix, iy, raster.elevation_band)) {
                continue;
            }
            colors.push(cmap.eval(raster.sample(ix, iy, raster.color_band)));
        }
    }
    colors
}

/// Recolour a mesh built by [`build_surface`] from the same raster
pub fn color_surface(
    mesh: &mut Mesh,
    raster: &RasterParameters,
    kind: ColormapKind,
    transform: Option<Transform>,
) -> Result<()> {
    mesh.set_colors(surface_colors(raster, kind, transform))
}
