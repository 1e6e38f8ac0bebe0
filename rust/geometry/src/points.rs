// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Point-sphere set: one UV sphere per CSV row

use geolayer_core::PointsParameters;
use nalgebra::Point3;

use crate::colormap::{ColormapKind, Transform};
use crate::error::Result;
use crate::mesh::Mesh;
use crate::sphere::{append_sphere, SphereSpec};

/// A row that survived no-data filtering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointSample {
    pub position: Point3<f64>,
    pub value: Option<f64>,
}

/// Rows with coordinates and, when a value column is selected, their value
///
/// Rows whose value equals the no-data sentinel are dropped. Filtering only
/// applies when both a value column and a sentinel are set.
pub fn point_samples(params: &PointsParameters) -> Result<Vec<PointSample>> {
    let [xi, yi, zi] = params.column_indices()?;
    let value_index = params.value_index()?;
    let table = &params.table;

    let mut samples = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let value = value_index.map(|vi| table.number(row, vi)).transpose()?;
        if let (Some(v), Some(no_data)) = (value, params.no_data) {
            if v == no_data {
                continue;
            }
        }
        samples.push(PointSample {
            position: Point3::new(table.number(row, xi)?, table.number(row, yi)?, table.number(row, zi)?),
            value,
        });
    }
    Ok(samples)
}

/// Build one sphere per kept row
pub fn build_point_set(params: &PointsParameters, sphere: &SphereSpec) -> Result<Mesh> {
    let samples = point_samples(params)?;
    let mut mesh = Mesh::with_capacity(
        samples.len() * sphere.vertex_count(),
        samples.len() * sphere.triangle_count() * 3,
    );
    for sample in &samples {
        append_sphere(&mut mesh, sample.position, sphere);
    }
    Ok(mesh)
}

/// Colour each sphere uniformly from its row value
///
/// Without a value column the mesh keeps no vertex colours.
pub fn color_point_set(
    mesh: &mut Mesh,
    params: &PointsParameters,
    sphere: &SphereSpec,
    kind: ColormapKind,
    transform: Option<Transform>,
) -> Result<()> {
    let samples = point_samples(params)?;
    let values: Vec<f64> = samples.iter().filter_map(|s| s.value).collect();
    if values.len() != samples.len() {
        mesh.colors.clear();
        return Ok(());
    }

    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let (min, max) = if values.is_empty() { (0.0, 0.0) } else { (min, max) };
    let cmap = kind.build(min, max, transform);

    let per_sphere = sphere.vertex_count();
    mesh.set_colors(
        values
            .iter()
            .flat_map(|&v| std::iter::repeat(cmap.eval(v)).take(per_sphere)),
    )
}
