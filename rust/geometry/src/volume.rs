// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Hexahedral volume meshes and categorical slicing

use geolayer_core::VolumeParameters;
use nalgebra::{Point3, Vector3};

use crate::colormap::Colormap;
use crate::error::{Error, Result};
use crate::mesh::{CategoryMesh, Mesh};

/// Quad faces of a voxel: bottom, top, south, north, west, east
const FACES: [[usize; 4]; 6] = [
    [0, 1, 2, 3],
    [4, 5, 6, 7],
    [4, 5, 0, 1],
    [6, 7, 2, 3],
    [0, 2, 4, 6],
    [1, 3, 5, 7],
];

fn check(params: &VolumeParameters) -> Result<()> {
    let vertices = params.vertices.len();
    if params.values.len() != vertices {
        return Err(Error::InvalidVolume(format!(
            "{} values for {} vertices",
            params.values.len(),
            vertices
        )));
    }
    if let Some((i, voxel)) = params
        .voxels
        .iter()
        .enumerate()
        .find(|(_, voxel)| voxel.iter().any(|&v| v as usize >= vertices))
    {
        return Err(Error::InvalidVolume(format!(
            "voxel {} {:?} references a vertex beyond {}",
            i, voxel, vertices
        )));
    }
    Ok(())
}

/// Expand every voxel into 12 triangles over the shared vertex list
pub fn build_volume(params: &VolumeParameters) -> Result<Mesh> {
    check(params)?;

    let mut mesh = Mesh::with_capacity(params.vertices.len(), params.voxels.len() * 36);
    for v in &params.vertices {
        mesh.add_vertex(Point3::new(v[0], v[1], v[2]), Vector3::z(), [0.0, 0.0]);
    }
    for voxel in &params.voxels {
        for [q0, q1, q2, q3] in FACES {
            mesh.add_triangle(voxel[q0], voxel[q1], voxel[q2]);
            mesh.add_triangle(voxel[q1], voxel[q3], voxel[q2]);
        }
    }
    Ok(mesh)
}

/// Min and max of the finite values, `(0, 0)` when there are none
pub fn value_range(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
        .unwrap_or((0.0, 0.0))
}

/// Colour each vertex from its value
pub fn color_volume(mesh: &mut Mesh, values: &[f64], cmap: &Colormap) -> Result<()> {
    mesh.set_colors(values.iter().map(|&v| cmap.eval(v)))
}

/// Distinct vertex values in ascending order (NaN excluded)
pub fn unique_values(params: &VolumeParameters) -> Vec<f64> {
    let mut values: Vec<f64> = params.values.iter().copied().filter(|v| !v.is_nan()).collect();
    values.sort_by(|a, b| a.total_cmp(b));
    values.dedup();
    values
}

/// Sub-volume of the vertices whose value equals `value`
///
/// Surviving vertex indices shift down by the number of deleted vertices
/// before them; any voxel touching a deleted vertex is dropped.
pub fn slice_by_value(params: &VolumeParameters, value: f64) -> VolumeParameters {
    let mut vertices = Vec::new();
    let mut values = Vec::new();
    let mut deleted = vec![false; params.vertices.len()];
    let mut shift = Vec::with_capacity(params.vertices.len());
    let mut removed = 0u32;

    for (i, (&vertex, &v)) in params.vertices.iter().zip(&params.values).enumerate() {
        shift.push(removed);
        if v == value {
            vertices.push(vertex);
            values.push(v);
        } else {
            deleted[i] = true;
            removed += 1;
        }
    }

    let voxels = params
        .voxels
        .iter()
        .filter(|voxel| voxel.iter().all(|&id| !deleted.get(id as usize).copied().unwrap_or(true)))
        .map(|voxel| voxel.map(|id| id - shift[id as usize]))
        .collect();

    VolumeParameters {
        vertices,
        voxels,
        values,
    }
}

/// One uncoloured sub-mesh per unique value, in ascending value order
pub fn split_by_category(params: &VolumeParameters) -> Result<Vec<CategoryMesh>> {
    check(params)?;
    unique_values(params)
        .into_iter()
        .map(|value| Ok(CategoryMesh::new(value, build_volume(&slice_by_value(params, value))?)))
        .collect()
}
