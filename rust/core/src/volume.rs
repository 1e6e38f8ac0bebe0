// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Volume (`.mesh`) importer
//!
//! Layout:
//!
//! ```text
//! V                 <- vertex count
//! x y z             <- V lines
//! K                 <- voxel count
//! i0 i1 .. i7       <- K lines of hexahedron connectivity
//! value             <- V lines, one scalar per vertex
//! ```

use crate::error::Result;
use crate::fast_parse::LineCursor;

const FORMAT: &str = "volume";

/// Unstructured hexahedral volume with per-vertex scalars
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VolumeParameters {
    pub vertices: Vec<[f64; 3]>,
    pub voxels: Vec<[u32; 8]>,
    pub values: Vec<f64>,
}

impl VolumeParameters {
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn num_voxels(&self) -> usize {
        self.voxels.len()
    }
}

/// A set of volume realizations imported together
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct EnsembleParameters {
    pub realization_parameters: Vec<VolumeParameters>,
    pub file_names: Vec<String>,
}

impl EnsembleParameters {
    #[inline]
    pub fn num_realizations(&self) -> usize {
        self.realization_parameters.len()
    }
}

/// Parse a `.mesh` document
///
/// Voxel indices are checked against the vertex count, so every parsed
/// volume can be meshed without out-of-range indices.
pub fn parse_volume(text: &str) -> Result<VolumeParameters> {
    let mut cursor = LineCursor::new(FORMAT, text);

    let num_vertices = cursor.next_count("vertex count")?;
    let mut vertices = Vec::with_capacity(cursor.capacity_for(num_vertices));
    for i in 0..num_vertices {
        vertices.push(cursor.next_f64_row::<3>(&format!("vertex {} of {}", i + 1, num_vertices))?);
    }

    let num_voxels = cursor.next_count("voxel count")?;
    let mut voxels = Vec::with_capacity(cursor.capacity_for(num_voxels));
    for i in 0..num_voxels {
        let voxel = cursor.next_index_row::<8>(&format!("voxel {} of {}", i + 1, num_voxels))?;
        if let Some(&bad) = voxel.iter().find(|&&v| v as usize >= num_vertices) {
            return Err(cursor.error(format!(
                "voxel {} references vertex {} but only {} vertices are declared",
                i + 1,
                bad,
                num_vertices
            )));
        }
        voxels.push(voxel);
    }

    let mut values = Vec::with_capacity(cursor.capacity_for(num_vertices));
    for i in 0..num_vertices {
        values.push(cursor.next_f64(&format!("vertex value {} of {}", i + 1, num_vertices))?);
    }

    cursor.finish()?;

    Ok(VolumeParameters {
        vertices,
        voxels,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn unit_cube(values: [f64; 8]) -> String {
        let mut text = String::from("8\n");
        for z in 0..2 {
            for y in 0..2 {
                for x in 0..2 {
                    text.push_str(&format!("{} {} {}\n", x, y, z));
                }
            }
        }
        text.push_str("1\n0 1 2 3 4 5 6 7\n");
        for v in values {
            text.push_str(&format!("{}\n", v));
        }
        text
    }

    #[test]
    fn test_parse_unit_cube() {
        let volume = parse_volume(&unit_cube([1.0; 8])).unwrap();
        assert_eq!(volume.num_vertices(), 8);
        assert_eq!(volume.num_voxels(), 1);
        assert_eq!(volume.vertices[7], [1.0, 1.0, 1.0]);
        assert_eq!(volume.voxels[0], [0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(volume.values.len(), 8);
    }

    #[test]
    fn test_voxel_index_out_of_range() {
        let text = "2\n0 0 0\n1 1 1\n1\n0 1 2 3 4 5 6 7\n0\n0\n";
        match parse_volume(text).unwrap_err() {
            Error::Malformed { detail, .. } => assert!(detail.contains("references vertex 2")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_values() {
        let mut text = unit_cube([0.0; 8]);
        // Drop the final value line
        text.truncate(text.trim_end().rfind('\n').unwrap() + 1);
        assert!(parse_volume(&text).is_err());
    }

    #[test]
    fn test_huge_counts_fail_cleanly() {
        match parse_volume("18446744073709551615\n0 0 0\n").unwrap_err() {
            Error::Malformed { line, detail, .. } => {
                assert_eq!(line, 3);
                assert!(detail.contains("vertex 2"), "{detail}");
            }
            other => panic!("unexpected error: {other}"),
        }
        let voxels = "1\n0 0 0\n1000000000000\n0 0 0 0 0 0 0 0\n";
        assert!(matches!(parse_volume(voxels), Err(Error::Malformed { .. })));
    }

    #[test]
    fn test_non_finite_value_rejected() {
        assert!(parse_volume("1\n0 0 0\n0\nnan\n").is_err());
        assert!(parse_volume("1\n0 inf 0\n0\n1\n").is_err());
    }

    #[test]
    fn test_short_voxel_row() {
        let text = "1\n0 0 0\n1\n0 0 0 0\n0\n";
        assert!(parse_volume(text).is_err());
    }
}
