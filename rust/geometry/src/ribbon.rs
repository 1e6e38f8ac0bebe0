// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mitered flat ribbons for line sets
//!
//! Rows are consumed in file order and grouped by the line-ID column. Every
//! row contributes one cross-section of two edge vertices; end rows get a
//! perpendicular edge and interior rows a miter bisecting the turn.
//!
//! A line is closed when the row two positions ahead carries a different
//! ID. Lines therefore need at least three rows; a shorter trailing line
//! reads past the end of the table and is rejected.

use geolayer_core::LinesParameters;
use nalgebra::{Point3, Vector2, Vector3};

use crate::colormap::{ColormapKind, Transform};
use crate::error::{Error, Result};
use crate::mesh::Mesh;

/// Unsigned angle between two 2D vectors; zero-length input counts as a
/// right angle
fn angle_to(a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    let denominator = (a.norm_squared() * b.norm_squared()).sqrt();
    if denominator == 0.0 {
        return std::f64::consts::FRAC_PI_2;
    }
    (a.dot(b) / denominator).clamp(-1.0, 1.0).acos()
}

/// Rescale to `length`; a zero vector stays zero
fn with_length(v: Vector2<f64>, length: f64) -> Vector2<f64> {
    let norm = v.norm();
    if norm == 0.0 {
        v
    } else {
        v * (length / norm)
    }
}

/// Counter-clockwise rotation about the origin
fn rotate(v: Vector2<f64>, angle: f64) -> Vector2<f64> {
    let (s, c) = angle.sin_cos();
    Vector2::new(v.x * c - v.y * s, v.x * s + v.y * c)
}

struct RibbonBuilder<'a> {
    params: &'a LinesParameters,
    columns: [usize; 4],
    width: f64,
    mesh: Mesh,
    p0: Point3<f64>,
    p1: Point3<f64>,
}

impl<'a> RibbonBuilder<'a> {
    fn coord(&self, row: usize) -> Result<Point3<f64>> {
        let table = &self.params.table;
        if row >= table.len() {
            return Err(Error::InvalidPolyline(format!(
                "line ending at row {} has fewer than 3 points",
                table.len()
            )));
        }
        let [xi, yi, zi, _] = self.columns;
        Ok(Point3::new(
            table.number(row, xi)?,
            table.number(row, yi)?,
            table.number(row, zi)?,
        ))
    }

    fn line_id(&self, row: usize) -> Option<&'a str> {
        self.params.table.cell(row, self.columns[3])
    }

    fn push_edge(&mut self, center: Point3<f64>, offset: Vector2<f64>) {
        let up = Vector3::z();
        self.mesh.add_vertex(
            Point3::new(center.x + offset.x, center.y + offset.y, center.z),
            up,
            [0.0, 1.0],
        );
        self.mesh.add_vertex(
            Point3::new(center.x - offset.x, center.y - offset.y, center.z),
            up,
            [0.0, 1.0],
        );
    }

    fn push_quad(&mut self, row: usize) {
        let j = (row * 2) as u32;
        self.mesh.add_triangle(j, j + 3, j + 1);
        self.mesh.add_triangle(j, j + 2, j + 3);
    }

    fn initialize(&mut self, row: usize) -> Result<()> {
        self.p0 = self.coord(row)?;
        self.p1 = self.coord(row + 1)?;

        let dv = Vector2::new(self.p1.x - self.p0.x, self.p1.y - self.p0.y);
        let edge = with_length(Vector2::new(dv.y, -dv.x), self.width);
        self.push_edge(self.p0, edge);
        self.push_quad(row);
        Ok(())
    }

    fn middle(&mut self, row: usize) -> Result<()> {
        let p2 = self.coord(row + 1)?;

        let a = Vector2::new(self.p0.x - self.p1.x, self.p0.y - self.p1.y);
        let b = Vector2::new(p2.x - self.p1.x, p2.y - self.p1.y);
        let miter = rotate(with_length(a, self.width), angle_to(&a, &b) / 2.0);
        self.push_edge(self.p1, miter);

        self.p0 = self.p1;
        self.p1 = p2;
        self.push_quad(row);
        Ok(())
    }

    fn finalize(&mut self) {
        let dv = Vector2::new(self.p0.x - self.p1.x, self.p0.y - self.p1.y);
        let edge = with_length(Vector2::new(-dv.y, dv.x), self.width);
        self.push_edge(self.p1, edge);
    }
}

/// Build the ribbon mesh for every line in the table
pub fn build_ribbons(params: &LinesParameters, width: f64) -> Result<Mesh> {
    let columns = params.column_indices()?;
    let count = params.table.len();
    if count < 2 {
        return Err(Error::InvalidPolyline(format!("{} rows, a line needs at least 2", count)));
    }

    let mut builder = RibbonBuilder {
        params,
        columns,
        width,
        mesh: Mesh::with_capacity(count * 2, count * 6),
        p0: Point3::origin(),
        p1: Point3::origin(),
    };

    let mut i = 0;
    let mut line_id = builder.line_id(i);
    builder.initialize(i)?;
    i += 1;

    while i < count {
        builder.middle(i)?;
        if builder.line_id(i + 2) != line_id {
            i += 1;
            builder.finalize();
            i += 1;
            if i < count {
                line_id = builder.line_id(i);
                builder.initialize(i)?;
            }
        }
        i += 1;
    }

    let mesh = builder.mesh;
    mesh.validate()?;
    Ok(mesh)
}

/// Colour each cross-section from the value column
pub fn color_ribbons(
    mesh: &mut Mesh,
    params: &LinesParameters,
    kind: ColormapKind,
    transform: Option<Transform>,
) -> Result<()> {
    let Some(column) = params.value_index()? else {
        mesh.colors.clear();
        return Ok(());
    };
    let table = &params.table;
    let values = (0..table.len())
        .map(|row| table.number(row, column))
        .collect::<geolayer_core::Result<Vec<f64>>>()?;

    let (min, max) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let cmap = kind.build(min, max, transform);

    let sections = mesh.vertex_count() / 2;
    mesh.set_colors(values.iter().take(sections).flat_map(|&v| {
        let color = cmap.eval(v);
        [color, color]
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geolayer_core::parse_table;

    fn lines(csv: &str) -> LinesParameters {
        LinesParameters::new(parse_table(csv).unwrap()).with_columns("x", "y", "z", "line")
    }

    #[test]
    fn test_single_three_point_line() {
        let params = lines("line,x,y,z\n1,0,0,5\n1,10,0,5\n1,20,0,5\n");
        let mesh = build_ribbons(&params, 2.0).unwrap();
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.triangle_count(), 4);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < 6));
    }

    #[test]
    fn test_straight_line_edges() {
        let params = lines("line,x,y,z\n1,0,0,5\n1,10,0,5\n1,20,0,5\n");
        let mesh = build_ribbons(&params, 2.0).unwrap();
        // Heading +x: the first edge vertex sits on the right (-y)
        let p = mesh.position(0);
        assert_relative_eq!(p.x, 0.0);
        assert_relative_eq!(p.y, -2.0);
        assert_relative_eq!(p.z, 5.0);
        // Straight miter keeps the full width
        let mid = mesh.position(2);
        assert_relative_eq!(mid.x, 10.0, epsilon = 1e-5);
        assert_relative_eq!(mid.y.abs(), 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_two_lines() {
        let params = lines("line,x,y,z\nA,0,0,0\nA,1,0,0\nA,2,0,0\nB,0,5,0\nB,1,5,0\nB,2,5,0\n");
        let mesh = build_ribbons(&params, 0.5).unwrap();
        assert_eq!(mesh.vertex_count(), 12);
        assert_eq!(mesh.triangle_count(), 8);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_short_trailing_line_rejected() {
        let params = lines("line,x,y,z\nA,0,0,0\nA,1,0,0\nA,2,0,0\nB,0,5,0\nB,1,5,0\n");
        assert!(matches!(build_ribbons(&params, 1.0), Err(Error::InvalidPolyline(_))));
    }

    #[test]
    fn test_single_row_rejected() {
        let params = lines("line,x,y,z\n1,0,0,0\n");
        assert!(matches!(build_ribbons(&params, 1.0), Err(Error::InvalidPolyline(_))));
    }

    #[test]
    fn test_two_colors_per_section() {
        let params = lines("line,x,y,z,mag\n1,0,0,0,0\n1,1,0,0,1\n1,2,0,0,2\n").with_value_column("mag");
        let mut mesh = build_ribbons(&params, 1.0).unwrap();
        color_ribbons(&mut mesh, &params, ColormapKind::Seismic, None).unwrap();
        assert_eq!(mesh.colors.len(), mesh.positions.len());
        assert_eq!(mesh.color(0), mesh.color(1));
        assert_eq!(mesh.color(2), Some([1.0, 1.0, 1.0]));
        assert_eq!(mesh.color(5), Some([1.0, 0.0, 0.0]));
    }
}
