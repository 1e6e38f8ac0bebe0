// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Swept tube along a parametric path
//!
//! Used for drillholes: a circular cross-section is swept along the hole
//! path using discrete Frenet frames, so the rings never twist abruptly.

use nalgebra::{Point3, Rotation3, Unit, Vector3};

use geolayer_core::DrillholeParameters;

use crate::colormap::Colormap;
use crate::error::{Error, Result};
use crate::mesh::Mesh;

const EPSILON: f64 = 1e-10;

/// A curve parametrised over `t ∈ [0, 1]`
pub trait SweepPath {
    fn point_at(&self, t: f64) -> Point3<f64>;

    /// Unit tangent at `t`
    fn tangent_at(&self, t: f64) -> Vector3<f64>;
}

/// Straight drillhole trace from the collar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrillholePath {
    collar: Point3<f64>,
    direction: Vector3<f64>,
    length: f64,
}

impl DrillholePath {
    /// `dip` in degrees below the horizon, `dip_direction` in degrees
    /// clockwise from north (+y)
    pub fn new(collar: [f64; 3], dip: f64, dip_direction: f64, length: f64) -> Self {
        let theta = dip_direction.to_radians();
        let phi = dip.to_radians();
        Self {
            collar: Point3::new(collar[0], collar[1], collar[2]),
            direction: Vector3::new(phi.cos() * theta.sin(), phi.cos() * theta.cos(), -phi.sin()),
            length,
        }
    }

    pub fn from_parameters(params: &DrillholeParameters) -> Self {
        Self::new(params.collar, params.dip, params.dip_direction, params.length)
    }

    #[inline]
    pub fn collar(&self) -> Point3<f64> {
        self.collar
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }
}

impl SweepPath for DrillholePath {
    fn point_at(&self, t: f64) -> Point3<f64> {
        self.collar + self.direction * (t * self.length)
    }

    fn tangent_at(&self, _t: f64) -> Vector3<f64> {
        self.direction
    }
}

/// Tangent, normal and binormal at each path station
#[derive(Debug, Clone, Default)]
pub struct FrenetFrames {
    pub tangents: Vec<Vector3<f64>>,
    pub normals: Vec<Vector3<f64>>,
    pub binormals: Vec<Vector3<f64>>,
}

impl FrenetFrames {
    #[inline]
    pub fn len(&self) -> usize {
        self.tangents.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tangents.is_empty()
    }
}

fn rotate(v: &Vector3<f64>, axis: &Vector3<f64>, angle: f64) -> Vector3<f64> {
    Rotation3::from_axis_angle(&Unit::new_normalize(*axis), angle) * v
}

/// Parallel-transport frames at `segments + 1` evenly spaced stations
///
/// The first normal is seeded from the world axis least aligned with the
/// initial tangent. For closed paths the accumulated twist between the first
/// and last normal is spread evenly over the stations.
pub fn compute_frenet_frames<P: SweepPath + ?Sized>(path: &P, segments: usize, closed: bool) -> FrenetFrames {
    let segments = segments.max(1);
    let tangents: Vec<Vector3<f64>> = (0..=segments)
        .map(|i| {
            let t = path.tangent_at(i as f64 / segments as f64);
            t.try_normalize(EPSILON).unwrap_or_else(Vector3::z)
        })
        .collect();

    let t0 = tangents[0];
    let (tx, ty, tz) = (t0.x.abs(), t0.y.abs(), t0.z.abs());
    let mut min = f64::MAX;
    let mut seed = Vector3::x();
    if tx <= min {
        min = tx;
        seed = Vector3::x();
    }
    if ty <= min {
        min = ty;
        seed = Vector3::y();
    }
    if tz <= min {
        seed = Vector3::z();
    }

    let side = t0.cross(&seed).normalize();
    let n0 = t0.cross(&side);
    let b0 = t0.cross(&n0);

    let mut normals = Vec::with_capacity(segments + 1);
    let mut binormals = Vec::with_capacity(segments + 1);
    normals.push(n0);
    binormals.push(b0);

    for i in 1..=segments {
        let mut normal = normals[i - 1];
        let axis = tangents[i - 1].cross(&tangents[i]);
        if axis.norm() > EPSILON {
            let theta = tangents[i - 1].dot(&tangents[i]).clamp(-1.0, 1.0).acos();
            normal = rotate(&normal, &axis, theta);
        }
        binormals.push(tangents[i].cross(&normal));
        normals.push(normal);
    }

    if closed {
        let mut theta = normals[0].dot(&normals[segments]).clamp(-1.0, 1.0).acos() / segments as f64;
        if tangents[0].dot(&normals[0].cross(&normals[segments])) > 0.0 {
            theta = -theta;
        }
        for i in 1..=segments {
            normals[i] = rotate(&normals[i], &tangents[i], theta * i as f64);
            binormals[i] = tangents[i].cross(&normals[i]);
        }
    }

    FrenetFrames {
        tangents,
        normals,
        binormals,
    }
}

/// Tube tessellation parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TubeSpec {
    pub tubular_segments: usize,
    pub radius: f64,
    pub radial_segments: usize,
    /// A closed tube reuses the first ring as its last
    pub closed: bool,
}

impl TubeSpec {
    pub fn new(tubular_segments: usize, radius: f64, radial_segments: usize) -> Self {
        Self {
            tubular_segments: tubular_segments.max(1),
            radius,
            radial_segments: radial_segments.max(3),
            closed: false,
        }
    }

    pub fn closed(mut self, closed: bool) -> Self {
        self.closed = closed;
        self
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        (self.tubular_segments + 1) * (self.radial_segments + 1)
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        2 * self.tubular_segments * self.radial_segments
    }

    /// Path station that ring `ring` sits on
    #[inline]
    pub fn station(&self, ring: usize) -> usize {
        if self.closed && ring == self.tubular_segments {
            0
        } else {
            ring
        }
    }
}

/// Sweep a `radial_segments`-gon of `radius` along `path`
pub fn build_tube<P: SweepPath + ?Sized>(path: &P, spec: &TubeSpec) -> Mesh {
    let ts = spec.tubular_segments.max(1);
    let rs = spec.radial_segments.max(3);
    let frames = compute_frenet_frames(path, ts, spec.closed);

    let mut mesh = Mesh::with_capacity((ts + 1) * (rs + 1), 6 * ts * rs);

    for ring in 0..=ts {
        let station = spec.station(ring);
        let center = path.point_at(station as f64 / ts as f64);
        let n = frames.normals[station];
        let b = frames.binormals[station];

        for j in 0..=rs {
            let v = j as f64 / rs as f64 * std::f64::consts::TAU;
            let normal = (n * -v.cos() + b * v.sin())
                .try_normalize(EPSILON)
                .unwrap_or(n);
            mesh.add_vertex(
                center + normal * spec.radius,
                normal,
                [ring as f64 / ts as f64, j as f64 / rs as f64],
            );
        }
    }

    let stride = (rs + 1) as u32;
    for j in 1..=ts as u32 {
        for i in 1..=rs as u32 {
            let a = stride * (j - 1) + (i - 1);
            let b = stride * j + (i - 1);
            let c = stride * j + i;
            let d = stride * (j - 1) + i;
            mesh.add_triangle(a, b, d);
            mesh.add_triangle(b, c, d);
        }
    }

    mesh
}

/// Colour every ring from `values[station]`
///
/// Stations past the end of `values` reuse its last entry.
pub fn tube_colors(mesh: &mut Mesh, spec: &TubeSpec, values: &[f64], cmap: &Colormap) -> Result<()> {
    let Some(&last) = values.last() else {
        return Err(Error::InvalidValue("no values to colour the tube".to_string()));
    };
    let rs = spec.radial_segments.max(3);
    let colors = (0..=spec.tubular_segments.max(1)).flat_map(|ring| {
        let value = values.get(spec.station(ring)).copied().unwrap_or(last);
        std::iter::repeat(cmap.eval(value)).take(rs + 1)
    });
    mesh.set_colors(colors)
}
