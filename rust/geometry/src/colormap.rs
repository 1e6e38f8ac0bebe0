// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scalar-to-colour mapping
//!
//! A value is mapped into `[0, 1]` by `(T(x) - T(min)) / (T(max) - T(min))`
//! and placed between evenly spaced colour stops. A degenerate domain
//! (`min == max`) always yields the first stop.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Linear RGB colour with components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// `0xRRGGBB`
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f64 / 255.0,
            g: ((hex >> 8) & 0xff) as f64 / 255.0,
            b: (hex & 0xff) as f64 / 255.0,
        }
    }

    #[inline]
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        Rgb {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    #[inline]
    pub fn to_f32(self) -> [f32; 3] {
        [self.r as f32, self.g as f32, self.b as f32]
    }
}

/// Monotonic transform applied before normalisation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    Log10,
}

impl Transform {
    #[inline]
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Transform::Log10 => value.log10(),
        }
    }

    /// Styler name: `"None"` selects no transform, `"Log"` selects log10
    pub fn from_name(name: &str) -> Result<Option<Transform>, Error> {
        match name.trim() {
            "None" | "" => Ok(None),
            "Log" | "Log10" => Ok(Some(Transform::Log10)),
            other => Err(Error::InvalidValue(format!("unknown transform '{}'", other))),
        }
    }
}

/// Evenly spaced colour stops over a value domain
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    stops: Vec<Rgb>,
    interpolate: bool,
    transform: Option<Transform>,
    min: f64,
    max: f64,
}

impl Colormap {
    pub fn new(stops: Vec<Rgb>, min: f64, max: f64) -> Self {
        Self {
            stops,
            interpolate: true,
            transform: None,
            min,
            max,
        }
    }

    pub fn with_transform(mut self, transform: Option<Transform>) -> Self {
        self.transform = transform;
        self
    }

    /// Without interpolation every value snaps to its nearest stop
    pub fn with_interpolation(mut self, interpolate: bool) -> Self {
        self.interpolate = interpolate;
        self
    }

    pub fn with_domain(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    #[inline]
    pub fn stops(&self) -> &[Rgb] {
        &self.stops
    }

    #[inline]
    pub fn domain(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    #[inline]
    pub fn transform(&self) -> Option<Transform> {
        self.transform
    }

    /// Colour for `value`
    ///
    /// Values outside the domain land on the nearest end stop. Non-finite
    /// positions (log of a non-positive value, NaN input) fall back to the
    /// first stop.
    pub fn eval(&self, value: f64) -> Rgb {
        let Some(&first) = self.stops.first() else {
            return Rgb::BLACK;
        };
        if self.min == self.max || self.stops.len() == 1 {
            return first;
        }

        let (v, lo, hi) = match self.transform {
            Some(t) => (t.apply(value), t.apply(self.min), t.apply(self.max)),
            None => (value, self.min, self.max),
        };

        let last = self.stops.len() - 1;
        let p = (v - lo) / (hi - lo) * last as f64;
        if !p.is_finite() {
            return first;
        }

        if !self.interpolate {
            let i = p.round().clamp(0.0, last as f64) as usize;
            return self.stops[i];
        }

        let below = (p.floor().max(0.0) as usize).min(last);
        let above = (p.ceil().max(0.0) as usize).min(last);
        let t = (p - below as f64).clamp(0.0, 1.0);
        self.stops[below].lerp(self.stops[above], t)
    }
}

/// Named colormap presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColormapKind {
    #[default]
    Terrain,
    Seismic,
}

impl ColormapKind {
    pub const ALL: [ColormapKind; 2] = [ColormapKind::Terrain, ColormapKind::Seismic];

    pub fn name(&self) -> &'static str {
        match self {
            ColormapKind::Terrain => "Terrain",
            ColormapKind::Seismic => "Seismic",
        }
    }

    pub fn stops(&self) -> Vec<Rgb> {
        match self {
            ColormapKind::Terrain => [
                0x09B2EB, 0x94DB65, 0x6CAD40, 0x2E8025, 0xD7F58C, 0x805B05, 0xA8A8A8, 0xE3EEFF,
                0xF2F7FF,
            ]
            .into_iter()
            .map(Rgb::from_hex)
            .collect(),
            ColormapKind::Seismic => vec![Rgb::new(0.0, 0.0, 1.0), Rgb::WHITE, Rgb::new(1.0, 0.0, 0.0)],
        }
    }

    /// Build the preset over `[min, max]`
    pub fn build(&self, min: f64, max: f64, transform: Option<Transform>) -> Colormap {
        Colormap::new(self.stops(), min, max).with_transform(transform)
    }
}

impl fmt::Display for ColormapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColormapKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Terrain" => Ok(ColormapKind::Terrain),
            "Seismic" => Ok(ColormapKind::Seismic),
            other => Err(Error::InvalidValue(format!("unknown colormap '{}'", other))),
        }
    }
}
