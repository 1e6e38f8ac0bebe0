// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raster surface importer
//!
//! Any decoder that yields a band-interleaved sample array plus origin,
//! resolution and band count can feed a surface. GeoTIFF is decoded here
//! with the `tiff` crate; other sources build [`RasterParameters`] directly
//! with [`RasterParameters::from_samples`].

use std::io::Cursor;

use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;

use crate::error::{Error, Result};

/// Default no-data sentinel for elevation rasters
pub const DEFAULT_NO_DATA: f64 = -32767.0;

/// Caller-supplied surface import options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceImportOptions {
    pub no_data: f64,
    /// 1-based band that drives vertex elevation
    pub elevation_band: usize,
    /// 1-based band that drives vertex colour
    pub color_band: usize,
}

impl Default for SurfaceImportOptions {
    fn default() -> Self {
        Self {
            no_data: DEFAULT_NO_DATA,
            elevation_band: 1,
            color_band: 1,
        }
    }
}

/// Decoded raster: flattened, band-interleaved samples plus georeferencing
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RasterParameters {
    /// `(ix + width * iy) * n_bands + band - 1`
    pub data: Vec<f32>,
    pub width: usize,
    pub height: usize,
    pub n_bands: usize,
    /// Model coordinates of pixel (0, 0)
    pub origin: [f64; 2],
    /// Per-pixel step along x and y (y is negative for north-up images)
    pub resolution: [f64; 2],
    pub no_data: f64,
    pub elevation_band: usize,
    pub color_band: usize,
}

impl RasterParameters {
    /// Wrap already-decoded samples, validating sizes and band selections
    ///
    /// Non-finite samples become the no-data sentinel.
    pub fn from_samples(
        data: Vec<f32>,
        width: usize,
        height: usize,
        n_bands: usize,
        origin: [f64; 2],
        resolution: [f64; 2],
        options: SurfaceImportOptions,
    ) -> Result<Self> {
        let mut params = Self {
            data,
            width,
            height,
            n_bands,
            origin,
            resolution,
            no_data: options.no_data,
            elevation_band: options.elevation_band,
            color_band: options.color_band,
        };
        params.validate()?;
        params.fill_non_finite();
        Ok(params)
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Check the sample count, band selections and georeferencing
    pub fn validate(&self) -> Result<()> {
        let georef = [self.no_data, self.origin[0], self.origin[1], self.resolution[0], self.resolution[1]];
        if georef.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidRaster(format!(
                "no-data {} origin {:?} resolution {:?} must be finite",
                self.no_data, self.origin, self.resolution
            )));
        }
        if self.width == 0 || self.height == 0 || self.n_bands == 0 {
            return Err(Error::InvalidRaster(format!(
                "empty raster ({}x{}, {} bands)",
                self.width, self.height, self.n_bands
            )));
        }
        let expected = self.pixel_count() * self.n_bands;
        if self.data.len() != expected {
            return Err(Error::InvalidRaster(format!(
                "expected {} samples for {}x{}x{}, found {}",
                expected,
                self.width,
                self.height,
                self.n_bands,
                self.data.len()
            )));
        }
        for (role, band) in [("elevation", self.elevation_band), ("color", self.color_band)] {
            if band == 0 || band > self.n_bands {
                return Err(Error::InvalidRaster(format!(
                    "{} band {} outside 1..={}",
                    role, band, self.n_bands
                )));
            }
        }
        Ok(())
    }

    /// Sample of `band` (1-based) at pixel `(ix, iy)`
    #[inline]
    pub fn sample(&self, ix: usize, iy: usize, band: usize) -> f64 {
        self.data[(ix + self.width * iy) * self.n_bands + band - 1] as f64
    }

    #[inline]
    pub fn is_no_data(&self, value: f64) -> bool {
        value == self.no_data
    }

    /// Min and max of a band, ignoring no-data samples
    pub fn band_range(&self, band: usize) -> Option<(f64, f64)> {
        if band == 0 || band > self.n_bands {
            return None;
        }
        self.data
            .iter()
            .skip(band - 1)
            .step_by(self.n_bands)
            .map(|&v| v as f64)
            .filter(|&v| !self.is_no_data(v))
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Replace NaN and infinite samples with the no-data sentinel
    pub fn fill_non_finite(&mut self) {
        let fill = self.no_data as f32;
        for v in self.data.iter_mut().filter(|v| !v.is_finite()) {
            *v = fill;
        }
    }

    /// Interleave one extra band taken from another single-band raster
    pub fn add_band(&mut self, samples: &[f32]) -> Result<()> {
        if samples.len() != self.pixel_count() {
            return Err(Error::InvalidRaster(format!(
                "new band has {} samples, surface has {} pixels",
                samples.len(),
                self.pixel_count()
            )));
        }
        let bands = self.n_bands;
        let fill = self.no_data as f32;
        let mut data = Vec::with_capacity(self.pixel_count() * (bands + 1));
        for (pixel, &extra) in self.data.chunks_exact(bands).zip(samples) {
            data.extend_from_slice(pixel);
            data.push(if extra.is_finite() { extra } else { fill });
        }
        self.data = data;
        self.n_bands += 1;
        Ok(())
    }
}

/// Decode a (Geo)TIFF into interleaved samples
///
/// Origin and resolution come from `ModelTiepoint` + `ModelPixelScale`, or
/// from `ModelTransformation`. Images without either fall back to a unit
/// pixel grid at the origin.
pub fn decode_raster(bytes: &[u8], options: SurfaceImportOptions) -> Result<RasterParameters> {
    let mut decoder = Decoder::new(Cursor::new(bytes))?;

    let (width, height) = decoder.dimensions()?;
    let width = width as usize;
    let height = height as usize;

    let (origin, resolution) = read_georeference(&mut decoder)?;

    let data = samples_to_f32(decoder.read_image()?);

    let pixels = width * height;
    if pixels == 0 || data.len() % pixels != 0 {
        return Err(Error::InvalidRaster(format!(
            "{} samples do not tile a {}x{} image",
            data.len(),
            width,
            height
        )));
    }
    let n_bands = data.len() / pixels;

    RasterParameters::from_samples(data, width, height, n_bands, origin, resolution, options)
}

/// Decode only the first band of a (Geo)TIFF, for [`RasterParameters::add_band`]
pub fn decode_band(bytes: &[u8]) -> Result<Vec<f32>> {
    let mut decoder = Decoder::new(Cursor::new(bytes))?;
    let (width, height) = decoder.dimensions()?;
    let pixels = width as usize * height as usize;
    let data = samples_to_f32(decoder.read_image()?);
    if pixels == 0 || data.len() % pixels != 0 {
        return Err(Error::InvalidRaster("band does not tile its image".to_string()));
    }
    let bands = data.len() / pixels;
    Ok(data.into_iter().step_by(bands).collect())
}

fn read_georeference<R: std::io::Read + std::io::Seek>(
    decoder: &mut Decoder<R>,
) -> Result<([f64; 2], [f64; 2])> {
    let tiepoint = decoder
        .find_tag(Tag::ModelTiepointTag)?
        .map(|v| v.into_f64_vec())
        .transpose()?;
    let scale = decoder
        .find_tag(Tag::ModelPixelScaleTag)?
        .map(|v| v.into_f64_vec())
        .transpose()?;

    if let (Some(tie), Some(scale)) = (&tiepoint, &scale) {
        if tie.len() >= 6 && scale.len() >= 2 {
            return Ok(([tie[3], tie[4]], [scale[0], -scale[1]]));
        }
    }

    let transform = decoder
        .find_tag(Tag::ModelTransformationTag)?
        .map(|v| v.into_f64_vec())
        .transpose()?;
    if let Some(t) = transform {
        if t.len() >= 16 {
            return Ok(([t[3], t[7]], [t[0], t[5]]));
        }
    }

    Ok(([0.0, 0.0], [1.0, 1.0]))
}

fn samples_to_f32(result: DecodingResult) -> Vec<f32> {
    match result {
        DecodingResult::U8(data) => data.iter().map(|&v| v as f32).collect(),
        DecodingResult::U16(data) => data.iter().map(|&v| v as f32).collect(),
        DecodingResult::U32(data) => data.iter().map(|&v| v as f32).collect(),
        DecodingResult::U64(data) => data.iter().map(|&v| v as f32).collect(),
        DecodingResult::I8(data) => data.iter().map(|&v| v as f32).collect(),
        DecodingResult::I16(data) => data.iter().map(|&v| v as f32).collect(),
        DecodingResult::I32(data) => data.iter().map(|&v| v as f32).collect(),
        DecodingResult::I64(data) => data.iter().map(|&v| v as f32).collect(),
        DecodingResult::F32(data) => data,
        DecodingResult::F64(data) => data.iter().map(|&v| v as f32).collect(),
    }
}
