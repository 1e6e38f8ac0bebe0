// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Async import dispatch
//!
//! Raw bytes come in (already read by whoever owns the file system), typed
//! [`LayerParameters`] come out. Decoding is CPU-bound; the `async`
//! surface lets callers interleave imports with other work.

use futures_util::future::try_join_all;

use crate::drillhole::parse_drillhole;
use crate::error::{Error, Result};
use crate::kind::LayerKind;
use crate::params::LayerParameters;
use crate::raster::{decode_band, decode_raster, SurfaceImportOptions};
use crate::table::{parse_table, LinesParameters, PointsParameters};
use crate::volume::{parse_volume, EnsembleParameters, VolumeParameters};

/// One input file: display name plus raw contents
#[derive(Debug, Clone)]
pub struct ImportSource {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ImportSource {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Unnamed text source (pasted or generated content)
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            bytes: text.into().into_bytes(),
        }
    }

    fn as_text(&self) -> Result<&str> {
        Ok(std::str::from_utf8(&self.bytes)?)
    }
}

/// Import `sources` as a layer of `kind`
///
/// Returns the parameters plus a default label: the first file name, or
/// `"New <Kind>"` for unnamed sources. Surfaces take extra sources as
/// additional bands; ensembles take one source per realization. Every other
/// kind reads the first source only.
pub async fn import_parameters(
    kind: LayerKind,
    sources: &[ImportSource],
    options: SurfaceImportOptions,
) -> Result<(LayerParameters, String)> {
    let first = sources
        .first()
        .ok_or_else(|| Error::MissingSource(format!("{} import needs at least one file", kind)))?;

    let params = match kind {
        LayerKind::Surface => LayerParameters::Surface(import_surface(sources, options).await?),
        LayerKind::Lines => LayerParameters::Lines(import_lines(first).await?),
        LayerKind::Points => LayerParameters::Points(import_points(first).await?),
        LayerKind::Drillhole => LayerParameters::Drillhole(parse_drillhole(first.as_text()?)?),
        LayerKind::Volume => LayerParameters::Volume(import_volume(first).await?),
        LayerKind::MultiVolume => LayerParameters::MultiVolume(import_volume(first).await?),
        LayerKind::Ensemble => LayerParameters::Ensemble(import_ensemble(sources).await?),
    };

    let label = if first.name.is_empty() {
        format!("New {}", kind)
    } else {
        first.name.clone()
    };

    Ok((params, label))
}

async fn import_surface(
    sources: &[ImportSource],
    options: SurfaceImportOptions,
) -> Result<crate::raster::RasterParameters> {
    let (first, extra) = sources
        .split_first()
        .ok_or_else(|| Error::MissingSource("surface raster".to_string()))?;
    let mut raster = decode_raster(&first.bytes, options)?;
    for source in extra {
        raster.add_band(&decode_band(&source.bytes)?)?;
    }
    Ok(raster)
}

async fn import_lines(source: &ImportSource) -> Result<LinesParameters> {
    Ok(LinesParameters::new(parse_table(source.as_text()?)?))
}

async fn import_points(source: &ImportSource) -> Result<PointsParameters> {
    Ok(PointsParameters::new(parse_table(source.as_text()?)?))
}

async fn import_volume(source: &ImportSource) -> Result<VolumeParameters> {
    parse_volume(source.as_text()?)
}

/// Each realization is parsed independently; the first failure aborts the
/// whole ensemble.
async fn import_ensemble(sources: &[ImportSource]) -> Result<EnsembleParameters> {
    let realization_parameters = try_join_all(sources.iter().map(import_volume)).await?;
    Ok(EnsembleParameters {
        realization_parameters,
        file_names: sources.iter().map(|s| s.name.clone()).collect(),
    })
}
