// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Geolayer Core Importers
//!
//! Parsers that turn raw geological data files into typed layer parameters.
//!
//! ## Overview
//!
//! - **Drillhole** (`.dh`): collar, orientation, interval depths and observation rows
//! - **Volume** (`.mesh`): hexahedral voxels with per-vertex scalars, singly or as an ensemble
//! - **Lines / Points** (CSV): header plus raw rows, column roles chosen later
//! - **Surface** (GeoTIFF): band-interleaved samples with origin and resolution
//!
//! Positional formats fail fast: any shortfall against a declared count is a
//! [`Error::Malformed`] naming the 1-based line.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use geolayer_core::{import_parameters, ImportSource, LayerKind, SurfaceImportOptions};
//!
//! let source = ImportSource::new("hole.dh", std::fs::read("hole.dh")?);
//! let (params, label) =
//!     import_parameters(LayerKind::Drillhole, &[source], SurfaceImportOptions::default()).await?;
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for parsed parameters

pub mod drillhole;
pub mod error;
pub mod fast_parse;
pub mod import;
pub mod kind;
pub mod params;
pub mod raster;
pub mod table;
pub mod volume;

pub use drillhole::{parse_drillhole, DrillholeParameters};
pub use error::{Error, Result};
pub use fast_parse::{parse_f64, parse_usize, LineCursor};
pub use import::{import_parameters, ImportSource};
pub use kind::LayerKind;
pub use params::LayerParameters;
pub use raster::{decode_band, decode_raster, RasterParameters, SurfaceImportOptions, DEFAULT_NO_DATA};
pub use table::{parse_table, ColumnTable, LinesParameters, PointsParameters};
pub use volume::{parse_volume, EnsembleParameters, VolumeParameters};
