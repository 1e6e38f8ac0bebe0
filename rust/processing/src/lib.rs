// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geolayer Processing
//!
//! Layer objects built from import parameters, the fixed-size slot pool
//! that holds them, and the project file format that saves and restores
//! the pool.
//!
//! ```no_run
//! use geolayer_core::{ImportSource, LayerKind};
//! use geolayer_processing::{SlotPool, ViewerConfig};
//!
//! # async fn run() -> geolayer_processing::Result<()> {
//! let pool = SlotPool::new(ViewerConfig::from_env());
//! let source = ImportSource::new("block.mesh", std::fs::read("block.mesh").unwrap_or_default());
//! let slot = pool.import_sources(LayerKind::MultiVolume, &[source]).await?;
//! pool.update(slot, |layer| layer.set_opacity(0.5))?;
//! let project = pool.save_project()?;
//! # let _ = project;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod layer;
pub mod pool;
pub mod project;
pub mod slot;
pub mod style;

pub use config::ViewerConfig;
pub use error::{Error, Result};
pub use layer::{
    DrillholeLayer, EnsembleLayer, Layer, LinesLayer, MultiVolumeLayer, PointsLayer, SurfaceLayer,
    VolumeLayer,
};
pub use pool::SlotPool;
pub use project::{decode_project, encode_project, SEPARATOR};
pub use slot::LayerSlot;
pub use style::{LayerStyle, Material, RenderItem, Scene};
