// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building layer meshes
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid raster: {0}")]
    InvalidRaster(String),

    #[error("Invalid polyline: {0}")]
    InvalidPolyline(String),

    #[error("Invalid volume: {0}")]
    InvalidVolume(String),

    /// A built mesh breaks the buffer invariants
    #[error("Invalid mesh buffer: {0}")]
    InvalidBuffer(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Import error: {0}")]
    Core(#[from] geolayer_core::Error),
}
