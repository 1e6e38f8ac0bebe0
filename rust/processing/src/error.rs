// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for layers, slots and projects.

use thiserror::Error;

/// Result type for layer and pool operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Geometry error: {0}")]
    Geometry(#[from] geolayer_geometry::Error),

    #[error("Import error: {0}")]
    Core(#[from] geolayer_core::Error),

    #[error("Layer has not been initialized")]
    NotInitialized,

    #[error("No empty slot left in a pool of {0}")]
    PoolFull(usize),

    #[error("Slot {index} out of range for a pool of {len}")]
    SlotOutOfRange { index: usize, len: usize },

    #[error("Unknown layer kind: {0}")]
    UnknownLayerKind(String),

    #[error("Malformed slot record: {0}")]
    MalformedRecord(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid style operation: {0}")]
    InvalidStyle(String),

    #[error("Slot pool lock poisoned")]
    PoolPoisoned,
}
