// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Layer kind keys
//!
//! The string keys written into project files. Resolution is a plain match,
//! so every key is known at compile time.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// The renderable layer variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayerKind {
    Surface,
    Lines,
    Points,
    Drillhole,
    Volume,
    MultiVolume,
    Ensemble,
}

impl LayerKind {
    pub const ALL: [LayerKind; 7] = [
        LayerKind::Surface,
        LayerKind::Lines,
        LayerKind::Points,
        LayerKind::Drillhole,
        LayerKind::Volume,
        LayerKind::MultiVolume,
        LayerKind::Ensemble,
    ];

    /// Project-file key
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKind::Surface => "Surface",
            LayerKind::Lines => "Lines",
            LayerKind::Points => "Points",
            LayerKind::Drillhole => "Drillhole",
            LayerKind::Volume => "Volume",
            LayerKind::MultiVolume => "MultiVolume",
            LayerKind::Ensemble => "Ensemble",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for LayerKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Surface" => Ok(LayerKind::Surface),
            "Lines" => Ok(LayerKind::Lines),
            "Points" => Ok(LayerKind::Points),
            "Drillhole" => Ok(LayerKind::Drillhole),
            "Volume" => Ok(LayerKind::Volume),
            "MultiVolume" => Ok(LayerKind::MultiVolume),
            "Ensemble" => Ok(LayerKind::Ensemble),
            other => Err(Error::UnknownLayerKind(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_resolve_back() {
        for kind in LayerKind::ALL {
            assert_eq!(kind.as_str().parse::<LayerKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_key() {
        assert!(matches!(
            "Mesh".parse::<LayerKind>(),
            Err(Error::UnknownLayerKind(k)) if k == "Mesh"
        ));
    }
}
