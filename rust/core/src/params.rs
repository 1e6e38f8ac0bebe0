// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Import parameters, one payload per layer kind

use crate::drillhole::DrillholeParameters;
use crate::kind::LayerKind;
use crate::raster::RasterParameters;
use crate::table::{LinesParameters, PointsParameters};
use crate::volume::{EnsembleParameters, VolumeParameters};

/// Parsed import payload tagged with the layer kind it feeds
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LayerParameters {
    Surface(RasterParameters),
    Lines(LinesParameters),
    Points(PointsParameters),
    Drillhole(DrillholeParameters),
    Volume(VolumeParameters),
    MultiVolume(VolumeParameters),
    Ensemble(EnsembleParameters),
}

impl LayerParameters {
    pub fn kind(&self) -> LayerKind {
        match self {
            LayerParameters::Surface(_) => LayerKind::Surface,
            LayerParameters::Lines(_) => LayerKind::Lines,
            LayerParameters::Points(_) => LayerKind::Points,
            LayerParameters::Drillhole(_) => LayerKind::Drillhole,
            LayerParameters::Volume(_) => LayerKind::Volume,
            LayerParameters::MultiVolume(_) => LayerKind::MultiVolume,
            LayerParameters::Ensemble(_) => LayerKind::Ensemble,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tag() {
        let volume = VolumeParameters::default();
        assert_eq!(LayerParameters::Volume(volume.clone()).kind(), LayerKind::Volume);
        assert_eq!(LayerParameters::MultiVolume(volume).kind(), LayerKind::MultiVolume);
        assert_eq!(
            LayerParameters::Ensemble(EnsembleParameters::default()).kind(),
            LayerKind::Ensemble
        );
    }
}
