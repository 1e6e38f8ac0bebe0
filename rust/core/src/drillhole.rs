// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Drillhole (`.dh`) importer
//!
//! Layout:
//!
//! ```text
//! collarX collarY collarZ dip dipDirection intervalStep
//! N                       <- interval count
//! depth_1 .. depth_N      <- one per line
//! M                       <- observation row count
//! value_1_1 .. value_M_N  <- M rows of N values, one value per line
//! ```

use crate::error::Result;
use crate::fast_parse::LineCursor;

const FORMAT: &str = "drillhole";

/// Parsed drillhole survey
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DrillholeParameters {
    pub collar: [f64; 3],
    /// Degrees below the horizon
    pub dip: f64,
    /// Degrees clockwise from north
    pub dip_direction: f64,
    /// `intervalStep * (N - 1)`
    pub length: f64,
    pub intervals: Vec<f64>,
    /// `M` rows of `N` values each
    pub observations: Vec<Vec<f64>>,
}

impl DrillholeParameters {
    #[inline]
    pub fn num_intervals(&self) -> usize {
        self.intervals.len()
    }

    #[inline]
    pub fn num_observations(&self) -> usize {
        self.observations.len()
    }
}

/// Parse a `.dh` document; any shortfall against the declared counts fails
pub fn parse_drillhole(text: &str) -> Result<DrillholeParameters> {
    let mut cursor = LineCursor::new(FORMAT, text);

    let [x, y, z, dip, dip_direction, step] = cursor.next_f64_row::<6>("collar/orientation header")?;

    let num_intervals = cursor.next_count("interval count")?;
    let mut intervals = Vec::with_capacity(cursor.capacity_for(num_intervals));
    for i in 0..num_intervals {
        intervals.push(cursor.next_f64(&format!("interval depth {} of {}", i + 1, num_intervals))?);
    }

    let num_observations = cursor.next_count("observation count")?;
    if num_intervals == 0 && num_observations > 0 {
        return Err(cursor.error(format!(
            "{} observation rows declared for a hole without intervals",
            num_observations
        )));
    }
    let mut observations = Vec::with_capacity(cursor.capacity_for(num_observations));
    for row in 0..num_observations {
        let mut values = Vec::with_capacity(cursor.capacity_for(num_intervals));
        for col in 0..num_intervals {
            values.push(cursor.next_f64(&format!(
                "observation {} value {} of {}",
                row + 1,
                col + 1,
                num_intervals
            ))?);
        }
        observations.push(values);
    }

    let length = step * num_intervals.saturating_sub(1) as f64;
    if !length.is_finite() {
        return Err(cursor.error(format!("hole length overflows ({} intervals of {})", num_intervals, step)));
    }

    cursor.finish()?;

    Ok(DrillholeParameters {
        collar: [x, y, z],
        dip,
        dip_direction,
        length,
        intervals,
        observations,
    })
}
