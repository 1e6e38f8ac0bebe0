// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Project files: slot records joined by a separator line
//!
//! Records are restored by position. A record that fails to restore is
//! logged and its slot left empty; the rest of the project still loads.

use tracing::{info, warn};

use crate::config::ViewerConfig;
use crate::error::Result;
use crate::slot::LayerSlot;

/// Line between two slot records
pub const SEPARATOR: &str = "\n---\n";

/// Join every slot's record, empty slots included
pub fn encode_project(slots: &[LayerSlot]) -> Result<String> {
    let records = slots.iter().map(LayerSlot::to_record).collect::<Result<Vec<_>>>()?;
    Ok(records.join(SEPARATOR))
}

/// Restore `slot_count` slots from project text
///
/// Slots the project does not mention stay empty. Records past
/// `slot_count` are ignored.
pub async fn decode_project(text: &str, slot_count: usize, config: &ViewerConfig) -> Vec<LayerSlot> {
    let mut slots: Vec<LayerSlot> = (0..slot_count).map(|i| LayerSlot::empty(i.to_string())).collect();

    let mut restored = 0usize;
    let mut skipped = 0usize;
    for (index, record) in text.split(SEPARATOR).enumerate() {
        if record.trim().is_empty() {
            continue;
        }
        if index >= slot_count {
            warn!(slot = index, slot_count, "project has more records than slots, ignoring the rest");
            break;
        }
        match LayerSlot::from_record(record, config).await {
            Ok(slot) => {
                if slot.layer().is_some() {
                    restored += 1;
                }
                slots[index] = slot;
            }
            Err(e) => {
                skipped += 1;
                warn!(slot = index, error = %e, "skipping unreadable project record");
            }
        }
    }

    info!(restored, skipped, "project loaded");
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use geolayer_core::{parse_volume, LayerParameters};

    #[tokio::test]
    async fn test_empty_project_round_trip() {
        let slots: Vec<LayerSlot> = (0..3).map(|i| LayerSlot::empty(i.to_string())).collect();
        let text = encode_project(&slots).unwrap();
        assert_eq!(text.matches(SEPARATOR).count(), 2);

        let restored = decode_project(&text, 3, &ViewerConfig::from_env()).await;
        assert_eq!(restored, slots);
    }

    #[tokio::test]
    async fn test_unknown_kind_skipped() {
        let config = ViewerConfig::from_env();
        let mut volume = LayerSlot::empty("2");
        volume
            .set(
                LayerParameters::Volume(parse_volume("1\n0 0 0\n0\n5\n").unwrap()),
                "v",
                &config,
            )
            .await
            .unwrap();

        let records = [
            LayerSlot::empty("0").to_record().unwrap(),
            "ID: 1\nvisible: true\nchecked: true\nlabel: odd\nobject: Hologram\n{}".to_string(),
            volume.to_record().unwrap(),
        ];
        let restored = decode_project(&records.join(SEPARATOR), 4, &config).await;

        assert_eq!(restored.len(), 4);
        assert!(restored[1].layer().is_none());
        assert!(restored[1].is_empty());
        assert_eq!(restored[2].label, "v");
        assert!(restored[2].layer().is_some());
        assert!(restored[3].is_empty());
    }

    #[tokio::test]
    async fn test_extra_records_ignored() {
        let slots: Vec<LayerSlot> = (0..5).map(|i| LayerSlot::empty(i.to_string())).collect();
        let text = encode_project(&slots).unwrap();
        let restored = decode_project(&text, 2, &ViewerConfig::from_env()).await;
        assert_eq!(restored.len(), 2);
        assert_eq!(restored[1].id(), "1");
    }
}
