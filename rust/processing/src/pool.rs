// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fixed-size registry of layer slots
//!
//! Layers are built and initialized before the pool lock is taken; only the
//! first-empty-slot scan and the promotion run inside the critical section,
//! so concurrent imports never land in the same slot.

use std::sync::{Mutex, MutexGuard};

use geolayer_core::{import_parameters, ImportSource, LayerKind, LayerParameters};
use tracing::{debug, info};

use crate::config::ViewerConfig;
use crate::error::{Error, Result};
use crate::layer::Layer;
use crate::project::{decode_project, encode_project};
use crate::slot::LayerSlot;

/// Bounded set of layer slots shared by the viewer
#[derive(Debug)]
pub struct SlotPool {
    config: ViewerConfig,
    slots: Mutex<Vec<LayerSlot>>,
}

impl SlotPool {
    /// `config.slot_count` empty slots with ids `"0"`, `"1"`, ...
    pub fn new(config: ViewerConfig) -> Self {
        let slots = (0..config.slot_count).map(|i| LayerSlot::empty(i.to_string())).collect();
        Self {
            config,
            slots: Mutex::new(slots),
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<LayerSlot>>> {
        self.slots.lock().map_err(|_| Error::PoolPoisoned)
    }

    pub fn len(&self) -> usize {
        self.config.slot_count
    }

    pub fn is_empty(&self) -> bool {
        self.config.slot_count == 0
    }

    /// Build a layer from `parameters` and promote it into the first empty
    /// slot, returning that slot's index
    ///
    /// A build failure or a full pool leaves every slot untouched.
    pub async fn import(&self, parameters: LayerParameters, label: impl Into<String>) -> Result<usize> {
        let kind = parameters.kind();
        let mut layer = Layer::new(parameters, &self.config);
        layer.initialize().await?;

        let mut slots = self.lock()?;
        let index = slots
            .iter()
            .position(LayerSlot::is_empty)
            .ok_or(Error::PoolFull(slots.len()))?;
        slots[index].promote(layer, label);
        debug!(slot = index, kind = %kind, "layer promoted");
        Ok(index)
    }

    /// Decode raw sources for `kind`, then [`SlotPool::import`] them
    pub async fn import_sources(&self, kind: LayerKind, sources: &[ImportSource]) -> Result<usize> {
        let (parameters, label) = import_parameters(kind, sources, self.config.surface_options()).await?;
        self.import(parameters, label).await
    }

    pub fn get(&self, index: usize) -> Result<LayerSlot> {
        let slots = self.lock()?;
        slots.get(index).cloned().ok_or(Error::SlotOutOfRange {
            index,
            len: slots.len(),
        })
    }

    /// Empty slot `index`, dropping its layer
    pub fn reset(&self, index: usize) -> Result<()> {
        let mut slots = self.lock()?;
        let len = slots.len();
        let slot = slots.get_mut(index).ok_or(Error::SlotOutOfRange { index, len })?;
        slot.reset();
        debug!(slot = index, "slot reset");
        Ok(())
    }

    /// Copy of every slot
    pub fn snapshot(&self) -> Result<Vec<LayerSlot>> {
        Ok(self.lock()?.clone())
    }

    /// Swap in a new value for slot `index`, returning the old one
    pub fn replace(&self, index: usize, slot: LayerSlot) -> Result<LayerSlot> {
        let mut slots = self.lock()?;
        let len = slots.len();
        let current = slots.get_mut(index).ok_or(Error::SlotOutOfRange { index, len })?;
        Ok(std::mem::replace(current, slot))
    }

    /// Apply `update` to the layer in slot `index` through
    /// [`LayerSlot::with_update`]; a failed update changes nothing
    pub fn update<F>(&self, index: usize, update: F) -> Result<()>
    where
        F: FnOnce(&mut Layer) -> Result<()>,
    {
        let mut slots = self.lock()?;
        let len = slots.len();
        let current = slots.get_mut(index).ok_or(Error::SlotOutOfRange { index, len })?;
        *current = current.with_update(update)?;
        Ok(())
    }

    /// Project text for every slot
    pub fn save_project(&self) -> Result<String> {
        let slots = self.lock()?;
        let text = encode_project(&slots)?;
        info!(
            populated = slots.iter().filter(|s| s.layer().is_some()).count(),
            bytes = text.len(),
            "project saved"
        );
        Ok(text)
    }

    /// Replace every slot with the contents of a project file
    ///
    /// Layers are rebuilt before the lock is taken.
    pub async fn load_project(&self, text: &str) -> Result<usize> {
        let restored = decode_project(text, self.config.slot_count, &self.config).await;
        let populated = restored.iter().filter(|s| s.layer().is_some()).count();
        *self.lock()? = restored;
        Ok(populated)
    }
}

impl Default for SlotPool {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geolayer_core::parse_volume;

    fn pool(slots: usize) -> SlotPool {
        SlotPool::new(ViewerConfig {
            slot_count: slots,
            ..ViewerConfig::from_env()
        })
    }

    fn volume() -> LayerParameters {
        LayerParameters::Volume(parse_volume("1\n0 0 0\n0\n5\n").unwrap())
    }

    #[tokio::test]
    async fn test_lowest_empty_slot_first() {
        let pool = pool(3);
        assert_eq!(pool.import(volume(), "a").await.unwrap(), 0);
        assert_eq!(pool.import(volume(), "b").await.unwrap(), 1);
        pool.reset(0).unwrap();
        assert_eq!(pool.import(volume(), "c").await.unwrap(), 0);
        assert_eq!(pool.get(0).unwrap().label, "c");
    }

    #[tokio::test]
    async fn test_pool_full() {
        let pool = pool(1);
        pool.import(volume(), "a").await.unwrap();
        assert!(matches!(pool.import(volume(), "b").await, Err(Error::PoolFull(1))));
        assert_eq!(pool.get(0).unwrap().label, "a");
    }

    #[tokio::test]
    async fn test_failed_import_leaves_pool_unchanged() {
        let pool = pool(2);
        let before = pool.snapshot().unwrap();
        let broken = LayerParameters::Volume(geolayer_core::VolumeParameters {
            vertices: vec![[0.0; 3]],
            voxels: vec![[0, 0, 0, 0, 0, 0, 0, 9]],
            values: vec![1.0],
        });
        assert!(pool.import(broken, "bad").await.is_err());
        assert_eq!(pool.snapshot().unwrap(), before);
    }

    #[tokio::test]
    async fn test_out_of_range() {
        let pool = pool(2);
        assert!(matches!(pool.reset(2), Err(Error::SlotOutOfRange { index: 2, len: 2 })));
        assert!(pool.get(5).is_err());
    }

    #[tokio::test]
    async fn test_update_and_replace() {
        let pool = pool(2);
        let index = pool.import(volume(), "a").await.unwrap();
        pool.update(index, |layer| layer.set_opacity(0.5)).unwrap();
        assert_eq!(pool.get(index).unwrap().layer().unwrap().style().opacity, 0.5);

        assert!(pool.update(1, |layer| layer.set_opacity(0.5)).is_err());

        let old = pool.replace(index, LayerSlot::empty("0")).unwrap();
        assert_eq!(old.label, "a");
        assert!(pool.get(index).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_import_sources() {
        let pool = pool(2);
        let sources = [ImportSource::new("block.mesh", b"1\n0 0 0\n0\n5\n".to_vec())];
        let index = pool.import_sources(LayerKind::MultiVolume, &sources).await.unwrap();
        let slot = pool.get(index).unwrap();
        assert_eq!(slot.label, "block.mesh");
        assert_eq!(slot.layer().unwrap().kind(), LayerKind::MultiVolume);
    }

    #[tokio::test]
    async fn test_project_round_trip() {
        let pool = pool(3);
        pool.import(volume(), "first").await.unwrap();
        pool.import(volume(), "second").await.unwrap();
        pool.reset(0).unwrap();
        let text = pool.save_project().unwrap();

        let other = self::pool(3);
        assert_eq!(other.load_project(&text).await.unwrap(), 1);
        let slots = other.snapshot().unwrap();
        assert!(slots[0].is_empty());
        assert_eq!(slots[1].label, "second");
        assert_eq!(
            slots[1].layer().unwrap().parameters(),
            pool.get(1).unwrap().layer().unwrap().parameters()
        );
    }
}
