// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Layer slots and their text record
//!
//! A record is five `key: value` lines followed by the layer's import
//! parameters as JSON:
//!
//! ```text
//! ID: 3
//! visible: true
//! checked: true
//! label: collar-17.dh
//! object: Drillhole
//! {"collar":[...],...}
//! ```
//!
//! An empty slot writes `object: null` and no JSON.

use geolayer_core::{LayerKind, LayerParameters};

use crate::config::ViewerConfig;
use crate::error::{Error, Result};
use crate::layer::Layer;

const NULL_OBJECT: &str = "null";

/// Pool entry binding at most one layer to its UI flags
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSlot {
    id: String,
    pub visible: bool,
    pub checked: bool,
    pub label: String,
    pub renaming: bool,
    pub styling: bool,
    layer: Option<Layer>,
}

impl LayerSlot {
    /// Empty, invisible slot labelled with its id
    pub fn empty(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            visible: false,
            checked: false,
            renaming: false,
            styling: false,
            layer: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Only an invisible slot can receive a new layer
    #[inline]
    pub fn is_empty(&self) -> bool {
        !self.visible
    }

    pub fn layer(&self) -> Option<&Layer> {
        self.layer.as_ref()
    }

    pub fn layer_mut(&mut self) -> Option<&mut Layer> {
        self.layer.as_mut()
    }

    /// Attach an already initialized layer and show it
    pub fn promote(&mut self, layer: Layer, label: impl Into<String>) {
        self.layer = Some(layer);
        self.label = single_line(&label.into());
        self.visible = true;
        self.checked = true;
    }

    /// Build and initialize a layer from `parameters`, then show it
    ///
    /// On failure the slot is left as it was.
    pub async fn set(
        &mut self,
        parameters: LayerParameters,
        label: impl Into<String>,
        config: &ViewerConfig,
    ) -> Result<()> {
        let mut layer = Layer::new(parameters, config);
        layer.initialize().await?;
        self.promote(layer, label);
        Ok(())
    }

    /// Back to the empty state, dropping the layer
    pub fn reset(&mut self) {
        *self = Self::empty(std::mem::take(&mut self.id));
    }

    /// Change the label, folding line breaks into spaces
    pub fn rename(&mut self, label: &str) {
        self.label = single_line(label);
        self.renaming = false;
    }

    /// Copy of this slot with `update` applied to its layer
    ///
    /// `self` is not modified, even when `update` fails part way.
    pub fn with_update<F>(&self, update: F) -> Result<LayerSlot>
    where
        F: FnOnce(&mut Layer) -> Result<()>,
    {
        let mut next = self.clone();
        let layer = next.layer.as_mut().ok_or(Error::NotInitialized)?;
        update(layer)?;
        Ok(next)
    }

    /// Text record for a project file
    pub fn to_record(&self) -> Result<String> {
        let mut record = format!(
            "ID: {}\nvisible: {}\nchecked: {}\nlabel: {}\nobject: ",
            self.id,
            self.visible,
            self.checked,
            single_line(&self.label)
        );
        match &self.layer {
            Some(layer) => {
                record.push_str(layer.kind().as_str());
                record.push('\n');
                record.push_str(&encode_parameters(&layer.parameters())?);
            }
            None => {
                record.push_str(NULL_OBJECT);
                record.push('\n');
            }
        }
        Ok(record)
    }

    /// Rebuild a slot from its record, re-initializing the layer
    ///
    /// `visible` and `checked` are restored from the record after the layer
    /// is attached, so a hidden layer comes back hidden.
    pub async fn from_record(record: &str, config: &ViewerConfig) -> Result<LayerSlot> {
        let mut lines = record.splitn(6, '\n');
        let id = field(&mut lines, "ID")?.to_string();
        let visible = parse_flag(field(&mut lines, "visible")?.trim())?;
        let checked = parse_flag(field(&mut lines, "checked")?.trim())?;
        let label = field(&mut lines, "label")?.to_string();
        let object = field(&mut lines, "object")?.trim();
        let json = lines.next().unwrap_or("").trim();

        let mut slot = LayerSlot::empty(id);
        if json.is_empty() || object == NULL_OBJECT || object.is_empty() {
            slot.label = label;
        } else {
            let kind: LayerKind = object
                .parse()
                .map_err(|_| Error::UnknownLayerKind(object.to_string()))?;
            slot.set(decode_parameters(kind, json)?, label, config).await?;
        }
        slot.visible = visible;
        slot.checked = checked;
        Ok(slot)
    }
}

/// Labels are single-line in the record format
fn single_line(label: &str) -> String {
    label.replace(['\r', '\n'], " ")
}

/// Value of the next `key: value` line, exactly as written after `": "`
fn field<'a>(lines: &mut impl Iterator<Item = &'a str>, key: &str) -> Result<&'a str> {
    let line = lines
        .next()
        .ok_or_else(|| Error::MalformedRecord(format!("missing '{}' line", key)))?;
    let line = line.strip_suffix('\r').unwrap_or(line);
    line.strip_prefix(key)
        .and_then(|rest| rest.strip_prefix(':'))
        .map(|rest| rest.strip_prefix(' ').unwrap_or(rest))
        .ok_or_else(|| Error::MalformedRecord(format!("expected '{}:', found '{}'", key, line)))
}

fn parse_flag(value: &str) -> Result<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(Error::MalformedRecord(format!("expected true/false, found '{}'", other))),
    }
}

/// JSON of the kind-specific payload, without the enum tag
fn encode_parameters(parameters: &LayerParameters) -> Result<String> {
    let json = match parameters {
        LayerParameters::Surface(p) => serde_json::to_string(p)?,
        LayerParameters::Lines(p) => serde_json::to_string(p)?,
        LayerParameters::Points(p) => serde_json::to_string(p)?,
        LayerParameters::Drillhole(p) => serde_json::to_string(p)?,
        LayerParameters::Volume(p) | LayerParameters::MultiVolume(p) => serde_json::to_string(p)?,
        LayerParameters::Ensemble(p) => serde_json::to_string(p)?,
    };
    Ok(json)
}

fn decode_parameters(kind: LayerKind, json: &str) -> Result<LayerParameters> {
    Ok(match kind {
        LayerKind::Surface => LayerParameters::Surface(serde_json::from_str(json)?),
        LayerKind::Lines => LayerParameters::Lines(serde_json::from_str(json)?),
        LayerKind::Points => LayerParameters::Points(serde_json::from_str(json)?),
        LayerKind::Drillhole => LayerParameters::Drillhole(serde_json::from_str(json)?),
        LayerKind::Volume => LayerParameters::Volume(serde_json::from_str(json)?),
        LayerKind::MultiVolume => LayerParameters::MultiVolume(serde_json::from_str(json)?),
        LayerKind::Ensemble => LayerParameters::Ensemble(serde_json::from_str(json)?),
    })
}
