use super::blend_mode::BlendMode;
use super::effects::LayerEffects;
use super::layer_kind::LayerKind;
use super::radii::Radii;
use super::style::{Fill, Stroke};
use super::text::Text;
use crate::bounds::Bounds;
use crate::consts::{DEFAULT_OPACITY, GROUP_END_NAME};
use crate::descriptor::DescriptorExt;
use crate::{DocumentError, DocumentId, LayerId};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of a document's layer stack.
///
/// Layers are immutable: the editing helpers below return modified copies, and a [`LayerStructure`](crate::LayerStructure)
/// swaps whole records when anything changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
	pub id: LayerId,
	pub document_id: DocumentId,
	pub name: String,
	pub kind: LayerKind,
	pub visible: bool,
	pub locked: bool,
	pub selected: bool,
	/// Whether a group is expanded in the layers panel.
	pub expanded: bool,
	pub is_artboard: bool,
	pub is_background: bool,
	pub is_linked: bool,
	/// Opacity in percent.
	pub opacity: f64,
	pub blend_mode: BlendMode,
	pub bounds: Option<Bounds>,
	pub radii: Option<Radii>,
	pub fill: Option<Fill>,
	pub stroke: Option<Stroke>,
	pub text: Option<Text>,
	pub effects: LayerEffects,
}

impl Layer {
	pub fn new(document_id: DocumentId, id: LayerId, name: impl Into<String>, kind: LayerKind) -> Self {
		Self {
			id,
			document_id,
			name: name.into(),
			kind,
			visible: true,
			locked: false,
			selected: false,
			expanded: false,
			is_artboard: false,
			is_background: kind == LayerKind::Background,
			is_linked: false,
			opacity: DEFAULT_OPACITY,
			blend_mode: if kind == LayerKind::Group { BlendMode::PassThrough } else { BlendMode::Normal },
			bounds: None,
			radii: None,
			fill: None,
			stroke: None,
			text: None,
			effects: LayerEffects::default(),
		}
	}

	/// The opening layer of a new group. Artboards carry their canvas rectangle as bounds.
	pub fn group(document_id: DocumentId, id: LayerId, name: impl Into<String>, is_artboard: bool, bounds: Option<Bounds>) -> Self {
		Self {
			is_artboard,
			expanded: true,
			bounds: if is_artboard { bounds } else { None },
			..Self::new(document_id, id, name, LayerKind::Group)
		}
	}

	/// The marker closing a group.
	pub fn group_end(document_id: DocumentId, id: LayerId) -> Self {
		Self::new(document_id, id, GROUP_END_NAME, LayerKind::GroupEnd)
	}

	/// Reads a layer from a host layer descriptor.
	///
	/// `layerID` and `layerKind` are required, every other field falls back to the default of a new layer.
	pub fn from_descriptor(document_id: DocumentId, descriptor: &Value, selected: bool, resolution: f64) -> Result<Self, DocumentError> {
		let id = Self::descriptor_id(descriptor)?;
		let kind = LayerKind::from_code(descriptor.required_i64("layerKind")?)?;
		let defaults = Self::new(document_id, id, "", kind);

		let blend_mode = match descriptor.enum_value("mode") {
			None => defaults.blend_mode,
			Some(name) => BlendMode::from_host_name(name).ok_or_else(|| DocumentError::InvalidField {
				field: "mode",
				reason: format!("unknown blend mode `{name}`"),
			})?,
		};
		let default_name = if kind == LayerKind::GroupEnd { GROUP_END_NAME } else { "" };
		let locked = descriptor.get("layerLocking").is_some_and(|locking| locking.bool_or("protectAll", false));
		let is_linked = descriptor.get("linkedLayerIDs").and_then(Value::as_array).is_some_and(|linked| !linked.is_empty());

		Ok(Self {
			name: descriptor.str_or("name", default_name).to_string(),
			visible: descriptor.bool_or("visible", true),
			locked,
			selected,
			expanded: descriptor.bool_or("layerSectionExpanded", false),
			is_artboard: descriptor.bool_or("artboardEnabled", false),
			is_background: descriptor.bool_or("background", defaults.is_background),
			is_linked,
			opacity: descriptor.unit_value("opacity", resolution)?.unwrap_or(DEFAULT_OPACITY),
			blend_mode,
			bounds: Bounds::from_layer_descriptor(descriptor, resolution)?,
			radii: Radii::from_layer_descriptor(descriptor, resolution)?,
			fill: Fill::from_layer_descriptor(descriptor, resolution)?,
			stroke: Stroke::from_layer_descriptor(descriptor, resolution)?,
			text: Text::from_layer_descriptor(descriptor, resolution)?,
			effects: LayerEffects::from_layer_descriptor(descriptor, resolution)?,
			..defaults
		})
	}

	/// Re-reads every attribute from a fresh descriptor of the same layer, keeping its identity and selection state.
	pub fn reset_from_descriptor(&self, descriptor: &Value, resolution: f64) -> Result<Self, DocumentError> {
		let layer = Self::from_descriptor(self.document_id, descriptor, self.selected, resolution)?;
		if layer.id != self.id {
			return Err(DocumentError::InvalidField {
				field: "layerID",
				reason: format!("expected layer {}, found layer {}", self.id, layer.id),
			});
		}
		Ok(layer)
	}

	/// The `layerID` of a layer descriptor.
	pub fn descriptor_id(descriptor: &Value) -> Result<LayerId, DocumentError> {
		let raw_id = descriptor.required_i64("layerID")?;
		LayerId::try_from(raw_id).map_err(|_| DocumentError::InvalidField {
			field: "layerID",
			reason: format!("negative layer id {raw_id}"),
		})
	}

	/// The host's `itemIndex` of a layer descriptor.
	pub fn item_index(descriptor: &Value) -> Result<i64, DocumentError> {
		descriptor.required_i64("itemIndex")
	}

	pub fn is_group(&self) -> bool {
		self.kind == LayerKind::Group
	}

	pub fn is_group_end(&self) -> bool {
		self.kind == LayerKind::GroupEnd
	}

	pub fn is_adjustment(&self) -> bool {
		self.kind == LayerKind::Adjustment
	}

	/// Group-end markers and the background can never be picked as a selection target.
	pub fn is_super_selectable(&self) -> bool {
		!self.is_group_end() && !self.is_background
	}

	/// A pixel layer with nothing painted on it, as the host creates before content is placed.
	pub fn is_empty_placeholder(&self) -> bool {
		self.kind == LayerKind::Pixel && !self.is_background && self.bounds.is_none_or(|bounds| bounds.is_empty())
	}

	/// Whether geometry setters apply to this layer. Plain groups and group-end markers derive their extent from children.
	pub fn has_own_geometry(&self) -> bool {
		!self.is_group_end() && (!self.is_group() || self.is_artboard)
	}

	pub fn apply_properties(&self, properties: &LayerProperties) -> Self {
		Self {
			name: properties.name.clone().unwrap_or_else(|| self.name.clone()),
			visible: properties.visible.unwrap_or(self.visible),
			locked: properties.locked.unwrap_or(self.locked),
			expanded: properties.expanded.unwrap_or(self.expanded),
			is_linked: properties.is_linked.unwrap_or(self.is_linked),
			opacity: properties.opacity.unwrap_or(self.opacity),
			blend_mode: properties.blend_mode.unwrap_or(self.blend_mode),
			..self.clone()
		}
	}

	/// Lists the attributes in which `other` differs from this layer, in declaration order.
	pub fn changed_fields(&self, other: &Layer) -> Vec<LayerField> {
		let checks = [
			(LayerField::Name, self.name != other.name),
			(LayerField::Kind, self.kind != other.kind),
			(LayerField::Visible, self.visible != other.visible),
			(LayerField::Locked, self.locked != other.locked),
			(LayerField::Selected, self.selected != other.selected),
			(LayerField::Expanded, self.expanded != other.expanded),
			(LayerField::Artboard, self.is_artboard != other.is_artboard),
			(LayerField::Background, self.is_background != other.is_background),
			(LayerField::Linked, self.is_linked != other.is_linked),
			(LayerField::Opacity, self.opacity != other.opacity),
			(LayerField::BlendMode, self.blend_mode != other.blend_mode),
			(LayerField::Bounds, self.bounds != other.bounds),
			(LayerField::Radii, self.radii != other.radii),
			(LayerField::Fill, self.fill != other.fill),
			(LayerField::Stroke, self.stroke != other.stroke),
			(LayerField::Text, self.text != other.text),
			(LayerField::Effects, self.effects != other.effects),
		];
		checks.into_iter().filter_map(|(field, changed)| changed.then_some(field)).collect()
	}
}

/// A partial update of a layer's own flags and compositing. Unset fields keep their current value.
///
/// Selection is not part of it, see [`LayerStructure::update_selection`](crate::LayerStructure::update_selection).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerProperties {
	pub name: Option<String>,
	pub visible: Option<bool>,
	pub locked: Option<bool>,
	pub expanded: Option<bool>,
	pub is_linked: Option<bool>,
	pub opacity: Option<f64>,
	pub blend_mode: Option<BlendMode>,
}

/// Names a [`Layer`] attribute in change notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerField {
	Name,
	Kind,
	Visible,
	Locked,
	Selected,
	Expanded,
	Artboard,
	Background,
	Linked,
	Opacity,
	BlendMode,
	Bounds,
	Radii,
	Fill,
	Stroke,
	Text,
	Effects,
}
