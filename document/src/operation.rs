use crate::bounds::Bounds;
use crate::layers::effects::ShadowPatch;
use crate::layers::layer_info::LayerProperties;
use crate::layers::radii::Radii;
use crate::layers::style::{FillPatch, Stroke, StrokePatch};
use crate::layers::text::{CharacterStylePatch, ParagraphStylePatch};
use crate::preferences::DocumentInfo;
use crate::response::StructureResponse;
use crate::structure::{LayerStructure, ReplaceLayer};
use crate::{DocumentError, LayerId};

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
/// Operations that can be performed to edit a [`LayerStructure`].
pub enum Operation {
	AddLayers {
		ids: Vec<LayerId>,
		descriptors: Vec<Value>,
		selected: bool,
		replace: ReplaceLayer,
		document: DocumentInfo,
	},
	UpdateSelection {
		ids: Vec<LayerId>,
	},
	/// Layer ids in visual order, top-most first. Layers left out are deleted.
	UpdateOrder {
		order: Vec<LayerId>,
	},
	DeleteLayers {
		ids: Vec<LayerId>,
	},
	CreateGroup {
		group_id: LayerId,
		group_end_id: LayerId,
		name: String,
		is_artboard: bool,
		bounds: Option<Bounds>,
	},
	SetProperties {
		ids: Vec<LayerId>,
		properties: LayerProperties,
	},
	SetBorderRadii {
		ids: Vec<LayerId>,
		radii: Radii,
	},
	SetFillProperties {
		ids: Vec<LayerId>,
		fill: FillPatch,
	},
	SetStrokeProperties {
		ids: Vec<LayerId>,
		stroke: StrokePatch,
	},
	AddStroke {
		ids: Vec<LayerId>,
		stroke: Stroke,
	},
	SetLayerEffectProperties {
		ids: Vec<LayerId>,
		effect_type: String,
		index: usize,
		shadow: ShadowPatch,
	},
	DeleteLayerEffect {
		ids: Vec<LayerId>,
		effect_type: String,
		index: usize,
	},
	SetCharacterStyleProperties {
		ids: Vec<LayerId>,
		style: CharacterStylePatch,
	},
	SetParagraphStyleProperties {
		ids: Vec<LayerId>,
		style: ParagraphStylePatch,
	},
	ResizeLayers {
		ids: Vec<LayerId>,
		width: Option<f64>,
		height: Option<f64>,
		proportional: bool,
	},
	RepositionLayers {
		ids: Vec<LayerId>,
		x: Option<f64>,
		y: Option<f64>,
	},
	UpdateBounds {
		bounds: Vec<(LayerId, Bounds)>,
	},
	TranslateLayers {
		ids: Vec<LayerId>,
		dx: f64,
		dy: f64,
	},
	ResetLayers {
		descriptors: Vec<Value>,
		document: DocumentInfo,
	},
	ResetBounds {
		descriptors: Vec<Value>,
		document: DocumentInfo,
	},
}

impl LayerStructure {
	/// Applies an operation, returning the edited structure together with everything that changed.
	///
	/// On error `self` is the structure to keep using.
	pub fn handle_operation(&self, operation: &Operation) -> Result<(LayerStructure, Vec<StructureResponse>), DocumentError> {
		debug!("Handling {operation:?}");

		let structure = match operation {
			Operation::AddLayers {
				ids,
				descriptors,
				selected,
				replace,
				document,
			} => self.add_layers(ids, descriptors, *selected, *replace, document)?,
			Operation::UpdateSelection { ids } => self.update_selection(&ids.iter().copied().collect::<HashSet<_>>()),
			Operation::UpdateOrder { order } => self.update_order(order)?,
			Operation::DeleteLayers { ids } => self.delete_layers(ids)?,
			Operation::CreateGroup {
				group_id,
				group_end_id,
				name,
				is_artboard,
				bounds,
			} => self.create_group(*group_id, *group_end_id, name, *is_artboard, *bounds)?,
			Operation::SetProperties { ids, properties } => self.set_properties(ids, properties)?,
			Operation::SetBorderRadii { ids, radii } => self.set_border_radii(ids, *radii)?,
			Operation::SetFillProperties { ids, fill } => self.set_fill_properties(ids, fill)?,
			Operation::SetStrokeProperties { ids, stroke } => self.set_stroke_properties(ids, stroke)?,
			Operation::AddStroke { ids, stroke } => self.add_stroke(ids, stroke)?,
			Operation::SetLayerEffectProperties { ids, effect_type, index, shadow } => self.set_layer_effect_properties(ids, effect_type, *index, shadow)?,
			Operation::DeleteLayerEffect { ids, effect_type, index } => self.delete_layer_effect(ids, effect_type, *index)?,
			Operation::SetCharacterStyleProperties { ids, style } => self.set_character_style_properties(ids, style)?,
			Operation::SetParagraphStyleProperties { ids, style } => self.set_paragraph_style_properties(ids, style)?,
			Operation::ResizeLayers { ids, width, height, proportional } => self.resize_layers(ids, *width, *height, *proportional)?,
			Operation::RepositionLayers { ids, x, y } => self.reposition_layers(ids, *x, *y)?,
			Operation::UpdateBounds { bounds } => self.update_bounds(bounds)?,
			Operation::TranslateLayers { ids, dx, dy } => self.translate_layers(ids, *dx, *dy)?,
			Operation::ResetLayers { descriptors, document } => self.reset_layers(descriptors, document)?,
			Operation::ResetBounds { descriptors, document } => self.reset_bounds(descriptors, document)?,
		};

		let responses = StructureResponse::diff(self, &structure);
		Ok((structure, responses))
	}
}
