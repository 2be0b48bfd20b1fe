use super::LayerStructure;
use crate::bounds::Bounds;
use crate::layers::effects::{LayerEffectKind, ShadowPatch};
use crate::layers::layer_info::{Layer, LayerProperties};
use crate::layers::radii::Radii;
use crate::layers::style::{FillPatch, Stroke, StrokePatch};
use crate::layers::text::{CharacterStylePatch, ParagraphStylePatch};
use crate::preferences::DocumentInfo;
use crate::{DocumentError, LayerId};

use log::debug;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

// Bulk setters. Each applies the same change to every layer in `ids` and fails on the first unknown id.
impl LayerStructure {
	/// Replaces the records of `ids` with the result of `update`, sharing every record that ends up unchanged.
	/// Returning `None` leaves a layer as it is.
	fn update_layers(&self, ids: &[LayerId], mut update: impl FnMut(&Layer) -> Result<Option<Layer>, DocumentError>) -> Result<Self, DocumentError> {
		let mut layers = (*self.layers).clone();
		for &id in ids {
			let current = layers.get(&id).ok_or(DocumentError::LayerNotFound(id))?;
			if let Some(updated) = update(current)?.filter(|updated| updated != current.as_ref()) {
				layers.insert(id, Arc::new(updated));
			}
		}
		Ok(self.with_layers(layers))
	}

	pub fn set_properties(&self, ids: &[LayerId], properties: &LayerProperties) -> Result<Self, DocumentError> {
		debug!("Setting {properties:?} on layers {ids:?}");
		self.update_layers(ids, |layer| Ok(Some(layer.apply_properties(properties))))
	}

	pub fn set_border_radii(&self, ids: &[LayerId], radii: Radii) -> Result<Self, DocumentError> {
		self.update_layers(ids, |layer| Ok(Some(Layer { radii: Some(radii), ..layer.clone() })))
	}

	pub fn set_fill_properties(&self, ids: &[LayerId], patch: &FillPatch) -> Result<Self, DocumentError> {
		self.update_layers(ids, |layer| {
			let fill = layer.fill.as_ref().ok_or(DocumentError::MissingFill(layer.id))?.apply(patch);
			Ok(Some(Layer { fill: Some(fill), ..layer.clone() }))
		})
	}

	pub fn set_stroke_properties(&self, ids: &[LayerId], patch: &StrokePatch) -> Result<Self, DocumentError> {
		self.update_layers(ids, |layer| {
			let stroke = layer.stroke.as_ref().ok_or(DocumentError::MissingStroke(layer.id))?.apply(patch);
			Ok(Some(Layer { stroke: Some(stroke), ..layer.clone() }))
		})
	}

	/// Gives the layers a stroke, replacing any they already have.
	pub fn add_stroke(&self, ids: &[LayerId], stroke: &Stroke) -> Result<Self, DocumentError> {
		self.update_layers(ids, |layer| Ok(Some(Layer { stroke: Some(stroke.clone()), ..layer.clone() })))
	}

	/// Merges `patch` into the `index`-th effect of type `effect_type`, adding the effect where it does not exist yet.
	pub fn set_layer_effect_properties(&self, ids: &[LayerId], effect_type: &str, index: usize, patch: &ShadowPatch) -> Result<Self, DocumentError> {
		let kind = LayerEffectKind::from_host_name(effect_type)?;
		self.update_layers(ids, |layer| {
			Ok(Some(Layer {
				effects: layer.effects.with_shadow(kind, index, patch),
				..layer.clone()
			}))
		})
	}

	pub fn delete_layer_effect(&self, ids: &[LayerId], effect_type: &str, index: usize) -> Result<Self, DocumentError> {
		let kind = LayerEffectKind::from_host_name(effect_type)?;
		self.update_layers(ids, |layer| {
			Ok(Some(Layer {
				effects: layer.effects.without_shadow(kind, index),
				..layer.clone()
			}))
		})
	}

	pub fn set_character_style_properties(&self, ids: &[LayerId], patch: &CharacterStylePatch) -> Result<Self, DocumentError> {
		self.update_layers(ids, |layer| {
			let text = layer.text.as_ref().ok_or(DocumentError::MissingText(layer.id))?.with_character_style(patch);
			Ok(Some(Layer { text: Some(text), ..layer.clone() }))
		})
	}

	pub fn set_paragraph_style_properties(&self, ids: &[LayerId], patch: &ParagraphStylePatch) -> Result<Self, DocumentError> {
		self.update_layers(ids, |layer| {
			let text = layer.text.as_ref().ok_or(DocumentError::MissingText(layer.id))?.with_paragraph_style(patch);
			Ok(Some(Layer { text: Some(text), ..layer.clone() }))
		})
	}
}

// Geometry setters. Plain groups, group-end markers and layers with no bounds yet are skipped.
impl LayerStructure {
	fn update_bounds_with(&self, ids: &[LayerId], update: impl Fn(&Bounds) -> Bounds) -> Result<Self, DocumentError> {
		self.update_layers(ids, |layer| match layer.bounds.filter(|_| layer.has_own_geometry()) {
			Some(bounds) => Ok(Some(Layer {
				bounds: Some(update(&bounds)),
				..layer.clone()
			})),
			None => {
				debug!("Layer {} has no geometry of its own, skipping it", layer.id);
				Ok(None)
			}
		})
	}

	pub fn resize_layers(&self, ids: &[LayerId], width: Option<f64>, height: Option<f64>, proportional: bool) -> Result<Self, DocumentError> {
		self.update_bounds_with(ids, |bounds| bounds.update_size(width, height, proportional))
	}

	pub fn reposition_layers(&self, ids: &[LayerId], x: Option<f64>, y: Option<f64>) -> Result<Self, DocumentError> {
		self.update_bounds_with(ids, |bounds| bounds.update_position(x, y))
	}

	pub fn translate_layers(&self, ids: &[LayerId], dx: f64, dy: f64) -> Result<Self, DocumentError> {
		self.update_bounds_with(ids, |bounds| bounds.translate(dx, dy))
	}

	/// Sets explicit bounds per layer. Unlike the relative setters this also applies to layers without bounds so far.
	pub fn update_bounds(&self, bounds: &[(LayerId, Bounds)]) -> Result<Self, DocumentError> {
		let new_bounds: HashMap<_, _> = bounds.iter().copied().collect();
		let ids: Vec<_> = bounds.iter().map(|(id, _)| *id).collect();

		self.update_layers(&ids, |layer| {
			if !layer.has_own_geometry() {
				debug!("Layer {} has no geometry of its own, skipping it", layer.id);
				return Ok(None);
			}
			Ok(Some(Layer {
				bounds: new_bounds.get(&layer.id).copied(),
				..layer.clone()
			}))
		})
	}

	/// Re-reads only the bounds of existing layers from fresh host descriptors.
	pub fn reset_bounds(&self, descriptors: &[Value], document: &DocumentInfo) -> Result<Self, DocumentError> {
		let mut new_bounds = HashMap::with_capacity(descriptors.len());
		for descriptor in descriptors {
			new_bounds.insert(Layer::descriptor_id(descriptor)?, Bounds::from_layer_descriptor(descriptor, document.resolution)?);
		}
		let ids: Vec<_> = new_bounds.keys().copied().collect();

		self.update_layers(&ids, |layer| {
			Ok(Some(Layer {
				bounds: new_bounds.get(&layer.id).copied().flatten(),
				..layer.clone()
			}))
		})
	}
}

#[cfg(test)]
mod test {
	use crate::Bounds;
	use crate::DocumentError;
	use crate::color::Color;
	use crate::layers::effects::ShadowPatch;
	use crate::layers::layer_info::{Layer, LayerProperties};
	use crate::layers::layer_kind::LayerKind;
	use crate::layers::radii::Radii;
	use crate::layers::style::{Fill, FillPatch, Stroke, StrokePatch};
	use crate::layers::text::{CharacterStyle, CharacterStylePatch, ParagraphStylePatch, Text, TextAlignment};
	use crate::preferences::DocumentInfo;
	use crate::test_utils::*;

	use pretty_assertions::assert_eq;

	fn shape(id: u64) -> Layer {
		Layer {
			kind: LayerKind::Vector,
			fill: Some(Fill::new(Color::RED)),
			stroke: Some(Stroke::new(Color::BLACK, 2.)),
			..painted(id)
		}
	}

	#[test]
	fn properties_apply_to_every_id() {
		let structure = structure([pixel(1), pixel(2), pixel(3)]);
		let hidden = structure
			.set_properties(&[1, 3], &LayerProperties {
				visible: Some(false),
				..Default::default()
			})
			.unwrap();

		assert!(!hidden.by_id(1).unwrap().visible);
		assert!(hidden.by_id(2).unwrap().visible);
		assert!(!hidden.by_id(3).unwrap().visible);
		assert!(hidden.shares_layer(&structure, 2));
		assert!(structure.by_id(1).unwrap().visible);

		assert_eq!(structure.set_properties(&[1, 9], &LayerProperties::default()), Err(DocumentError::LayerNotFound(9)));
	}

	#[test]
	fn style_setters_require_the_style() {
		let structure = structure([shape(1), pixel(2)]);
		let patch = FillPatch {
			color: Some(Color::GREEN),
			opacity: Some(50.),
			..Default::default()
		};

		let filled = structure.set_fill_properties(&[1], &patch).unwrap();
		assert_eq!(filled.by_id(1).unwrap().fill, Some(Fill::new(Color::GREEN.with_alpha(0.5))));
		assert_eq!(structure.set_fill_properties(&[1, 2], &patch), Err(DocumentError::MissingFill(2)));

		let stroke = StrokePatch { width: Some(8.), ..Default::default() };
		assert_eq!(structure.set_stroke_properties(&[1], &stroke).unwrap().by_id(1).unwrap().stroke.as_ref().map(|stroke| stroke.width), Some(8.));
		assert_eq!(structure.set_stroke_properties(&[2], &stroke), Err(DocumentError::MissingStroke(2)));

		let stroked = structure.add_stroke(&[2], &Stroke::new(Color::BLUE, 3.)).unwrap();
		assert_eq!(stroked.set_stroke_properties(&[2], &stroke).unwrap().by_id(2).unwrap().stroke, Some(Stroke::new(Color::BLUE, 8.)));
	}

	#[test]
	fn border_radii_are_set() {
		let structure = structure([shape(1)]).set_border_radii(&[1], Radii::uniform(6.)).unwrap();
		assert_eq!(structure.by_id(1).unwrap().radii, Some(Radii::uniform(6.)));
	}

	#[test]
	fn effect_types_are_validated_before_anything_changes() {
		let structure = structure([shape(1)]);
		let patch = ShadowPatch { blur: Some(9.), ..Default::default() };

		assert_eq!(
			structure.set_layer_effect_properties(&[1], "outerGlow", 0, &patch),
			Err(DocumentError::UnknownLayerEffect("outerGlow".into()))
		);

		let shadowed = structure.set_layer_effect_properties(&[1], "dropShadow", 0, &patch).unwrap();
		assert_eq!(shadowed.by_id(1).unwrap().effects.drop_shadows[0].blur, 9.);
		assert!(shadowed.delete_layer_effect(&[1], "dropShadow", 0).unwrap().by_id(1).unwrap().effects.is_empty());
		assert_eq!(shadowed.delete_layer_effect(&[1], "glow", 0), Err(DocumentError::UnknownLayerEffect("glow".into())));
	}

	#[test]
	fn text_styles_require_text() {
		let title = Layer {
			kind: LayerKind::Text,
			text: Some(Text::new("Title", CharacterStyle::default())),
			..painted(1)
		};
		let structure = structure([title, pixel(2)]);
		let patch = CharacterStylePatch { size: Some(48.), ..Default::default() };

		let resized = structure.set_character_style_properties(&[1], &patch).unwrap();
		assert_eq!(resized.by_id(1).unwrap().text.as_ref().and_then(Text::character_style).map(|style| style.size), Some(48.));
		assert_eq!(structure.set_character_style_properties(&[2], &patch), Err(DocumentError::MissingText(2)));

		let centered = structure
			.set_paragraph_style_properties(&[1], &ParagraphStylePatch {
				alignment: Some(TextAlignment::Center),
			})
			.unwrap();
		assert_eq!(centered.by_id(1).unwrap().text.as_ref().and_then(Text::paragraph_style).map(|style| style.alignment), Some(TextAlignment::Center));
	}

	#[test]
	fn geometry_setters_skip_groups() {
		let structure = structure([group(1), painted(2), group_end(3), pixel(4)]);

		let moved = structure.translate_layers(&[1, 2, 3, 4], 5., 5.).unwrap();
		assert_eq!(moved.by_id(2).unwrap().bounds, Some(Bounds::new(5., 5., 15., 15.)));
		assert_eq!(moved.by_id(1).unwrap().bounds, None);
		assert_eq!(moved.by_id(4).unwrap().bounds, None);
		assert!(moved.shares_layer(&structure, 1));

		let resized = structure.resize_layers(&[2], Some(20.), None, true).unwrap();
		assert_eq!(resized.by_id(2).unwrap().bounds, Some(Bounds::new(0., 0., 20., 20.)));

		let repositioned = structure.reposition_layers(&[2], Some(30.), None).unwrap();
		assert_eq!(repositioned.by_id(2).unwrap().bounds, Some(Bounds::new(0., 30., 10., 40.)));
	}

	#[test]
	fn explicit_bounds_reach_layers_without_bounds() {
		let structure = structure([group(1), painted(2), group_end(3), pixel(4)]);
		let target = Bounds::new(1., 2., 3., 4.);
		let updated = structure.update_bounds(&[(1, target), (4, target)]).unwrap();

		assert_eq!(updated.by_id(4).unwrap().bounds, Some(target));
		assert_eq!(updated.by_id(1).unwrap().bounds, None);
		assert_eq!(updated.child_bounds(1), Some(Bounds::new(0., 0., 10., 10.)));
	}

	#[test]
	fn bounds_are_reset_from_descriptors() {
		let structure = structure([painted(1), pixel(2)]);
		let mut descriptor = descriptor(2, LayerKind::Pixel, 1);
		descriptor["bounds"] = serde_json::json!({ "top": 5, "left": 5, "bottom": 6, "right": 8 });

		let reset = structure.reset_bounds(&[descriptor], &DocumentInfo::new(DOCUMENT_ID, 72.)).unwrap();
		assert_eq!(reset.by_id(2).unwrap().bounds, Some(Bounds::new(5., 5., 6., 8.)));
		assert!(reset.shares_layer(&structure, 1));
	}
}
