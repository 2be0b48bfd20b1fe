use super::LayerStructure;
use crate::bounds::Bounds;
use crate::layers::layer_info::Layer;
use crate::preferences::DocumentInfo;
use crate::{DocumentError, LayerId};

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::iter::once;
use std::sync::Arc;

/// Which existing layer, if any, newly added layers take the place of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReplaceLayer {
	/// The sole selected layer, but only when it is an empty placeholder the host created.
	#[default]
	Auto,
	Never,
	/// The top-most selected layer, whatever it contains.
	Always,
	Layer(LayerId),
}

impl LayerStructure {
	/// Inserts the layers described by `descriptors` at the positions given by their host item indices.
	///
	/// `ids` must list the id of every descriptor, in the same order. Ids that already exist are replaced by their new records.
	/// When `selected` is set, the new layers become the whole selection.
	pub fn add_layers(&self, ids: &[LayerId], descriptors: &[Value], selected: bool, replace: ReplaceLayer, document: &DocumentInfo) -> Result<Self, DocumentError> {
		debug!("Adding layers {ids:?} to document {} (replace: {replace:?})", self.document_id);
		if ids.len() != descriptors.len() {
			return Err(DocumentError::IndexMismatch);
		}

		let mut added = ids
			.iter()
			.zip(descriptors)
			.map(|(&id, descriptor)| {
				let layer = Layer::from_descriptor(document.id, descriptor, selected, document.resolution)?;
				if layer.id != id {
					return Err(DocumentError::IndexMismatch);
				}
				Ok((Layer::item_index(descriptor)?, layer))
			})
			.collect::<Result<Vec<_>, DocumentError>>()?;
		// Item indices refer to the final document, so inserting from the back keeps earlier insertions in place
		added.sort_by_key(|(item_index, _)| *item_index);

		let mut removed: HashSet<LayerId> = ids.iter().copied().collect();
		if let Some(replaced) = self.replaced_layer(replace)? {
			debug!("Layer {replaced} is replaced");
			removed.extend(self.tree.descendants(replaced));
		}

		let mut layers = (*self.layers).clone();
		let mut index = (*self.index).clone();
		layers.retain(|id, _| !removed.contains(id));
		index.retain(|id| !removed.contains(id));
		if selected {
			deselect_all(&mut layers);
		}

		let has_background = layers.values().any(|layer| layer.is_background) || added.iter().any(|(_, layer)| layer.is_background);
		let first_item_index = if has_background { 0 } else { 1 };
		for (item_index, layer) in added {
			let position = usize::try_from(item_index - first_item_index)
				.ok()
				.filter(|&position| position <= index.len())
				.ok_or(DocumentError::InvalidItemIndex { index: item_index, len: index.len() })?;
			index.insert(position, layer.id);
			layers.insert(layer.id, Arc::new(layer));
		}

		Self::assemble(self.document_id, layers, index, self.preferences.clone())
	}

	fn replaced_layer(&self, replace: ReplaceLayer) -> Result<Option<LayerId>, DocumentError> {
		Ok(match replace {
			ReplaceLayer::Never => None,
			ReplaceLayer::Auto => match self.selected().as_slice() {
				[only] if self.preferences.replace_empty_placeholder && only.is_empty_placeholder() => Some(only.id),
				_ => None,
			},
			ReplaceLayer::Always => {
				let top_most = self.selected_ids().first().copied();
				if top_most.is_none() {
					debug!("Nothing is selected, no layer is replaced");
				}
				top_most
			}
			ReplaceLayer::Layer(id) => Some(self.layer(id)?.id),
		})
	}

	/// Selects exactly the layers in `ids`. Unknown ids are ignored.
	pub fn update_selection(&self, ids: &HashSet<LayerId>) -> Self {
		let layers = self
			.layers
			.iter()
			.map(|(&id, layer)| {
				let selected = ids.contains(&id);
				let layer = if layer.selected == selected { layer.clone() } else { Arc::new(Layer { selected, ..(**layer).clone() }) };
				(id, layer)
			})
			.collect();
		self.with_layers(layers)
	}

	/// Restacks the document to `visual_order` (top-most first). Layers missing from it are deleted.
	pub fn update_order(&self, visual_order: &[LayerId]) -> Result<Self, DocumentError> {
		debug!("Reordering document {} to {visual_order:?}", self.document_id);
		if visual_order.len() > self.len() {
			return Err(DocumentError::OrderTooLong {
				requested: visual_order.len(),
				available: self.len(),
			});
		}

		let mut layers = HashMap::with_capacity(visual_order.len());
		for &id in visual_order {
			let layer = self.layers.get(&id).ok_or(DocumentError::LayerNotFound(id))?;
			if layers.insert(id, layer.clone()).is_some() {
				return Err(DocumentError::DuplicateLayer(id));
			}
		}
		let index = visual_order.iter().rev().copied().collect();

		Self::assemble(self.document_id, layers, index, self.preferences.clone())
	}

	/// Deletes the layers in `ids` along with everything nested inside them.
	pub fn delete_layers(&self, ids: &[LayerId]) -> Result<Self, DocumentError> {
		let mut doomed = HashSet::new();
		for &id in ids {
			self.layer(id)?;
			doomed.extend(self.tree.descendants(id));
		}

		let survivors: Vec<_> = self.visual_order().filter(|id| !doomed.contains(id)).collect();
		self.update_order(&survivors)
	}

	/// Wraps the selection in a new group, which becomes the only selected layer.
	///
	/// A plain group takes the place of the top-most selected layer and receives the whole selection, subtrees included, in
	/// its original order. An artboard (or a group created without a selection) is added empty on top of the document.
	///
	/// `bounds` is the artboard rectangle, which callers read from the host's bounds descriptor with [`Bounds::from_descriptor`].
	/// The owning document is always this structure's own.
	pub fn create_group(&self, group_id: LayerId, group_end_id: LayerId, name: &str, is_artboard: bool, bounds: Option<Bounds>) -> Result<Self, DocumentError> {
		debug!("Creating group {group_id} ({name}) in document {}", self.document_id);
		for id in [group_id, group_end_id] {
			if self.contains(id) {
				return Err(DocumentError::DuplicateLayer(id));
			}
		}
		if group_id == group_end_id {
			return Err(DocumentError::DuplicateLayer(group_end_id));
		}

		let moved: HashSet<LayerId> = if is_artboard { HashSet::new() } else { self.all_selected_ids().iter().copied().collect() };
		let visual_order = self.order();
		let slot = if moved.is_empty() { 0 } else { visual_order.iter().take_while(|id| !moved.contains(id)).count() };

		let mut order: Vec<_> = visual_order.iter().copied().filter(|id| !moved.contains(id)).collect();
		let bracket = once(group_id).chain(visual_order.iter().copied().filter(|id| moved.contains(id))).chain(once(group_end_id));
		order.splice(slot..slot, bracket);

		let mut layers = (*self.layers).clone();
		deselect_all(&mut layers);
		let group = Layer {
			selected: true,
			..Layer::group(self.document_id, group_id, name, is_artboard, bounds)
		};
		layers.insert(group_id, Arc::new(group));
		layers.insert(group_end_id, Arc::new(Layer::group_end(self.document_id, group_end_id)));
		order.reverse();

		Self::assemble(self.document_id, layers, order, self.preferences.clone())
	}

	/// Re-reads existing layers from fresh host descriptors. Their kinds may change, so the tree is rebuilt.
	pub fn reset_layers(&self, descriptors: &[Value], document: &DocumentInfo) -> Result<Self, DocumentError> {
		let mut layers = (*self.layers).clone();
		for descriptor in descriptors {
			let id = Layer::descriptor_id(descriptor)?;
			let layer = self.layer(id)?.reset_from_descriptor(descriptor, document.resolution)?;
			layers.insert(id, Arc::new(layer));
		}

		Self::assemble(self.document_id, layers, (*self.index).clone(), self.preferences.clone())
	}
}

fn deselect_all(layers: &mut HashMap<LayerId, Arc<Layer>>) {
	for layer in layers.values_mut().filter(|layer| layer.selected) {
		*layer = Arc::new(Layer { selected: false, ..(**layer).clone() });
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::layers::layer_kind::LayerKind;
	use crate::test_utils::*;

	use pretty_assertions::assert_eq;
	use serde_json::json;

	fn document() -> DocumentInfo {
		DocumentInfo::new(DOCUMENT_ID, 72.)
	}

	#[test]
	fn update_selection_overwrites_the_selection() {
		let structure = structure([selected(pixel(1)), pixel(2), pixel(3)]);
		let updated = structure.update_selection(&HashSet::from([2, 3, 42]));

		assert_eq!(updated.selected_ids(), [2, 3]);
		assert_eq!(updated.update_selection(&HashSet::from([2, 3])), updated);
		assert_eq!(structure.selected_ids(), [1]);
		assert!(!updated.shares_layer(&structure, 2));
		assert!(updated.update_selection(&HashSet::new()).selected_ids().is_empty());
	}

	#[test]
	fn delete_keeps_the_relative_order_of_survivors() {
		let structure = structure([pixel(1), pixel(2), pixel(3), pixel(4)]);
		let deleted = structure.delete_layers(&[3, 1]).unwrap();

		assert_eq!(deleted.order(), vec![2, 4]);
		assert!(deleted.by_id(1).is_none() && deleted.by_id(3).is_none());
		assert_eq!(deleted.len(), 2);
		assert!(deleted.shares_layer(&structure, 2));
		assert_eq!(structure.len(), 4);
	}

	#[test]
	fn deleting_a_group_deletes_its_contents() {
		let structure = structure([pixel(1), group(2), pixel(3), group_end(4), pixel(5)]);
		let deleted = structure.delete_layers(&[2]).unwrap();

		assert_eq!(deleted.order(), vec![1, 5]);
		assert_eq!(structure.delete_layers(&[9]), Err(DocumentError::LayerNotFound(9)));
	}

	#[test]
	fn reordering_can_drop_layers() {
		let structure = structure([pixel(1), pixel(2), pixel(3)]);

		assert_eq!(structure.update_order(&[3, 1, 2]).unwrap().order(), vec![3, 1, 2]);
		let shortened = structure.update_order(&[3, 1]).unwrap();
		assert_eq!(shortened.order(), vec![3, 1]);
		assert!(!shortened.contains(2));

		assert_eq!(structure.update_order(&[1, 2, 3, 4]), Err(DocumentError::OrderTooLong { requested: 4, available: 3 }));
		assert_eq!(structure.update_order(&[1, 7]), Err(DocumentError::LayerNotFound(7)));
		assert_eq!(structure.update_order(&[1, 1]), Err(DocumentError::DuplicateLayer(1)));
	}

	#[test]
	fn reordering_into_unbalanced_groups_fails() {
		let structure = structure([group(1), pixel(2), group_end(3)]);
		assert_eq!(structure.update_order(&[3, 2, 1]), Err(DocumentError::UnbalancedGroups(Some(3))));
	}

	#[test]
	fn grouping_a_flat_selection() {
		let structure = structure([selected(pixel(1)), selected(pixel(2)), selected(pixel(3))]);
		let grouped = structure.create_group(10, 11, "Group 1", false, None).unwrap();

		assert_eq!(ids(grouped.top_layers()), vec![10]);
		assert_eq!(ids(grouped.children(10)), vec![1, 2, 3, 11]);
		assert_eq!(grouped.selected_ids(), [10]);
		assert_eq!(grouped.by_id(10).map(|layer| layer.name.as_str()), Some("Group 1"));
	}

	#[test]
	fn group_takes_the_slot_of_the_top_most_selected_layer() {
		// 1
		// 2 ┬ 3
		//   └ 4
		// 5
		// 6
		let structure = structure([pixel(1), selected(group(2)), pixel(3), group_end(4), pixel(5), selected(pixel(6))]);
		let grouped = structure.create_group(10, 11, "Group", false, None).unwrap();

		assert_eq!(grouped.order(), vec![1, 10, 2, 3, 4, 6, 11, 5]);
		assert_eq!(ids(grouped.children(10)), vec![2, 6, 11]);
		assert_eq!(grouped.depth(3), Some(2));
	}

	#[test]
	fn artboards_and_empty_groups_go_on_top() {
		let structure = structure([pixel(1), selected(pixel(2))]);

		let artboard = structure.create_group(10, 11, "Artboard 1", true, Some(Bounds::new(0., 0., 100., 100.))).unwrap();
		assert_eq!(artboard.order(), vec![10, 11, 1, 2]);
		assert_eq!(artboard.child_bounds(10), Some(Bounds::new(0., 0., 100., 100.)));
		assert_eq!(artboard.selected_ids(), [10]);

		let deselected = structure.update_selection(&HashSet::new());
		assert_eq!(deselected.create_group(10, 11, "Group", false, None).unwrap().order(), vec![10, 11, 1, 2]);

		assert_eq!(structure.create_group(2, 11, "Group", false, None), Err(DocumentError::DuplicateLayer(2)));
	}

	#[test]
	fn added_layers_land_at_their_item_index() {
		init_logger();
		let structure = structure([selected(painted(1)), painted(2)]);
		let descriptors = [descriptor(7, LayerKind::Pixel, 4), descriptor(8, LayerKind::Vector, 2)];
		let added = structure.add_layers(&[7, 8], &descriptors, true, ReplaceLayer::Auto, &document()).unwrap();

		// Item indices count from the back, starting at 1
		assert_eq!(added.order(), vec![7, 1, 8, 2]);
		assert_eq!(added.selected_ids(), [7, 8]);
		assert_eq!(added.by_id(8).map(|layer| layer.kind), Some(LayerKind::Vector));
	}

	#[test]
	fn unselected_additions_keep_the_selection() {
		let structure = structure([selected(painted(1))]);
		let added = structure.add_layers(&[2], &[descriptor(2, LayerKind::Pixel, 2)], false, ReplaceLayer::Auto, &document()).unwrap();

		assert_eq!(added.order(), vec![2, 1]);
		assert_eq!(added.selected_ids(), [1]);
	}

	#[test]
	fn empty_placeholder_is_replaced() {
		let structure = structure([painted(1), selected(pixel(2)), painted(3)]);
		let descriptors = [descriptor(7, LayerKind::SmartObject, 2)];

		let replaced = structure.add_layers(&[7], &descriptors, true, ReplaceLayer::Auto, &document()).unwrap();
		assert_eq!(replaced.order(), vec![1, 7, 3]);

		let kept = structure.add_layers(&[7], &descriptors, true, ReplaceLayer::Never, &document()).unwrap();
		assert_eq!(kept.order(), vec![1, 2, 7, 3]);

		let disabled = structure.with_preferences(crate::Preferences {
			replace_empty_placeholder: false,
			..Default::default()
		});
		assert_eq!(disabled.add_layers(&[7], &descriptors, true, ReplaceLayer::Auto, &document()).unwrap().len(), 4);
	}

	#[test]
	fn painted_layers_are_only_replaced_on_request() {
		let structure = structure([painted(1), selected(painted(2))]);
		let descriptors = [descriptor(7, LayerKind::Pixel, 1)];

		assert_eq!(structure.add_layers(&[7], &descriptors, true, ReplaceLayer::Auto, &document()).unwrap().len(), 3);
		assert_eq!(structure.add_layers(&[7], &descriptors, true, ReplaceLayer::Always, &document()).unwrap().order(), vec![1, 7]);
		assert_eq!(structure.add_layers(&[7], &descriptors, true, ReplaceLayer::Layer(1), &document()).unwrap().order(), vec![2, 7]);
		assert_eq!(
			structure.add_layers(&[7], &descriptors, true, ReplaceLayer::Layer(5), &document()),
			Err(DocumentError::LayerNotFound(5))
		);
	}

	#[test]
	fn background_layer_takes_item_index_zero() {
		let background = Layer::new(DOCUMENT_ID, 1, "Background", LayerKind::Background);
		let structure = structure([painted(2), background]);
		let added = structure.add_layers(&[3], &[descriptor(3, LayerKind::Pixel, 1)], false, ReplaceLayer::Never, &document()).unwrap();

		assert!(added.has_background_layer());
		assert_eq!(added.order(), vec![2, 3, 1]);
	}

	#[test]
	fn invalid_additions_are_rejected() {
		let structure = structure([painted(1)]);

		assert_eq!(
			structure.add_layers(&[2], &[descriptor(2, LayerKind::Pixel, 5)], false, ReplaceLayer::Never, &document()),
			Err(DocumentError::InvalidItemIndex { index: 5, len: 1 })
		);
		assert_eq!(
			structure.add_layers(&[3], &[descriptor(2, LayerKind::Pixel, 1)], false, ReplaceLayer::Never, &document()),
			Err(DocumentError::IndexMismatch)
		);
		let kindless = json!({ "layerID": 2, "itemIndex": 1 });
		assert_eq!(
			structure.add_layers(&[2], &[kindless], false, ReplaceLayer::Never, &document()),
			Err(DocumentError::MissingField("layerKind"))
		);
	}

	#[test]
	fn reset_rereads_existing_layers() {
		let structure = structure([selected(painted(1)), pixel(2)]);
		let mut renamed = descriptor(1, LayerKind::Text, 2);
		renamed["name"] = json!("Title");

		let reset = structure.reset_layers(&[renamed], &document()).unwrap();
		let layer = reset.by_id(1).unwrap();
		assert_eq!((layer.name.as_str(), layer.kind, layer.selected), ("Title", LayerKind::Text, true));
		assert!(reset.shares_layer(&structure, 2));

		assert_eq!(structure.reset_layers(&[descriptor(9, LayerKind::Pixel, 1)], &document()), Err(DocumentError::LayerNotFound(9)));
	}
}
