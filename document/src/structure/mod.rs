//! # Layer structure
//! The document-level model: every layer of a document, their stacking order and the tree derived from it.
//!
//! A [`LayerStructure`] is immutable. Queries are memoized per instance, and every edit returns a new instance that shares
//! the records of all untouched layers with the old one. Instances can therefore be kept around and compared freely.

mod mutations;
mod properties;
mod queries;
mod selection;

pub use mutations::ReplaceLayer;

use crate::bounds::Bounds;
use crate::layers::layer_info::Layer;
use crate::node::LayerTree;
use crate::preferences::{DocumentInfo, Preferences};
use crate::{DocumentError, DocumentId, LayerId};

use once_cell::sync::OnceCell;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Values derived from one [`LayerStructure`] instance. Never carried over to an edited copy.
#[derive(Debug, Default)]
struct DerivedCache {
	/// 1-based visual index of every layer.
	visual_indices: OnceCell<HashMap<LayerId, usize>>,
	selected: OnceCell<Vec<LayerId>>,
	selected_normalized: OnceCell<Vec<LayerId>>,
	all_selected: OnceCell<Vec<LayerId>>,
	selectable: OnceCell<Vec<LayerId>>,
	child_bounds: OnceCell<HashMap<LayerId, Bounds>>,
	max_descendant_depths: OnceCell<HashMap<LayerId, usize>>,
}

#[derive(Debug, Clone)]
pub struct LayerStructure {
	document_id: DocumentId,
	layers: Arc<HashMap<LayerId, Arc<Layer>>>,
	/// Layer ids from back to front: position 0 is the bottom-most layer, matching the host's item indices.
	index: Arc<Vec<LayerId>>,
	tree: Arc<LayerTree>,
	preferences: Arc<Preferences>,
	cache: Arc<DerivedCache>,
}

impl PartialEq for LayerStructure {
	fn eq(&self, other: &Self) -> bool {
		self.document_id == other.document_id && self.index == other.index && self.layers == other.layers && self.preferences == other.preferences
	}
}

impl LayerStructure {
	/// A document without layers.
	pub fn new(document_id: DocumentId) -> Self {
		Self {
			document_id,
			layers: Arc::default(),
			index: Arc::default(),
			tree: Arc::default(),
			preferences: Arc::default(),
			cache: Arc::default(),
		}
	}

	/// Builds a structure from layers listed in visual order, top-most first.
	pub fn from_layers(document_id: DocumentId, visual_order: impl IntoIterator<Item = Layer>) -> Result<Self, DocumentError> {
		let mut layers = HashMap::new();
		let mut index = Vec::new();
		for layer in visual_order {
			if layers.contains_key(&layer.id) {
				return Err(DocumentError::DuplicateLayer(layer.id));
			}
			index.push(layer.id);
			layers.insert(layer.id, Arc::new(layer));
		}
		index.reverse();

		Self::assemble(document_id, layers, index, Arc::default())
	}

	/// Builds a structure from a full dump of host layer descriptors, in any order.
	///
	/// Layers are stacked by their `itemIndex`. Layers listed in `selected_ids` start out selected.
	pub fn from_descriptors(document: &DocumentInfo, descriptors: &[Value], selected_ids: &HashSet<LayerId>) -> Result<Self, DocumentError> {
		let mut layers = descriptors
			.iter()
			.map(|descriptor| {
				let item_index = Layer::item_index(descriptor)?;
				let mut layer = Layer::from_descriptor(document.id, descriptor, false, document.resolution)?;
				layer.selected = selected_ids.contains(&layer.id);
				Ok((item_index, layer))
			})
			.collect::<Result<Vec<_>, DocumentError>>()?;

		layers.sort_by_key(|(item_index, _)| std::cmp::Reverse(*item_index));
		if layers.windows(2).any(|pair| pair[0].0 == pair[1].0) {
			return Err(DocumentError::IndexMismatch);
		}

		Self::from_layers(document.id, layers.into_iter().map(|(_, layer)| layer))
	}

	pub fn with_preferences(&self, preferences: Preferences) -> Self {
		Self {
			preferences: Arc::new(preferences),
			cache: Arc::default(),
			..self.clone()
		}
	}

	/// Validates that `index` lists every layer exactly once and derives the tree from it.
	fn assemble(document_id: DocumentId, layers: HashMap<LayerId, Arc<Layer>>, index: Vec<LayerId>, preferences: Arc<Preferences>) -> Result<Self, DocumentError> {
		if index.len() != layers.len() {
			return Err(DocumentError::IndexMismatch);
		}

		let visual_order = index
			.iter()
			.rev()
			.map(|id| layers.get(id).map(Arc::as_ref).ok_or(DocumentError::LayerNotFound(*id)))
			.collect::<Result<Vec<_>, _>>()?;
		let tree = LayerTree::build(visual_order)?;
		if tree.len() != index.len() {
			return Err(DocumentError::IndexMismatch);
		}

		Ok(Self {
			document_id,
			layers: Arc::new(layers),
			index: Arc::new(index),
			tree: Arc::new(tree),
			preferences,
			cache: Arc::default(),
		})
	}

	/// A copy with replaced layer records but the same order. Layer kinds must be unchanged, as the tree is reused.
	fn with_layers(&self, layers: HashMap<LayerId, Arc<Layer>>) -> Self {
		Self {
			layers: Arc::new(layers),
			cache: Arc::default(),
			..self.clone()
		}
	}

	pub fn document_id(&self) -> DocumentId {
		self.document_id
	}

	pub fn preferences(&self) -> &Preferences {
		&self.preferences
	}

	pub fn tree(&self) -> &LayerTree {
		&self.tree
	}

	pub fn len(&self) -> usize {
		self.index.len()
	}

	pub fn is_empty(&self) -> bool {
		self.index.is_empty()
	}

	/// Layer ids in visual order, top-most first.
	pub fn order(&self) -> Vec<LayerId> {
		self.visual_order().collect()
	}

	fn visual_order(&self) -> impl DoubleEndedIterator<Item = LayerId> + '_ {
		self.index.iter().rev().copied()
	}

	/// Whether both instances hold the very same record for `id`.
	pub(crate) fn shares_layer(&self, other: &LayerStructure, id: LayerId) -> bool {
		match (self.layers.get(&id), other.layers.get(&id)) {
			(Some(a), Some(b)) => Arc::ptr_eq(a, b),
			_ => false,
		}
	}

	fn lookup<'a>(&self, ids: impl IntoIterator<Item = &'a LayerId>) -> Vec<&Layer> {
		ids.into_iter().filter_map(|id| self.by_id(*id)).collect()
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::layers::layer_kind::LayerKind;
	use crate::test_utils::*;

	#[test]
	fn order_is_visual_while_index_is_back_to_front() {
		let structure = structure([pixel(1), pixel(2), pixel(3)]);

		assert_eq!(structure.order(), vec![1, 2, 3]);
		assert_eq!(*structure.index, vec![3, 2, 1]);
	}

	#[test]
	fn duplicate_and_unbalanced_layers_are_rejected() {
		assert_eq!(LayerStructure::from_layers(DOCUMENT_ID, [pixel(1), pixel(1)]), Err(DocumentError::DuplicateLayer(1)));
		assert_eq!(LayerStructure::from_layers(DOCUMENT_ID, [group(1), pixel(2)]), Err(DocumentError::UnbalancedGroups(Some(1))));
	}

	#[test]
	fn descriptors_are_stacked_by_item_index() {
		init_logger();
		let document = DocumentInfo::new(DOCUMENT_ID, 72.);
		let descriptors = [descriptor(5, LayerKind::Pixel, 1), descriptor(6, LayerKind::Text, 3), descriptor(7, LayerKind::Vector, 2)];
		let structure = LayerStructure::from_descriptors(&document, &descriptors, &HashSet::from([7])).unwrap();

		assert_eq!(structure.order(), vec![6, 7, 5]);
		assert_eq!(ids(structure.selected()), vec![7]);

		let clashing = [descriptor(5, LayerKind::Pixel, 1), descriptor(6, LayerKind::Pixel, 1)];
		assert_eq!(LayerStructure::from_descriptors(&document, &clashing, &HashSet::new()), Err(DocumentError::IndexMismatch));
	}

	#[test]
	fn preferences_reset_derived_values() {
		let structure = structure([pixel(1)]);
		let tuned = structure.with_preferences(Preferences {
			select_below_artboards: false,
			..Default::default()
		});

		assert!(!tuned.preferences().select_below_artboards);
		assert_ne!(structure, tuned);
	}
}
