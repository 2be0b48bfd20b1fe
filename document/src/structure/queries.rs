use super::LayerStructure;
use crate::bounds::Bounds;
use crate::layers::layer_info::Layer;
use crate::{DocumentError, LayerId};

use std::collections::HashMap;

// Index lookups
impl LayerStructure {
	pub fn by_id(&self, id: LayerId) -> Option<&Layer> {
		self.layers.get(&id).map(|layer| layer.as_ref())
	}

	/// Like [`LayerStructure::by_id`], for callers that treat an unknown id as an error.
	pub fn layer(&self, id: LayerId) -> Result<&Layer, DocumentError> {
		self.by_id(id).ok_or(DocumentError::LayerNotFound(id))
	}

	pub fn contains(&self, id: LayerId) -> bool {
		self.layers.contains_key(&id)
	}

	/// The layer at a 1-based visual index, 1 being the top-most layer.
	pub fn by_index(&self, index: usize) -> Option<&Layer> {
		if index == 0 {
			return None;
		}
		let position = self.index.len().checked_sub(index)?;
		self.index.get(position).and_then(|id| self.by_id(*id))
	}

	/// Inverse of [`LayerStructure::by_index`].
	pub fn index_of(&self, id: LayerId) -> Option<usize> {
		let indices = self.cache.visual_indices.get_or_init(|| self.visual_order().enumerate().map(|(position, id)| (id, position + 1)).collect());
		indices.get(&id).copied()
	}

	/// Every layer in visual order.
	pub fn all(&self) -> impl DoubleEndedIterator<Item = &Layer> + '_ {
		self.visual_order().filter_map(|id| self.by_id(id))
	}

	pub fn has_background_layer(&self) -> bool {
		self.all().any(|layer| layer.is_background)
	}
}

// Tree navigation
impl LayerStructure {
	pub fn top_layers(&self) -> Vec<&Layer> {
		self.lookup(self.tree.roots())
	}

	/// Top-level artboards in visual order.
	pub fn artboards(&self) -> Vec<&Layer> {
		self.top_layers().into_iter().filter(|layer| layer.is_artboard).collect()
	}

	pub fn parent(&self, id: LayerId) -> Option<&Layer> {
		self.tree.parent(id).and_then(|parent| self.by_id(parent))
	}

	/// Direct children in visual order. The group-end marker of a group is its last child.
	pub fn children(&self, id: LayerId) -> Vec<&Layer> {
		self.lookup(self.tree.children(id))
	}

	/// The layers sharing the parent of `id`, including the layer itself.
	pub fn siblings(&self, id: LayerId) -> Vec<&Layer> {
		if !self.tree.contains(id) {
			return Vec::new();
		}
		match self.tree.parent(id) {
			Some(parent) => self.children(parent),
			None => self.top_layers(),
		}
	}

	/// The chain from the top level down to the layer, ending with the layer itself.
	pub fn ancestors(&self, id: LayerId) -> Vec<&Layer> {
		let mut ancestors: Vec<_> = self.tree.ancestors(id).filter_map(|ancestor| self.by_id(ancestor)).collect();
		ancestors.reverse();
		ancestors
	}

	pub fn strict_ancestors(&self, id: LayerId) -> Vec<&Layer> {
		let mut ancestors = self.ancestors(id);
		ancestors.pop();
		ancestors
	}

	/// The whole subtree in post-order, ending with the layer itself.
	pub fn descendants(&self, id: LayerId) -> Vec<&Layer> {
		self.lookup(&self.tree.descendants(id))
	}

	pub fn strict_descendants(&self, id: LayerId) -> Vec<&Layer> {
		let mut descendants = self.descendants(id);
		descendants.pop();
		descendants
	}

	/// The top-level layer containing `id`, which is the layer itself when it is not nested.
	pub fn top_ancestor(&self, id: LayerId) -> Option<&Layer> {
		self.tree.ancestors(id).last().and_then(|ancestor| self.by_id(ancestor))
	}

	pub fn depth(&self, id: LayerId) -> Option<usize> {
		self.tree.depth(id)
	}

	/// The depth of the deepest layer in the subtree of `id`.
	pub fn max_descendant_depth(&self, id: LayerId) -> Option<usize> {
		let depths = self.cache.max_descendant_depths.get_or_init(|| {
			let mut depths = HashMap::with_capacity(self.len());
			for &root in self.tree.roots() {
				// Post-order visits children before their parent
				for descendant in self.tree.descendants(root) {
					let own = self.tree.depth(descendant).unwrap_or_default();
					let deepest = self.tree.children(descendant).iter().filter_map(|child| depths.get(child).copied()).fold(own, usize::max);
					depths.insert(descendant, deepest);
				}
			}
			depths
		});
		depths.get(&id).copied()
	}

	/// The marker closing the group `id`.
	pub fn group_end(&self, id: LayerId) -> Option<&Layer> {
		let layer = self.by_id(id)?;
		if !layer.is_group() {
			return None;
		}
		self.tree.children(id).last().and_then(|last| self.by_id(*last)).filter(|last| last.is_group_end())
	}
}

// Predicates folded over ancestors and descendants
impl LayerStructure {
	/// Whether the layer or any group containing it is locked.
	pub fn has_locked_ancestor(&self, id: LayerId) -> bool {
		self.any_ancestor(id, |layer| layer.locked)
	}

	/// Whether the layer or any group containing it is hidden.
	pub fn has_invisible_ancestor(&self, id: LayerId) -> bool {
		self.any_ancestor(id, |layer| !layer.visible)
	}

	/// Whether the layer or any group containing it is selected.
	pub fn has_selected_ancestor(&self, id: LayerId) -> bool {
		self.any_ancestor(id, |layer| layer.selected)
	}

	fn any_ancestor(&self, id: LayerId, predicate: impl Fn(&Layer) -> bool) -> bool {
		self.tree.ancestors(id).filter_map(|ancestor| self.by_id(ancestor)).any(predicate)
	}

	/// Whether anything with content in the subtree of `id`, including `id` itself, is actually shown.
	///
	/// Plain groups and group-end markers have no content of their own and are not considered. Artboards are.
	pub fn has_visible_descendant(&self, id: LayerId) -> bool {
		self.descendants(id)
			.into_iter()
			.filter(|layer| layer.is_artboard || !(layer.is_group() || layer.is_group_end()))
			.any(|layer| layer.visible && !self.has_invisible_ancestor(layer.id))
	}

	/// A group holding nothing but its group-end marker, or whose only child besides adjustments is itself an empty group.
	pub fn is_empty_group(&self, id: LayerId) -> bool {
		if !self.by_id(id).is_some_and(Layer::is_group) {
			return false;
		}

		let contents: Vec<_> = self.children(id).into_iter().filter(|child| !child.is_group_end()).collect();
		if contents.is_empty() {
			return true;
		}

		match contents.iter().filter(|child| !child.is_adjustment()).collect::<Vec<_>>().as_slice() {
			[only] => self.is_empty_group(only.id),
			_ => false,
		}
	}
}

// Geometry aggregation
impl LayerStructure {
	/// The visual extent of a layer.
	///
	/// Plain groups span the union of their children's extents (ignoring empty ones), artboards their own canvas.
	/// Group-end markers and empty groups have no extent.
	pub fn child_bounds(&self, id: LayerId) -> Option<Bounds> {
		let child_bounds = self.cache.child_bounds.get_or_init(|| {
			let mut child_bounds = HashMap::with_capacity(self.len());
			for &root in self.tree.roots() {
				for descendant in self.tree.descendants(root) {
					if let Some(bounds) = self.compute_child_bounds(descendant, &child_bounds) {
						child_bounds.insert(descendant, bounds);
					}
				}
			}
			child_bounds
		});
		child_bounds.get(&id).copied()
	}

	/// Expects the extents of all children of `id` in `known`.
	fn compute_child_bounds(&self, id: LayerId, known: &HashMap<LayerId, Bounds>) -> Option<Bounds> {
		let layer = self.by_id(id)?;
		if layer.is_group_end() {
			None
		} else if layer.is_group() && !layer.is_artboard {
			let children: Vec<_> = self.tree.children(id).iter().filter_map(|child| known.get(child)).filter(|bounds| !bounds.is_empty()).collect();
			Bounds::union(children)
		} else {
			layer.bounds
		}
	}

	/// The union of the extents of all top-level layers.
	pub fn overall_bounds(&self) -> Option<Bounds> {
		let bounds: Vec<_> = self.tree.roots().iter().filter_map(|root| self.child_bounds(*root)).filter(|bounds| bounds.area() > 0.).collect();
		Bounds::union(&bounds)
	}

	/// The extent of a layer clipped to its artboard, if it is inside one.
	pub fn bounds_within_artboard(&self, id: LayerId) -> Option<Bounds> {
		let bounds = self.child_bounds(id)?;
		match self.top_ancestor(id) {
			Some(top) if top.is_artboard => Bounds::intersection(&bounds, &self.child_bounds(top.id)?),
			_ => Some(bounds),
		}
	}
}
