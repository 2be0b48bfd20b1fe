//! The parent/children forest derived from a flat layer order.

use crate::layers::layer_info::Layer;
use crate::{DocumentError, LayerId};

use log::trace;
use std::collections::HashMap;

/// Position of one layer in the derived tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerNode {
	pub id: LayerId,
	pub parent: Option<LayerId>,
	/// Children in visual order, ending with the group-end marker for groups.
	pub children: Vec<LayerId>,
	/// Number of enclosing groups. Top-level layers have depth 0.
	pub depth: usize,
}

/// The forest of a document, rebuilt from scratch whenever the layer order changes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LayerTree {
	nodes: HashMap<LayerId, LayerNode>,
	roots: Vec<LayerId>,
}

impl LayerTree {
	/// Builds the tree from layers in visual order (front to back).
	///
	/// A group layer opens a bracket which the next group-end marker closes, so a group is listed above its children and its
	/// group-end below them. The group-end itself is the last child of its group.
	pub fn build<'a>(visual_order: impl IntoIterator<Item = &'a Layer>) -> Result<Self, DocumentError> {
		let mut tree = LayerTree::default();
		let mut stack: Vec<LayerId> = Vec::new();

		for layer in visual_order {
			let parent = stack.last().copied();
			if layer.is_group_end() && parent.is_none() {
				return Err(DocumentError::UnbalancedGroups(Some(layer.id)));
			}

			trace!("Visiting layer {} ({}) at depth {}", layer.id, layer.kind, stack.len());
			tree.nodes.insert(
				layer.id,
				LayerNode {
					id: layer.id,
					parent,
					children: Vec::new(),
					depth: stack.len(),
				},
			);
			match parent.and_then(|parent| tree.nodes.get_mut(&parent)) {
				Some(parent) => parent.children.push(layer.id),
				None => tree.roots.push(layer.id),
			}

			if layer.is_group() {
				stack.push(layer.id);
			} else if layer.is_group_end() {
				stack.pop();
			}
		}

		match stack.last() {
			Some(unclosed) => Err(DocumentError::UnbalancedGroups(Some(*unclosed))),
			None => Ok(tree),
		}
	}

	pub fn node(&self, id: LayerId) -> Option<&LayerNode> {
		self.nodes.get(&id)
	}

	pub fn contains(&self, id: LayerId) -> bool {
		self.nodes.contains_key(&id)
	}

	/// Top-level layers in visual order.
	pub fn roots(&self) -> &[LayerId] {
		&self.roots
	}

	pub fn parent(&self, id: LayerId) -> Option<LayerId> {
		self.nodes.get(&id).and_then(|node| node.parent)
	}

	pub fn children(&self, id: LayerId) -> &[LayerId] {
		self.nodes.get(&id).map_or(&[], |node| node.children.as_slice())
	}

	pub fn depth(&self, id: LayerId) -> Option<usize> {
		self.nodes.get(&id).map(|node| node.depth)
	}

	/// The layer itself followed by its parent, grandparent and so on up to the top level.
	pub fn ancestors(&self, id: LayerId) -> AxisIter<'_> {
		AxisIter {
			layer: self.contains(id).then_some(id),
			next_layer: Self::parent,
			tree: self,
		}
	}

	/// All layers below `id` in post-order, with `id` itself last.
	pub fn descendants(&self, id: LayerId) -> Vec<LayerId> {
		let mut descendants = Vec::new();
		if self.contains(id) {
			self.push_descendants(id, &mut descendants);
		}
		descendants
	}

	fn push_descendants(&self, id: LayerId, descendants: &mut Vec<LayerId>) {
		for &child in self.children(id) {
			self.push_descendants(child, descendants);
		}
		descendants.push(id);
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

/// Iterator over specified axis.
#[derive(Clone)]
pub struct AxisIter<'a> {
	layer: Option<LayerId>,
	next_layer: fn(&LayerTree, LayerId) -> Option<LayerId>,
	tree: &'a LayerTree,
}

impl Iterator for AxisIter<'_> {
	type Item = LayerId;

	fn next(&mut self) -> Option<Self::Item> {
		let layer = self.layer.take();
		self.layer = layer.and_then(|layer| (self.next_layer)(self.tree, layer));
		layer
	}
}
