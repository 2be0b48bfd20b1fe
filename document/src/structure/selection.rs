use super::LayerStructure;
use crate::bounds::Bounds;
use crate::layers::layer_info::Layer;
use crate::LayerId;

use std::collections::HashSet;

impl LayerStructure {
	/// Ids of the selected layers in visual order.
	pub fn selected_ids(&self) -> &[LayerId] {
		self.cache.selected.get_or_init(|| self.all().filter(|layer| layer.selected).map(|layer| layer.id).collect())
	}

	/// Selected layers in visual order.
	pub fn selected(&self) -> Vec<&Layer> {
		self.lookup(self.selected_ids())
	}

	/// The selection without layers whose group is selected as well.
	pub fn selected_normalized(&self) -> Vec<&Layer> {
		let normalized = self.cache.selected_normalized.get_or_init(|| {
			self.selected_ids()
				.iter()
				.copied()
				.filter(|&id| !self.tree.ancestors(id).skip(1).any(|ancestor| self.by_id(ancestor).is_some_and(|layer| layer.selected)))
				.collect()
		});
		self.lookup(normalized)
	}

	/// The selected layers together with everything nested inside them, in visual order.
	pub fn all_selected(&self) -> Vec<&Layer> {
		self.lookup(self.all_selected_ids())
	}

	pub(super) fn all_selected_ids(&self) -> &[LayerId] {
		self.cache
			.all_selected
			.get_or_init(|| self.visual_order().filter(|&id| self.has_selected_ancestor(id)).collect())
	}

	/// The layers a click on the canvas may select next, in visual order.
	///
	/// Top-level layers (or the children of top-level artboards) are always candidates. For every selected layer, each of its
	/// groups is in turn replaced by that group's children, so the siblings of a nested selection become reachable without
	/// exposing the levels in between. Locked layers, layers with nothing visible in them, group-end markers, the background
	/// and the replaced groups themselves are left out.
	pub fn selectable(&self) -> Vec<&Layer> {
		let selectable = self.cache.selectable.get_or_init(|| {
			let mut candidates: Vec<LayerId> = Vec::new();
			for &root in self.tree.roots() {
				match self.by_id(root) {
					Some(layer) if layer.is_artboard && self.preferences.select_below_artboards => candidates.extend(self.tree.children(root)),
					_ => candidates.push(root),
				}
			}

			let mut visited = HashSet::new();
			for &selected in self.selected_ids() {
				let mut current = self.tree.parent(selected);
				while let Some(ancestor) = current {
					if !visited.insert(ancestor) {
						break;
					}
					candidates.retain(|&candidate| candidate != ancestor);
					candidates.extend(self.tree.children(ancestor));
					current = self.tree.parent(ancestor);
				}
			}

			let candidates: HashSet<_> = candidates.into_iter().collect();
			self.visual_order()
				.filter(|id| candidates.contains(id) && !visited.contains(id))
				.filter(|&id| self.by_id(id).is_some_and(Layer::is_super_selectable) && self.has_visible_descendant(id) && !self.has_locked_ancestor(id))
				.collect()
		});
		self.lookup(selectable)
	}

	/// The extent of every selected layer that has one.
	pub fn selected_child_bounds(&self) -> Vec<(&Layer, Bounds)> {
		self.selected().into_iter().filter_map(|layer| self.child_bounds(layer.id).map(|bounds| (layer, bounds))).collect()
	}

	/// The union of the non-empty extents of the selected layers.
	pub fn selected_area_bounds(&self) -> Option<Bounds> {
		let bounds: Vec<_> = self.selected_child_bounds().into_iter().map(|(_, bounds)| bounds).filter(|bounds| bounds.area() > 0.).collect();
		Bounds::union(&bounds)
	}

	/// Whether any selected layer is locked, directly or through one of its groups.
	pub fn selected_locked(&self) -> bool {
		self.selected_ids().iter().any(|&id| self.has_locked_ancestor(id))
	}

	/// Whether every selected layer is visible. True for an empty selection.
	pub fn all_visible(&self) -> bool {
		self.selected().iter().all(|layer| layer.visible)
	}

	/// Whether there is a selection and all of it is locked.
	pub fn all_locked(&self) -> bool {
		let selected = self.selected();
		!selected.is_empty() && selected.iter().all(|layer| layer.locked)
	}

	pub fn has_linked_selected(&self) -> bool {
		self.selected().iter().any(|layer| layer.is_linked)
	}

	/// Whether deleting the selection leaves at least one layer with content behind.
	///
	/// Deleting a group removes its contents too, so the layers remaining are those outside [`LayerStructure::all_selected`].
	pub fn selected_layers_deletable(&self) -> bool {
		if self.selected_ids().is_empty() {
			return false;
		}

		let doomed: HashSet<_> = self.all_selected_ids().iter().copied().collect();
		self.all().filter(|layer| !doomed.contains(&layer.id)).any(|layer| !layer.is_group() && !layer.is_group_end())
	}
}

#[cfg(test)]
mod test {
	use crate::Bounds;
	use crate::layers::layer_info::Layer;
	use crate::test_utils::*;

	use pretty_assertions::assert_eq;

	// 1
	// 2 ┬ 3
	//   ├ 4 ┬ 5
	//   │   └ 6
	//   └ 7
	// 8
	fn nested(selected_ids: &[u64]) -> crate::LayerStructure {
		let layers = [painted(1), group(2), pixel(3), group(4), pixel(5), group_end(6), group_end(7), pixel(8)];
		structure(layers.into_iter().map(|layer| Layer {
			selected: selected_ids.contains(&layer.id),
			..layer
		}))
	}

	#[test]
	fn nested_selections_are_normalized() {
		let structure = nested(&[5, 2]);

		assert_eq!(ids(structure.selected()), vec![2, 5]);
		assert_eq!(ids(structure.selected_normalized()), vec![2]);
		assert_eq!(ids(structure.all_selected()), vec![2, 3, 4, 5, 6, 7]);
	}

	#[test]
	fn selectable_without_selection_is_the_top_level() {
		assert_eq!(ids(nested(&[]).selectable()), vec![1, 2, 8]);
	}

	#[test]
	fn selecting_a_nested_layer_exposes_its_siblings() {
		let structure = nested(&[5]);

		// Groups 2 and 4 are replaced by their children, their group-end markers are never selectable
		assert_eq!(ids(structure.selectable()), vec![1, 3, 5, 8]);
	}

	#[test]
	fn hidden_and_locked_layers_are_not_selectable() {
		let layers = [Layer { visible: false, ..pixel(1) }, Layer { locked: true, ..group(2) }, pixel(3), group_end(4), pixel(5)];
		let structure = structure(layers);

		assert_eq!(ids(structure.selectable()), vec![5]);
	}

	#[test]
	fn groups_without_visible_content_are_not_selectable() {
		let layers = [group(1), Layer { visible: false, ..painted(2) }, group_end(3), group(4), group_end(5), painted(6)];
		let structure = structure(layers);

		assert!(!structure.has_visible_descendant(1));
		assert!(!structure.has_visible_descendant(4));
		assert_eq!(ids(structure.selectable()), vec![6]);
	}

	#[test]
	fn artboard_children_are_selectable_directly() {
		let layers = || [artboard(1, Bounds::new(0., 0., 100., 100.)), pixel(2), pixel(3), group_end(4), pixel(5)];
		assert_eq!(ids(structure(layers()).selectable()), vec![2, 3, 5]);

		let preferences = crate::Preferences {
			select_below_artboards: false,
			..Default::default()
		};
		assert_eq!(ids(structure(layers()).with_preferences(preferences).selectable()), vec![1, 5]);
	}

	#[test]
	fn deletable_selections() {
		assert!(!structure([pixel(1), pixel(2)]).selected_layers_deletable());
		assert!(structure([selected(pixel(1)), pixel(2)]).selected_layers_deletable());
		assert!(!structure([selected(pixel(1)), selected(pixel(2))]).selected_layers_deletable());
		// Only the shell of a group would remain
		assert!(!structure([selected(pixel(1)), group(2), group_end(3)]).selected_layers_deletable());
		// Deleting the group takes its content along
		assert!(!structure([selected(group(1)), pixel(2), group_end(3)]).selected_layers_deletable());
	}

	#[test]
	fn selection_summaries() {
		let layers = [
			selected(Layer { locked: true, ..painted(1) }),
			selected(Layer {
				bounds: Some(Bounds::new(20., 20., 30., 30.)),
				is_linked: true,
				..pixel(2)
			}),
			Layer { visible: false, ..pixel(3) },
		];
		let structure = structure(layers);

		assert_eq!(structure.selected_area_bounds(), Some(Bounds::new(0., 0., 30., 30.)));
		assert_eq!(structure.selected_child_bounds().len(), 2);
		assert!(structure.selected_locked());
		assert!(!structure.all_locked());
		assert!(structure.all_visible());
		assert!(structure.has_linked_selected());
	}
}
