use crate::LayerId;
use crate::layers::layer_info::LayerField;
use crate::structure::LayerStructure;

use serde::{Deserialize, Serialize};
use std::fmt;

/// What an edit changed, in enough detail to replay it as host commands.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum StructureResponse {
	CreatedLayer {
		id: LayerId,
	},
	DeletedLayer {
		id: LayerId,
	},
	/// Triggers an update of the layer in the layers panel. Selection changes are reported separately.
	LayerChanged {
		id: LayerId,
		fields: Vec<LayerField>,
	},
	/// The new stacking order, top-most first.
	OrderChanged {
		order: Vec<LayerId>,
	},
	/// The derived tree differs, including a change in the order of siblings.
	StructureChanged,
	SelectionChanged {
		selected: Vec<LayerId>,
	},
}

impl StructureResponse {
	/// Compares two versions of a document: deletions, creations, per-layer changes, then order, hierarchy and selection.
	pub fn diff(old: &LayerStructure, new: &LayerStructure) -> Vec<StructureResponse> {
		let mut responses: Vec<_> = old.order().into_iter().filter(|&id| !new.contains(id)).map(|id| StructureResponse::DeletedLayer { id }).collect();
		responses.extend(new.order().into_iter().filter(|&id| !old.contains(id)).map(|id| StructureResponse::CreatedLayer { id }));

		for layer in new.all() {
			if new.shares_layer(old, layer.id) {
				continue;
			}
			let Some(previous) = old.by_id(layer.id) else { continue };

			let fields: Vec<_> = previous.changed_fields(layer).into_iter().filter(|field| *field != LayerField::Selected).collect();
			if !fields.is_empty() {
				responses.push(StructureResponse::LayerChanged { id: layer.id, fields });
			}
		}

		let order = new.order();
		if old.order() != order {
			responses.push(StructureResponse::OrderChanged { order });
		}
		if old.tree() != new.tree() {
			responses.push(StructureResponse::StructureChanged);
		}
		if old.selected_ids() != new.selected_ids() {
			responses.push(StructureResponse::SelectionChanged {
				selected: new.selected_ids().to_vec(),
			});
		}

		responses
	}
}

impl fmt::Display for StructureResponse {
	fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
		let name = match self {
			StructureResponse::CreatedLayer { .. } => "CreatedLayer",
			StructureResponse::DeletedLayer { .. } => "DeletedLayer",
			StructureResponse::LayerChanged { .. } => "LayerChanged",
			StructureResponse::OrderChanged { .. } => "OrderChanged",
			StructureResponse::StructureChanged => "StructureChanged",
			StructureResponse::SelectionChanged { .. } => "SelectionChanged",
		};

		formatter.write_str(name)
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::test_utils::*;

	#[test]
	fn reordering_siblings_changes_order_and_structure() {
		let structure = structure([pixel(1), pixel(2)]);
		let swapped = structure.update_order(&[2, 1]).unwrap();

		assert_eq!(
			StructureResponse::diff(&structure, &swapped),
			vec![StructureResponse::OrderChanged { order: vec![2, 1] }, StructureResponse::StructureChanged]
		);
		assert!(StructureResponse::diff(&structure, &structure).is_empty());
	}

	#[test]
	fn responses_display_their_kind() {
		assert_eq!(StructureResponse::LayerChanged { id: 1, fields: vec![] }.to_string(), "LayerChanged");
		assert_eq!(StructureResponse::StructureChanged.to_string(), "StructureChanged");
	}
}
