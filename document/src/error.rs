use crate::LayerId;

use thiserror::Error;

/// A set of different errors that can occur when reading descriptors or editing a [`LayerStructure`](crate::LayerStructure).
///
/// All of them are programmer or input-consistency errors. The structure that produced the error is left untouched.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum DocumentError {
	#[error("Layer {0} does not exist in the document")]
	LayerNotFound(LayerId),

	#[error("Layer {0} already exists in the document")]
	DuplicateLayer(LayerId),

	#[error("Descriptor is missing the required field `{0}`")]
	MissingField(&'static str),

	#[error("Descriptor field `{field}` is malformed: {reason}")]
	InvalidField { field: &'static str, reason: String },

	#[error("Unknown layer kind code {0}")]
	UnknownLayerKind(i64),

	#[error("Unknown layer effect type `{0}`")]
	UnknownLayerEffect(String),

	#[error("Unknown unit `{0}`")]
	UnknownUnit(String),

	#[error("New order has {requested} entries but the document only has {available} layers")]
	OrderTooLong { requested: usize, available: usize },

	#[error("Layer order does not match the set of layers")]
	IndexMismatch,

	#[error("Group and group-end markers are unbalanced around layer {0:?}")]
	UnbalancedGroups(Option<LayerId>),

	#[error("Layer {0} has no fill")]
	MissingFill(LayerId),

	#[error("Layer {0} has no stroke")]
	MissingStroke(LayerId),

	#[error("Layer {0} has no text")]
	MissingText(LayerId),

	#[error("Item index {index} is out of bounds for a document of {len} layers")]
	InvalidItemIndex { index: i64, len: usize },

	#[error("Invalid preferences:\n{0}")]
	InvalidPreferences(String),
}
