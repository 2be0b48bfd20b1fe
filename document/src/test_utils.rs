//! Builders for compact layer fixtures.

use crate::layers::layer_info::Layer;
use crate::layers::layer_kind::LayerKind;
use crate::{Bounds, DocumentId, LayerId, LayerStructure};

use serde_json::{Value, json};

pub const DOCUMENT_ID: DocumentId = 1;

pub fn init_logger() {
	let _ = env_logger::builder().is_test(true).try_init();
}

pub fn pixel(id: LayerId) -> Layer {
	Layer::new(DOCUMENT_ID, id, format!("Layer {id}"), LayerKind::Pixel)
}

/// A pixel layer covering `{0, 0, 10, 10}`.
pub fn painted(id: LayerId) -> Layer {
	Layer {
		bounds: Some(Bounds::new(0., 0., 10., 10.)),
		..pixel(id)
	}
}

pub fn group(id: LayerId) -> Layer {
	Layer::group(DOCUMENT_ID, id, format!("Group {id}"), false, None)
}

pub fn artboard(id: LayerId, bounds: Bounds) -> Layer {
	Layer::group(DOCUMENT_ID, id, format!("Artboard {id}"), true, Some(bounds))
}

pub fn group_end(id: LayerId) -> Layer {
	Layer::group_end(DOCUMENT_ID, id)
}

pub fn selected(layer: Layer) -> Layer {
	Layer { selected: true, ..layer }
}

/// A structure from layers listed in visual order, top first.
pub fn structure(layers: impl IntoIterator<Item = Layer>) -> LayerStructure {
	LayerStructure::from_layers(DOCUMENT_ID, layers).expect("fixture layers should be balanced")
}

/// A minimal host descriptor of a layer.
pub fn descriptor(id: LayerId, kind: LayerKind, item_index: i64) -> Value {
	json!({
		"layerID": id,
		"layerKind": kind.code(),
		"itemIndex": item_index,
		"name": format!("Layer {id}"),
		"bounds": { "top": 0, "left": 0, "bottom": 10, "right": 10 },
	})
}

pub fn ids<'a>(layers: impl IntoIterator<Item = &'a Layer>) -> Vec<LayerId> {
	layers.into_iter().map(|layer| layer.id).collect()
}
