//! # Layer document
//! A copy-on-write model of a host image editor's layer stack.
//!
//! The host emits flat lists of layer descriptors after every document-affecting operation.
//! [`LayerStructure`](structure::LayerStructure) turns such a snapshot into an immutable tree and exposes the
//! derived views the panel needs (selection, hierarchy, bounds). Edits never mutate a structure in place:
//! each one returns a new [`LayerStructure`](structure::LayerStructure) that shares every untouched layer record
//! with its predecessor.

pub mod bounds;
pub mod color;
pub mod consts;
pub mod descriptor;
pub mod error;
pub mod layers;
pub mod node;
pub mod operation;
pub mod preferences;
pub mod response;
pub mod structure;

#[cfg(test)]
pub(crate) mod test_utils;

pub use bounds::Bounds;
pub use error::DocumentError;
pub use layers::layer_info::Layer;
pub use operation::Operation;
pub use preferences::{DocumentInfo, Preferences};
pub use response::StructureResponse;
pub use structure::LayerStructure;

/// Host-assigned layer identifier, unique within its owning document.
pub type LayerId = u64;

/// Host-assigned document identifier.
pub type DocumentId = u64;
