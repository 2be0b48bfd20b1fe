//! # Layers
//! A document consists of a flat, ordered list of [Layers](layer_info::Layer).
//! Grouping is encoded positionally: a [group](layer_kind::LayerKind::Group) layer opens a bracket that the next unmatched
//! [group-end](layer_kind::LayerKind::GroupEnd) marker below it closes. The tree is derived from that order by [crate::node].
//!
//! Besides identity and flags, a layer carries optional style attributes, each an immutable value read from the host
//! descriptor and writable back to one:
//! * [Fill](style::Fill) and [Stroke](style::Stroke) of vector and solid color layers
//! * [Radii](radii::Radii) of rounded rectangles
//! * [Shadows](effects::Shadow) grouped in [LayerEffects](effects::LayerEffects)
//! * [Text](text::Text) with its character and paragraph styles

/// Different ways of combining overlapping layers.
pub mod blend_mode;
pub mod effects;
/// Contains the base [Layer](layer_info::Layer) type.
pub mod layer_info;
pub mod layer_kind;
pub mod radii;
pub mod style;
pub mod text;
