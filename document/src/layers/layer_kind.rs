use crate::DocumentError;

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of layer kinds the host reports through the `layerKind` descriptor field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerKind {
	Pixel,
	Adjustment,
	Text,
	Vector,
	SmartObject,
	Video,
	Group,
	/// Structural marker closing the most recently opened group. Has no geometry.
	GroupEnd,
	ThreeD,
	Background,
	Gradient,
	Pattern,
	SolidColor,
}

impl LayerKind {
	pub fn from_code(code: i64) -> Result<Self, DocumentError> {
		Ok(match code {
			1 => LayerKind::Pixel,
			2 => LayerKind::Adjustment,
			3 => LayerKind::Text,
			4 => LayerKind::Vector,
			5 => LayerKind::SmartObject,
			6 => LayerKind::Video,
			7 => LayerKind::Group,
			8 => LayerKind::ThreeD,
			9 => LayerKind::Gradient,
			10 => LayerKind::Pattern,
			11 => LayerKind::SolidColor,
			12 => LayerKind::Background,
			13 => LayerKind::GroupEnd,
			_ => return Err(DocumentError::UnknownLayerKind(code)),
		})
	}

	pub fn code(&self) -> i64 {
		match self {
			LayerKind::Pixel => 1,
			LayerKind::Adjustment => 2,
			LayerKind::Text => 3,
			LayerKind::Vector => 4,
			LayerKind::SmartObject => 5,
			LayerKind::Video => 6,
			LayerKind::Group => 7,
			LayerKind::ThreeD => 8,
			LayerKind::Gradient => 9,
			LayerKind::Pattern => 10,
			LayerKind::SolidColor => 11,
			LayerKind::Background => 12,
			LayerKind::GroupEnd => 13,
		}
	}

	/// Kinds whose geometry and style come from a vector shape.
	pub fn is_shape(&self) -> bool {
		matches!(self, LayerKind::Vector | LayerKind::SolidColor | LayerKind::Gradient | LayerKind::Pattern)
	}
}

impl fmt::Display for LayerKind {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let name = match self {
			LayerKind::Pixel => "Pixel",
			LayerKind::Adjustment => "Adjustment",
			LayerKind::Text => "Text",
			LayerKind::Vector => "Vector",
			LayerKind::SmartObject => "Smart Object",
			LayerKind::Video => "Video",
			LayerKind::Group => "Group",
			LayerKind::GroupEnd => "Group End",
			LayerKind::ThreeD => "3D",
			LayerKind::Background => "Background",
			LayerKind::Gradient => "Gradient",
			LayerKind::Pattern => "Pattern",
			LayerKind::SolidColor => "Solid Color",
		};
		write!(f, "{name}")
	}
}
