use crate::DocumentError;
use crate::color::Color;
use crate::descriptor::{DescriptorExt, enumerated, percent, pixels, to_pixels};

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// A solid color fill of a shape layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fill {
	pub enabled: bool,
	/// The fill color. Its alpha is the host's fill opacity.
	pub color: Color,
}

impl Fill {
	pub fn new(color: Color) -> Self {
		Self { enabled: true, color }
	}

	/// Reads the solid color entry of a layer's `adjustment` list. Layers filled with anything else have no [`Fill`].
	pub fn from_layer_descriptor(descriptor: &Value, resolution: f64) -> Result<Option<Self>, DocumentError> {
		let Some(content) = descriptor.get("adjustment").and_then(Value::as_array).and_then(|adjustments| adjustments.first()) else {
			return Ok(None);
		};
		if content.str_or("_obj", "solidColorLayer") != "solidColorLayer" {
			return Ok(None);
		}

		let opacity = descriptor.unit_value("fillOpacity", resolution)?;
		Ok(Some(Self {
			enabled: descriptor.bool_or("fillEnabled", true),
			color: Color::from_descriptor(content.get("color").unwrap_or(&Value::Null), opacity),
		}))
	}

	pub fn to_descriptor(&self) -> Value {
		json!({
			"fillEnabled": self.enabled,
			"fillOpacity": percent(self.color.opacity()),
			"adjustment": [{ "_obj": "solidColorLayer", "color": self.color.to_descriptor() }],
		})
	}

	pub fn apply(&self, patch: &FillPatch) -> Self {
		let mut color = patch.color.unwrap_or(self.color);
		if let Some(opacity) = patch.opacity {
			color = color.with_alpha((opacity / 100.) as f32);
		}
		Self {
			enabled: patch.enabled.unwrap_or(self.enabled),
			color,
		}
	}
}

/// A partial update of a [`Fill`]. Unset fields keep their current value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FillPatch {
	pub enabled: Option<bool>,
	pub color: Option<Color>,
	/// Opacity in percent, applied after `color`.
	pub opacity: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StrokeAlignment {
	Inside,
	#[default]
	Center,
	Outside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineCap {
	#[default]
	Butt,
	Round,
	Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineJoin {
	#[default]
	Miter,
	Round,
	Bevel,
}

/// The stroke of a shape layer, read from the host's `AGMStrokeStyleInfo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
	pub enabled: bool,
	pub width: f64,
	/// Stroke color. Its alpha is the stroke opacity.
	pub color: Color,
	pub alignment: StrokeAlignment,
	pub cap: LineCap,
	pub join: LineJoin,
	pub dashes: Vec<f64>,
}

impl Default for Stroke {
	fn default() -> Self {
		Self {
			enabled: true,
			width: 1.,
			color: Color::BLACK,
			alignment: StrokeAlignment::default(),
			cap: LineCap::default(),
			join: LineJoin::default(),
			dashes: Vec::new(),
		}
	}
}

impl Stroke {
	pub fn new(color: Color, width: f64) -> Self {
		Self { color, width, ..Default::default() }
	}

	/// Reads a `strokeStyle` object. Absent fields take their defaults, unknown enumerated values are rejected.
	pub fn from_descriptor(descriptor: &Value, resolution: f64) -> Result<Self, DocumentError> {
		let alignment = match descriptor.enum_value("strokeStyleLineAlignment") {
			None | Some("strokeStyleAlignCenter") => StrokeAlignment::Center,
			Some("strokeStyleAlignInside") => StrokeAlignment::Inside,
			Some("strokeStyleAlignOutside") => StrokeAlignment::Outside,
			Some(other) => return Err(invalid("strokeStyleLineAlignment", other)),
		};
		let cap = match descriptor.enum_value("strokeStyleLineCapType") {
			None | Some("strokeStyleButtCap") => LineCap::Butt,
			Some("strokeStyleRoundCap") => LineCap::Round,
			Some("strokeStyleSquareCap") => LineCap::Square,
			Some(other) => return Err(invalid("strokeStyleLineCapType", other)),
		};
		let join = match descriptor.enum_value("strokeStyleLineJoinType") {
			None | Some("strokeStyleMiterJoin") => LineJoin::Miter,
			Some("strokeStyleRoundJoin") => LineJoin::Round,
			Some("strokeStyleBevelJoin") => LineJoin::Bevel,
			Some(other) => return Err(invalid("strokeStyleLineJoinType", other)),
		};
		let dashes = match descriptor.get("strokeStyleLineDashSet").and_then(Value::as_array) {
			Some(dashes) => dashes.iter().map(|dash| to_pixels(dash, "strokeStyleLineDashSet", resolution)).collect::<Result<_, _>>()?,
			None => Vec::new(),
		};
		let opacity = descriptor.unit_value("strokeStyleOpacity", resolution)?;
		let content = descriptor.get("strokeStyleContent").and_then(|content| content.get("color")).unwrap_or(&Value::Null);

		Ok(Self {
			enabled: descriptor.bool_or("strokeEnabled", true),
			width: descriptor.unit_value("strokeStyleLineWidth", resolution)?.unwrap_or(1.),
			color: Color::from_descriptor(content, opacity),
			alignment,
			cap,
			join,
			dashes,
		})
	}

	/// Reads the stroke of a layer descriptor, if it has one.
	pub fn from_layer_descriptor(descriptor: &Value, resolution: f64) -> Result<Option<Self>, DocumentError> {
		descriptor
			.get("AGMStrokeStyleInfo")
			.filter(|info| info.is_object())
			.map(|info| Self::from_descriptor(info, resolution))
			.transpose()
	}

	pub fn to_descriptor(&self) -> Value {
		let alignment = match self.alignment {
			StrokeAlignment::Inside => "strokeStyleAlignInside",
			StrokeAlignment::Center => "strokeStyleAlignCenter",
			StrokeAlignment::Outside => "strokeStyleAlignOutside",
		};
		let cap = match self.cap {
			LineCap::Butt => "strokeStyleButtCap",
			LineCap::Round => "strokeStyleRoundCap",
			LineCap::Square => "strokeStyleSquareCap",
		};
		let join = match self.join {
			LineJoin::Miter => "strokeStyleMiterJoin",
			LineJoin::Round => "strokeStyleRoundJoin",
			LineJoin::Bevel => "strokeStyleBevelJoin",
		};

		json!({
			"_obj": "strokeStyle",
			"strokeEnabled": self.enabled,
			"strokeStyleLineWidth": pixels(self.width),
			"strokeStyleLineAlignment": enumerated("strokeStyleLineAlignment", alignment),
			"strokeStyleLineCapType": enumerated("strokeStyleLineCapType", cap),
			"strokeStyleLineJoinType": enumerated("strokeStyleLineJoinType", join),
			"strokeStyleLineDashSet": self.dashes.iter().map(|dash| pixels(*dash)).collect::<Vec<_>>(),
			"strokeStyleOpacity": percent(self.color.opacity()),
			"strokeStyleContent": { "_obj": "solidColorLayer", "color": self.color.to_descriptor() },
		})
	}

	pub fn apply(&self, patch: &StrokePatch) -> Self {
		let mut color = patch.color.unwrap_or(self.color);
		if let Some(opacity) = patch.opacity {
			color = color.with_alpha((opacity / 100.) as f32);
		}
		Self {
			enabled: patch.enabled.unwrap_or(self.enabled),
			width: patch.width.unwrap_or(self.width),
			color,
			alignment: patch.alignment.unwrap_or(self.alignment),
			cap: patch.cap.unwrap_or(self.cap),
			join: patch.join.unwrap_or(self.join),
			dashes: patch.dashes.clone().unwrap_or_else(|| self.dashes.clone()),
		}
	}
}

/// A partial update of a [`Stroke`]. Unset fields keep their current value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokePatch {
	pub enabled: Option<bool>,
	pub width: Option<f64>,
	pub color: Option<Color>,
	/// Opacity in percent, applied after `color`.
	pub opacity: Option<f64>,
	pub alignment: Option<StrokeAlignment>,
	pub cap: Option<LineCap>,
	pub join: Option<LineJoin>,
	pub dashes: Option<Vec<f64>>,
}

pub(crate) fn invalid(field: &'static str, value: &str) -> DocumentError {
	DocumentError::InvalidField {
		field,
		reason: format!("unknown value `{value}`"),
	}
}
