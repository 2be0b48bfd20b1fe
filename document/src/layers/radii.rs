use crate::DocumentError;
use crate::descriptor::{DescriptorExt, pixels};

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Corner radii of a rounded rectangle shape, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Radii {
	pub top_left: f64,
	pub top_right: f64,
	pub bottom_right: f64,
	pub bottom_left: f64,
}

impl Radii {
	pub const fn uniform(radius: f64) -> Self {
		Self {
			top_left: radius,
			top_right: radius,
			bottom_right: radius,
			bottom_left: radius,
		}
	}

	/// Reads `keyOriginRRectRadii` from a layer descriptor. Layers that are not rounded rectangles have no radii.
	pub fn from_layer_descriptor(descriptor: &Value, resolution: f64) -> Result<Option<Self>, DocumentError> {
		let Some(radii) = descriptor.get("keyOriginRRectRadii").filter(|radii| radii.is_object()) else {
			return Ok(None);
		};

		let corner = |key| radii.unit_value(key, resolution).map(Option::unwrap_or_default);
		Ok(Some(Self {
			top_left: corner("topLeft")?,
			top_right: corner("topRight")?,
			bottom_right: corner("bottomRight")?,
			bottom_left: corner("bottomLeft")?,
		}))
	}

	pub fn to_descriptor(&self) -> Value {
		json!({
			"_obj": "radii",
			"topLeft": pixels(self.top_left),
			"topRight": pixels(self.top_right),
			"bottomRight": pixels(self.bottom_right),
			"bottomLeft": pixels(self.bottom_left),
		})
	}

	/// The common radius when all four corners agree.
	pub fn scalar(&self) -> Option<f64> {
		let Radii {
			top_left,
			top_right,
			bottom_right,
			bottom_left,
		} = *self;
		(top_left == top_right && top_right == bottom_right && bottom_right == bottom_left).then_some(top_left)
	}
}
