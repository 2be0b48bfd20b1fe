use serde::{Deserialize, Serialize};

/// Describes how a layer is composited onto the layers below it.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Default, Serialize, Deserialize)]
pub enum BlendMode {
	/// The final color is the top color, regardless of what the bottom color is.
	#[default]
	Normal,
	/// Groups only: the group has no compositing of its own and its children blend directly with the layers below.
	PassThrough,
	Dissolve,
	/// The final color is the result of multiplying the top and bottom colors.
	/// A black layer leads to a black final layer, and a white layer leads to no change.
	Multiply,
	/// The final color is composed of the darkest values of each color channel.
	Darken,
	/// The final color is the result of inverting the bottom color, dividing the value by the top color, and inverting that value.
	ColorBurn,
	LinearBurn,
	DarkerColor,
	/// The final color is the result of inverting the colors, multiplying them, and inverting that value.
	Screen,
	/// The final color is composed of the lightest values of each color channel.
	Lighten,
	/// The final color is the result of dividing the bottom color by the inverse of the top color.
	ColorDodge,
	LinearDodge,
	LighterColor,
	/// The final color is the result of [Multiply](BlendMode::Multiply) if the bottom color is darker, or [Screen](BlendMode::Screen) if the bottom color is lighter.
	Overlay,
	/// The final color is similar to [HardLight](BlendMode::HardLight), but softer.
	SoftLight,
	/// The final color is the result of [Multiply](BlendMode::Multiply) if the top color is darker, or [Screen](BlendMode::Screen) if the top color is lighter.
	HardLight,
	VividLight,
	LinearLight,
	PinLight,
	HardMix,
	/// The final color is the result of subtracting the darker of the two colors from the lighter one.
	Difference,
	/// The final color is similar to [Difference](BlendMode::Difference), but with less contrast.
	Exclusion,
	Subtract,
	Divide,
	/// The final color has the *hue* of the top color, while using the *saturation* and *luminosity* of the bottom color.
	Hue,
	/// The final color has the *saturation* of the top color, while using the *hue* and *luminosity* of the bottom color.
	Saturation,
	/// The final color has the *hue* and *saturation* of the top color, while using the *luminosity* of the bottom color.
	Color,
	/// The final color has the *luminosity* of the top color, while using the *hue* and *saturation* of the bottom color.
	Luminosity,
}

impl BlendMode {
	/// The `_value` the host uses in a `blendMode` enumeration.
	pub fn to_host_name(&self) -> &'static str {
		match self {
			BlendMode::Normal => "normal",
			BlendMode::PassThrough => "passThrough",
			BlendMode::Dissolve => "dissolve",
			BlendMode::Multiply => "multiply",
			BlendMode::Darken => "darken",
			BlendMode::ColorBurn => "colorBurn",
			BlendMode::LinearBurn => "linearBurn",
			BlendMode::DarkerColor => "darkerColor",
			BlendMode::Screen => "screen",
			BlendMode::Lighten => "lighten",
			BlendMode::ColorDodge => "colorDodge",
			BlendMode::LinearDodge => "linearDodge",
			BlendMode::LighterColor => "lighterColor",
			BlendMode::Overlay => "overlay",
			BlendMode::SoftLight => "softLight",
			BlendMode::HardLight => "hardLight",
			BlendMode::VividLight => "vividLight",
			BlendMode::LinearLight => "linearLight",
			BlendMode::PinLight => "pinLight",
			BlendMode::HardMix => "hardMix",
			BlendMode::Difference => "difference",
			BlendMode::Exclusion => "exclusion",
			BlendMode::Subtract => "blendSubtraction",
			BlendMode::Divide => "blendDivide",
			BlendMode::Hue => "hue",
			BlendMode::Saturation => "saturation",
			BlendMode::Color => "color",
			BlendMode::Luminosity => "luminosity",
		}
	}

	pub fn from_host_name(name: &str) -> Option<Self> {
		Some(match name {
			"normal" => BlendMode::Normal,
			"passThrough" => BlendMode::PassThrough,
			"dissolve" => BlendMode::Dissolve,
			"multiply" => BlendMode::Multiply,
			"darken" => BlendMode::Darken,
			"colorBurn" => BlendMode::ColorBurn,
			"linearBurn" => BlendMode::LinearBurn,
			"darkerColor" => BlendMode::DarkerColor,
			"screen" => BlendMode::Screen,
			"lighten" => BlendMode::Lighten,
			"colorDodge" => BlendMode::ColorDodge,
			"linearDodge" => BlendMode::LinearDodge,
			"lighterColor" => BlendMode::LighterColor,
			"overlay" => BlendMode::Overlay,
			"softLight" => BlendMode::SoftLight,
			"hardLight" => BlendMode::HardLight,
			"vividLight" => BlendMode::VividLight,
			"linearLight" => BlendMode::LinearLight,
			"pinLight" => BlendMode::PinLight,
			"hardMix" => BlendMode::HardMix,
			"difference" => BlendMode::Difference,
			"exclusion" => BlendMode::Exclusion,
			"blendSubtraction" => BlendMode::Subtract,
			"blendDivide" => BlendMode::Divide,
			"hue" => BlendMode::Hue,
			"saturation" => BlendMode::Saturation,
			"color" => BlendMode::Color,
			"luminosity" => BlendMode::Luminosity,
			_ => return None,
		})
	}
}
