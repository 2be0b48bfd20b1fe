use crate::DocumentError;
use crate::consts::FALLBACK_COLOR;
use crate::descriptor::DescriptorExt;

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Structure that represent a color.
/// Internally alpha is stored as `f32` that range from `0.0` (transparent) to 1.0 (opaque).
/// The other components (RGB) are stored as `f32` that range from `0.0` (black) to 1.0 (white).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Color {
	red: f32,
	green: f32,
	blue: f32,
	alpha: f32,
}

impl Color {
	pub const BLACK: Color = Color::from_unsafe(0., 0., 0.);
	pub const WHITE: Color = Color::from_unsafe(1., 1., 1.);
	pub const RED: Color = Color::from_unsafe(1., 0., 0.);
	pub const GREEN: Color = Color::from_unsafe(0., 1., 0.);
	pub const BLUE: Color = Color::from_unsafe(0., 0., 1.);

	/// Return Some(Color) if `red`, `green`, `blue` and `alpha` have a valid value. Negative number (including `-0.0`), `f32::NAN` and infinity are not valid value and return `None`.
	/// Values greater than `1.0` are not valid.
	/// # Examples
	/// ```
	/// use layer_document::color::Color;
	/// let color = Color::from_rgbaf32(0.3, 0.14, 0.15, 0.92).unwrap();
	/// assert!(color.components() == (0.3, 0.14, 0.15, 0.92));
	///
	/// let color = Color::from_rgbaf32(1.0, 1.0, 1.0, f32::NAN);
	/// assert!(color == None);
	/// ```
	pub fn from_rgbaf32(red: f32, green: f32, blue: f32, alpha: f32) -> Option<Color> {
		if [red, green, blue, alpha].iter().any(|c| c.is_sign_negative() || !c.is_finite() || *c > 1.) {
			return None;
		}
		Some(Color { red, green, blue, alpha })
	}

	// Return Color without checking `red` `green` `blue` and without transparency (alpha = 1.0)
	const fn from_unsafe(red: f32, green: f32, blue: f32) -> Color {
		Color { red, green, blue, alpha: 1. }
	}

	/// Return a Color without transparency (alpha = 0xFF).
	pub fn from_rgb8(red: u8, green: u8, blue: u8) -> Color {
		Color::from_rgba8(red, green, blue, 255)
	}

	/// Return a color initialized by it's 8bit component.
	///
	/// # Examples
	/// ```
	/// use layer_document::color::Color;
	/// let color = Color::from_rgba8(0x72, 0x67, 0x62, 0x61);
	/// assert!("72676261" == color.rgba_hex())
	/// ```
	pub fn from_rgba8(red: u8, green: u8, blue: u8, alpha: u8) -> Color {
		let map = |int_color| int_color as f32 / 255.;
		Color {
			red: map(red),
			green: map(green),
			blue: map(blue),
			alpha: map(alpha),
		}
	}

	/// Reads a host `RGBColor` object (`red`, `grain`, `blue` in `0..=255`) with an optional opacity in percent.
	///
	/// This is the one lenient parser in the crate: an unreadable color is replaced by opaque black and a warning is logged.
	pub fn from_descriptor(descriptor: &Value, opacity: Option<f64>) -> Color {
		let channel = |keys: &[&str]| keys.iter().find_map(|key| descriptor.get(*key).and_then(Value::as_f64));
		let components = (channel(&["red"]), channel(&["grain", "green"]), channel(&["blue"]));
		let alpha = opacity.map_or(1., |opacity| opacity / 100.) as f32;

		let parsed = match components {
			(Some(red), Some(green), Some(blue)) => Color::from_rgbaf32((red / 255.) as f32, (green / 255.) as f32, (blue / 255.) as f32, alpha),
			_ => None,
		};

		parsed.unwrap_or_else(|| {
			warn!("Could not read a color from {descriptor}, falling back to {FALLBACK_COLOR:?}");
			FALLBACK_COLOR
		})
	}

	/// Reads the `color` and `opacity` fields of a style descriptor.
	///
	/// Only the color itself falls back as [`Color::from_descriptor`] does, a malformed opacity is an error.
	pub fn from_style_descriptor(descriptor: &Value, resolution: f64) -> Result<Color, DocumentError> {
		let opacity = descriptor.unit_value("opacity", resolution)?;
		Ok(Color::from_descriptor(descriptor.get("color").unwrap_or(&Value::Null), opacity))
	}

	/// Emits a host `RGBColor` object. Alpha is not part of it, callers write it as a separate opacity.
	pub fn to_descriptor(&self) -> Value {
		json!({
			"_obj": "RGBColor",
			"red": self.red as f64 * 255.,
			"grain": self.green as f64 * 255.,
			"blue": self.blue as f64 * 255.,
		})
	}

	pub fn with_alpha(&self, alpha: f32) -> Color {
		Color { alpha: alpha.clamp(0., 1.), ..*self }
	}

	pub fn r(&self) -> f32 {
		self.red
	}

	pub fn g(&self) -> f32 {
		self.green
	}

	pub fn b(&self) -> f32 {
		self.blue
	}

	pub fn a(&self) -> f32 {
		self.alpha
	}

	/// Opacity in percent, the unit the host uses.
	pub fn opacity(&self) -> f64 {
		self.alpha as f64 * 100.
	}

	/// Return the all components as a tuple, first component is red, followed by green, followed by blue, followed by alpha.
	pub fn components(&self) -> (f32, f32, f32, f32) {
		(self.red, self.green, self.blue, self.alpha)
	}

	/// Return a String of hexadecimal value with two digit per components ("RRGGBBAA").
	pub fn rgba_hex(&self) -> String {
		format!(
			"{:02X?}{:02X?}{:02X?}{:02X?}",
			(self.r() * 255.).round() as u8,
			(self.g() * 255.).round() as u8,
			(self.b() * 255.).round() as u8,
			(self.a() * 255.).round() as u8,
		)
	}

	/// Return a String of hexadecimal value with two digit per components ("RRGGBB").
	/// ```
	/// use layer_document::color::Color;
	/// let color = Color::from_rgba8(0x72, 0x67, 0x62, 0x61);
	/// assert!("726762" == color.rgb_hex())
	/// ```
	pub fn rgb_hex(&self) -> String {
		format!("{:02X?}{:02X?}{:02X?}", (self.r() * 255.).round() as u8, (self.g() * 255.).round() as u8, (self.b() * 255.).round() as u8)
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::test_utils::init_logger;

	#[test]
	fn reads_host_rgb_objects() {
		let descriptor = json!({ "_obj": "RGBColor", "red": 255., "grain": 127.5, "blue": 0. });
		let color = Color::from_descriptor(&descriptor, Some(50.));

		assert_eq!(color.components(), (1., 0.5, 0., 0.5));
		assert_eq!(color.opacity(), 50.);
	}

	#[test]
	fn unreadable_colors_fall_back_to_opaque_black() {
		init_logger();

		assert_eq!(Color::from_descriptor(&json!({ "red": 10, "blue": 3 }), None), Color::BLACK);
		assert_eq!(Color::from_descriptor(&json!({ "red": 300, "grain": 0, "blue": 0 }), None), Color::BLACK);
		assert_eq!(Color::from_descriptor(&Value::Null, Some(20.)), Color::BLACK);
	}

	#[test]
	fn style_opacity_must_be_readable() {
		init_logger();

		let style = json!({ "color": { "red": 255, "grain": 0, "blue": 0 }, "opacity": { "_unit": "percentUnit", "_value": 40 } });
		assert_eq!(Color::from_style_descriptor(&style, 72.), Ok(Color::RED.with_alpha(0.4)));

		let unreadable_color = json!({ "opacity": { "_unit": "percentUnit", "_value": 40 } });
		assert_eq!(Color::from_style_descriptor(&unreadable_color, 72.), Ok(Color::BLACK));

		let malformed = json!({ "color": { "red": 255, "grain": 0, "blue": 0 }, "opacity": { "_unit": "furlongsUnit", "_value": 40 } });
		assert_eq!(Color::from_style_descriptor(&malformed, 72.), Err(DocumentError::UnknownUnit("furlongsUnit".into())));
	}

	#[test]
	fn descriptor_round_trip_keeps_channels() {
		let color = Color::from_rgb8(0x72, 0x67, 0x62);
		let read_back = Color::from_descriptor(&color.to_descriptor(), Some(color.opacity()));

		assert_eq!(read_back.rgba_hex(), color.rgba_hex());
	}
}
