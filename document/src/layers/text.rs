use super::style::invalid;
use crate::DocumentError;
use crate::color::Color;
use crate::consts::{DEFAULT_FONT_NAME, DEFAULT_FONT_POSTSCRIPT_NAME, DEFAULT_FONT_SIZE_POINTS, DEFAULT_FONT_STYLE_NAME, DEFAULT_RESOLUTION, POINTS_PER_INCH};
use crate::descriptor::{DescriptorExt, enumerated, points, to_pixels};

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlignment {
	#[default]
	Left,
	Center,
	Right,
	JustifyLeft,
	JustifyCenter,
	JustifyRight,
	JustifyAll,
}

impl TextAlignment {
	const ALL: [TextAlignment; 7] = [
		TextAlignment::Left,
		TextAlignment::Center,
		TextAlignment::Right,
		TextAlignment::JustifyLeft,
		TextAlignment::JustifyCenter,
		TextAlignment::JustifyRight,
		TextAlignment::JustifyAll,
	];

	pub fn to_host_name(&self) -> &'static str {
		match self {
			TextAlignment::Left => "left",
			TextAlignment::Center => "center",
			TextAlignment::Right => "right",
			TextAlignment::JustifyLeft => "justifyLeft",
			TextAlignment::JustifyCenter => "justifyCenter",
			TextAlignment::JustifyRight => "justifyRight",
			TextAlignment::JustifyAll => "justifyAll",
		}
	}

	pub fn from_host_name(name: &str) -> Option<Self> {
		TextAlignment::ALL.into_iter().find(|alignment| alignment.to_host_name() == name)
	}
}

/// The font attributes of a run of characters. Sizes are stored in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterStyle {
	pub postscript_name: String,
	pub font_name: String,
	pub font_style_name: String,
	pub size: f64,
	pub color: Color,
	/// Letter spacing in thousandths of an em.
	pub tracking: f64,
	pub leading: f64,
	pub auto_leading: bool,
}

impl Default for CharacterStyle {
	fn default() -> Self {
		Self {
			postscript_name: DEFAULT_FONT_POSTSCRIPT_NAME.to_string(),
			font_name: DEFAULT_FONT_NAME.to_string(),
			font_style_name: DEFAULT_FONT_STYLE_NAME.to_string(),
			size: DEFAULT_FONT_SIZE_POINTS * DEFAULT_RESOLUTION / POINTS_PER_INCH,
			color: Color::BLACK,
			tracking: 0.,
			leading: 0.,
			auto_leading: true,
		}
	}
}

impl CharacterStyle {
	pub fn from_descriptor(descriptor: &Value, resolution: f64) -> Result<Self, DocumentError> {
		let defaults = CharacterStyle::default();
		let size = points_value(descriptor, "size", resolution)?.unwrap_or(DEFAULT_FONT_SIZE_POINTS * resolution / POINTS_PER_INCH);

		Ok(Self {
			postscript_name: descriptor.str_or("fontPostScriptName", &defaults.postscript_name).to_string(),
			font_name: descriptor.str_or("fontName", &defaults.font_name).to_string(),
			font_style_name: descriptor.str_or("fontStyleName", &defaults.font_style_name).to_string(),
			size,
			color: descriptor.get("color").map_or(Color::BLACK, |color| Color::from_descriptor(color, None)),
			tracking: descriptor.f64_or("tracking", 0.),
			leading: points_value(descriptor, "leading", resolution)?.unwrap_or(0.),
			auto_leading: descriptor.bool_or("autoLeading", true),
		})
	}

	pub fn to_descriptor(&self, resolution: f64) -> Value {
		json!({
			"_obj": "textStyle",
			"fontPostScriptName": self.postscript_name,
			"fontName": self.font_name,
			"fontStyleName": self.font_style_name,
			"size": points(self.size, resolution),
			"color": self.color.to_descriptor(),
			"tracking": self.tracking,
			"leading": points(self.leading, resolution),
			"autoLeading": self.auto_leading,
		})
	}

	pub fn apply(&self, patch: &CharacterStylePatch) -> Self {
		let pick = |value: &Option<String>, current: &String| value.clone().unwrap_or_else(|| current.clone());
		Self {
			postscript_name: pick(&patch.postscript_name, &self.postscript_name),
			font_name: pick(&patch.font_name, &self.font_name),
			font_style_name: pick(&patch.font_style_name, &self.font_style_name),
			size: patch.size.unwrap_or(self.size),
			color: patch.color.unwrap_or(self.color),
			tracking: patch.tracking.unwrap_or(self.tracking),
			leading: patch.leading.unwrap_or(self.leading),
			// Setting an explicit leading turns automatic leading off unless the patch says otherwise
			auto_leading: patch.auto_leading.unwrap_or(if patch.leading.is_some() { false } else { self.auto_leading }),
		}
	}
}

/// A partial update of a [`CharacterStyle`]. Unset fields keep their current value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterStylePatch {
	pub postscript_name: Option<String>,
	pub font_name: Option<String>,
	pub font_style_name: Option<String>,
	pub size: Option<f64>,
	pub color: Option<Color>,
	pub tracking: Option<f64>,
	pub leading: Option<f64>,
	pub auto_leading: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ParagraphStyle {
	pub alignment: TextAlignment,
}

impl ParagraphStyle {
	pub fn from_descriptor(descriptor: &Value) -> Result<Self, DocumentError> {
		let alignment = match descriptor.enum_value("align") {
			None => TextAlignment::default(),
			Some(name) => TextAlignment::from_host_name(name).ok_or_else(|| invalid("align", name))?,
		};
		Ok(Self { alignment })
	}

	pub fn to_descriptor(&self) -> Value {
		json!({ "_obj": "paragraphStyle", "align": enumerated("alignmentType", self.alignment.to_host_name()) })
	}

	pub fn apply(&self, patch: &ParagraphStylePatch) -> Self {
		Self {
			alignment: patch.alignment.unwrap_or(self.alignment),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParagraphStylePatch {
	pub alignment: Option<TextAlignment>,
}

/// A style applied to the characters `from..to` of the text content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleRange<T> {
	pub from: usize,
	pub to: usize,
	pub style: T,
}

/// The content and styling of a text layer, read from its `textKey`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
	pub content: String,
	pub character_styles: Vec<StyleRange<CharacterStyle>>,
	pub paragraph_styles: Vec<StyleRange<ParagraphStyle>>,
	/// Paragraph (box) text rather than point text.
	pub is_box_mode: bool,
}

impl Text {
	/// A single run of point text in one style.
	pub fn new(content: impl Into<String>, style: CharacterStyle) -> Self {
		let content = content.into();
		let to = content.chars().count();
		Self {
			content,
			character_styles: vec![StyleRange { from: 0, to, style }],
			paragraph_styles: vec![StyleRange { from: 0, to, style: ParagraphStyle::default() }],
			is_box_mode: false,
		}
	}

	pub fn from_layer_descriptor(descriptor: &Value, resolution: f64) -> Result<Option<Self>, DocumentError> {
		let Some(text_key) = descriptor.get("textKey").filter(|text_key| text_key.is_object()) else {
			return Ok(None);
		};

		let character_styles = style_ranges(text_key, "textStyleRange", "textStyle", |style| CharacterStyle::from_descriptor(style, resolution))?;
		let paragraph_styles = style_ranges(text_key, "paragraphStyleRange", "paragraphStyle", ParagraphStyle::from_descriptor)?;
		let is_box_mode = text_key
			.get("textShape")
			.and_then(Value::as_array)
			.and_then(|shapes| shapes.first())
			.and_then(|shape| shape.enum_value("char"))
			.is_some_and(|shape| shape == "box");

		Ok(Some(Self {
			content: text_key.str_or("textKey", "").to_string(),
			character_styles,
			paragraph_styles,
			is_box_mode,
		}))
	}

	pub fn to_descriptor(&self, resolution: f64) -> Value {
		let character_ranges: Vec<_> = self
			.character_styles
			.iter()
			.map(|range| json!({ "_obj": "textStyleRange", "from": range.from, "to": range.to, "textStyle": range.style.to_descriptor(resolution) }))
			.collect();
		let paragraph_ranges: Vec<_> = self
			.paragraph_styles
			.iter()
			.map(|range| json!({ "_obj": "paragraphStyleRange", "from": range.from, "to": range.to, "paragraphStyle": range.style.to_descriptor() }))
			.collect();
		let shape = if self.is_box_mode { "box" } else { "paint" };

		json!({
			"textKey": {
				"_obj": "textLayer",
				"textKey": self.content,
				"textStyleRange": character_ranges,
				"paragraphStyleRange": paragraph_ranges,
				"textShape": [{ "_obj": "textShape", "char": enumerated("char", shape) }],
			}
		})
	}

	/// The style of the first character run, shown when a whole text layer is inspected.
	pub fn character_style(&self) -> Option<&CharacterStyle> {
		self.character_styles.first().map(|range| &range.style)
	}

	pub fn paragraph_style(&self) -> Option<&ParagraphStyle> {
		self.paragraph_styles.first().map(|range| &range.style)
	}

	/// Applies `patch` to every character run. A text without runs gets one covering the whole content.
	pub fn with_character_style(&self, patch: &CharacterStylePatch) -> Self {
		let mut text = self.clone();
		if text.character_styles.is_empty() {
			let to = text.content.chars().count();
			text.character_styles.push(StyleRange { from: 0, to, style: CharacterStyle::default() });
		}
		for range in &mut text.character_styles {
			range.style = range.style.apply(patch);
		}
		text
	}

	pub fn with_paragraph_style(&self, patch: &ParagraphStylePatch) -> Self {
		let mut text = self.clone();
		if text.paragraph_styles.is_empty() {
			let to = text.content.chars().count();
			text.paragraph_styles.push(StyleRange { from: 0, to, style: ParagraphStyle::default() });
		}
		for range in &mut text.paragraph_styles {
			range.style = range.style.apply(patch);
		}
		text
	}
}

/// Font sizes and leading are sent in points, sometimes as bare numbers.
fn points_value(descriptor: &Value, key: &'static str, resolution: f64) -> Result<Option<f64>, DocumentError> {
	match descriptor.get(key) {
		None | Some(Value::Null) => Ok(None),
		Some(Value::Number(number)) => Ok(number.as_f64().map(|points| points * resolution / POINTS_PER_INCH)),
		Some(value) => to_pixels(value, key, resolution).map(Some),
	}
}

fn style_ranges<T>(text_key: &Value, list_key: &'static str, style_key: &str, parse: impl Fn(&Value) -> Result<T, DocumentError>) -> Result<Vec<StyleRange<T>>, DocumentError> {
	let Some(ranges) = text_key.get(list_key).and_then(Value::as_array) else { return Ok(Vec::new()) };

	ranges
		.iter()
		.map(|range| {
			let position = |key: &'static str| {
				range.required_i64(key).and_then(|value| {
					usize::try_from(value).map_err(|_| DocumentError::InvalidField {
						field: key,
						reason: format!("negative text offset {value}"),
					})
				})
			};
			Ok(StyleRange {
				from: position("from")?,
				to: position("to")?,
				style: parse(range.get(style_key).unwrap_or(&Value::Null))?,
			})
		})
		.collect()
}
