//! Reading and writing host descriptors.
//!
//! Descriptors are nested JSON-like objects keyed by host field names. Physical quantities are tagged with a unit,
//! e.g. `{"_unit": "pointsUnit", "_value": 12}`, and enumerated values are wrapped as `{"_enum": "…", "_value": "…"}`.

use crate::DocumentError;
use crate::consts::{MILLIMETERS_PER_INCH, POINTS_PER_INCH};

use serde_json::{Value, json};

/// Typed accessors over a descriptor object.
///
/// Optional fields fall back to the supplied default, required fields fail with [`DocumentError::MissingField`].
pub trait DescriptorExt {
	fn required(&self, key: &'static str) -> Result<&Value, DocumentError>;

	fn required_i64(&self, key: &'static str) -> Result<i64, DocumentError>;

	fn bool_or(&self, key: &str, default: bool) -> bool;

	fn str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str;

	fn f64_or(&self, key: &str, default: f64) -> f64;

	/// The `_value` of an enumerated field, or the field itself when the host sends a bare string.
	fn enum_value(&self, key: &str) -> Option<&str>;

	/// A unit-tagged quantity converted to pixels (or left as-is for unitless units). `None` when the field is absent.
	fn unit_value(&self, key: &'static str, resolution: f64) -> Result<Option<f64>, DocumentError>;

	fn required_unit_value(&self, key: &'static str, resolution: f64) -> Result<f64, DocumentError> {
		self.unit_value(key, resolution)?.ok_or(DocumentError::MissingField(key))
	}
}

impl DescriptorExt for Value {
	fn required(&self, key: &'static str) -> Result<&Value, DocumentError> {
		self.get(key).filter(|value| !value.is_null()).ok_or(DocumentError::MissingField(key))
	}

	fn required_i64(&self, key: &'static str) -> Result<i64, DocumentError> {
		let value = self.required(key)?;
		value
			.as_i64()
			.or_else(|| value.as_f64().filter(|float| float.fract() == 0.).map(|float| float as i64))
			.ok_or_else(|| DocumentError::InvalidField {
				field: key,
				reason: format!("expected an integer, found {value}"),
			})
	}

	fn bool_or(&self, key: &str, default: bool) -> bool {
		self.get(key).and_then(Value::as_bool).unwrap_or(default)
	}

	fn str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
		self.get(key).and_then(Value::as_str).unwrap_or(default)
	}

	fn f64_or(&self, key: &str, default: f64) -> f64 {
		self.get(key).and_then(Value::as_f64).unwrap_or(default)
	}

	fn enum_value(&self, key: &str) -> Option<&str> {
		let value = self.get(key)?;
		value.as_str().or_else(|| value.get("_value").and_then(Value::as_str))
	}

	fn unit_value(&self, key: &'static str, resolution: f64) -> Result<Option<f64>, DocumentError> {
		match self.get(key) {
			None | Some(Value::Null) => Ok(None),
			Some(value) => to_pixels(value, key, resolution).map(Some),
		}
	}
}

/// Converts a bare number or a unit-tagged quantity to pixels at the given resolution.
pub fn to_pixels(value: &Value, field: &'static str, resolution: f64) -> Result<f64, DocumentError> {
	if let Some(number) = value.as_f64() {
		return Ok(number);
	}

	let invalid = || DocumentError::InvalidField {
		field,
		reason: format!("expected a number or unit value, found {value}"),
	};
	let number = value.get("_value").and_then(Value::as_f64).ok_or_else(invalid)?;
	let unit = value.get("_unit").and_then(Value::as_str).ok_or_else(invalid)?;

	match unit {
		"pixelsUnit" | "percentUnit" | "angleUnit" | "densityUnit" => Ok(number),
		"pointsUnit" | "distanceUnit" => Ok(number * resolution / POINTS_PER_INCH),
		"millimetersUnit" => Ok(number * resolution / MILLIMETERS_PER_INCH),
		unknown => Err(DocumentError::UnknownUnit(unknown.to_string())),
	}
}

pub fn pixels(value: f64) -> Value {
	json!({ "_unit": "pixelsUnit", "_value": value })
}

pub fn percent(value: f64) -> Value {
	json!({ "_unit": "percentUnit", "_value": value })
}

pub fn angle(value: f64) -> Value {
	json!({ "_unit": "angleUnit", "_value": value })
}

pub fn points(value_in_pixels: f64, resolution: f64) -> Value {
	json!({ "_unit": "pointsUnit", "_value": value_in_pixels * POINTS_PER_INCH / resolution })
}

pub fn enumerated(enum_type: &str, value: &str) -> Value {
	json!({ "_enum": enum_type, "_value": value })
}
