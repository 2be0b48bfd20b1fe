use crate::consts::DEFAULT_RESOLUTION;
use crate::descriptor::DescriptorExt;
use crate::{DocumentError, DocumentId};

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_resolution() -> f64 {
	DEFAULT_RESOLUTION
}

fn return_true() -> bool {
	true
}

/// User-tunable behavior of the layer model, stored as RON.
///
/// Missing fields take their defaults, so older preference files keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
	/// Pixels per inch assumed for documents that do not report a resolution.
	#[serde(default = "default_resolution")]
	pub default_resolution: f64,
	/// Whether adding layers replaces a selected empty pixel layer the host created as a placeholder.
	#[serde(default = "return_true")]
	pub replace_empty_placeholder: bool,
	/// Whether the children of artboards, rather than the artboards themselves, are the top-level selection targets.
	#[serde(default = "return_true")]
	pub select_below_artboards: bool,
}

impl Default for Preferences {
	fn default() -> Self {
		Self {
			default_resolution: default_resolution(),
			replace_empty_placeholder: true,
			select_below_artboards: true,
		}
	}
}

impl Preferences {
	pub fn from_ron(text: &str) -> Result<Self, DocumentError> {
		ron::from_str(text).map_err(|error| DocumentError::InvalidPreferences(error.to_string()))
	}

	/// Reads preferences, falling back to the defaults when the text can not be parsed.
	pub fn from_ron_or_default(text: &str) -> Self {
		Self::from_ron(text).unwrap_or_else(|error| {
			warn!("{error}, using default preferences");
			Self::default()
		})
	}

	pub fn to_ron(&self) -> Result<String, DocumentError> {
		ron::ser::to_string_pretty(self, Default::default()).map_err(|error| DocumentError::InvalidPreferences(error.to_string()))
	}
}

/// The parts of the host's document descriptor the layer model depends on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DocumentInfo {
	pub id: DocumentId,
	/// Pixels per inch, used to convert physical units.
	pub resolution: f64,
}

impl DocumentInfo {
	pub fn new(id: DocumentId, resolution: f64) -> Self {
		Self { id, resolution }
	}

	pub fn from_descriptor(descriptor: &Value, preferences: &Preferences) -> Result<Self, DocumentError> {
		let raw_id = descriptor.required_i64("documentID")?;
		let id = DocumentId::try_from(raw_id).map_err(|_| DocumentError::InvalidField {
			field: "documentID",
			reason: format!("negative document id {raw_id}"),
		})?;
		let resolution = descriptor.unit_value("resolution", preferences.default_resolution)?.unwrap_or(preferences.default_resolution);

		Ok(Self { id, resolution })
	}
}
