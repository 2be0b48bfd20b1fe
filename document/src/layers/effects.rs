use super::blend_mode::BlendMode;
use crate::DocumentError;
use crate::color::Color;
use crate::consts::{DEFAULT_SHADOW_ANGLE, DEFAULT_SHADOW_OPACITY};
use crate::descriptor::{DescriptorExt, angle, enumerated, percent, pixels};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// The closed set of layer effects the panel edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerEffectKind {
	DropShadow,
	InnerShadow,
}

impl LayerEffectKind {
	pub const ALL: [LayerEffectKind; 2] = [LayerEffectKind::DropShadow, LayerEffectKind::InnerShadow];

	/// Validates an effect type name coming from the UI or the host.
	pub fn from_host_name(name: &str) -> Result<Self, DocumentError> {
		LayerEffectKind::ALL
			.into_iter()
			.find(|kind| kind.host_name() == name)
			.ok_or_else(|| DocumentError::UnknownLayerEffect(name.to_string()))
	}

	pub fn host_name(&self) -> &'static str {
		match self {
			LayerEffectKind::DropShadow => "dropShadow",
			LayerEffectKind::InnerShadow => "innerShadow",
		}
	}

	fn multi_host_name(&self) -> &'static str {
		match self {
			LayerEffectKind::DropShadow => "dropShadowMulti",
			LayerEffectKind::InnerShadow => "innerShadowMulti",
		}
	}
}

/// A drop or inner shadow. The host describes the offset as a lighting angle and distance, which is stored here as `x`/`y`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
	pub enabled: bool,
	pub color: Color,
	pub x: f64,
	pub y: f64,
	pub blur: f64,
	pub spread: f64,
	pub blend_mode: BlendMode,
}

impl Default for Shadow {
	fn default() -> Self {
		Self {
			enabled: true,
			color: Color::BLACK.with_alpha(DEFAULT_SHADOW_OPACITY),
			x: 0.,
			y: 5.,
			blur: 5.,
			spread: 0.,
			blend_mode: BlendMode::Multiply,
		}
	}
}

impl Shadow {
	pub fn from_descriptor(descriptor: &Value, resolution: f64) -> Result<Self, DocumentError> {
		let opacity = descriptor.unit_value("opacity", resolution)?;
		let lighting_angle = descriptor.unit_value("localLightingAngle", resolution)?.unwrap_or(DEFAULT_SHADOW_ANGLE).to_radians();
		let distance = descriptor.unit_value("distance", resolution)?.unwrap_or_default();
		let blend_mode = match descriptor.enum_value("mode") {
			None => BlendMode::Multiply,
			Some(name) => BlendMode::from_host_name(name).ok_or_else(|| DocumentError::InvalidField {
				field: "mode",
				reason: format!("unknown blend mode `{name}`"),
			})?,
		};

		Ok(Self {
			enabled: descriptor.bool_or("enabled", true),
			color: Color::from_descriptor(descriptor.get("color").unwrap_or(&Value::Null), opacity),
			x: -distance * lighting_angle.cos(),
			y: distance * lighting_angle.sin(),
			blur: descriptor.unit_value("blur", resolution)?.unwrap_or_default(),
			spread: descriptor.unit_value("chokeMatte", resolution)?.unwrap_or_default(),
			blend_mode,
		})
	}

	pub fn to_descriptor(&self, kind: LayerEffectKind) -> Value {
		let distance = self.x.hypot(self.y);
		let lighting_angle = if distance == 0. { DEFAULT_SHADOW_ANGLE } else { self.y.atan2(-self.x).to_degrees() };

		json!({
			"_obj": kind.host_name(),
			"enabled": self.enabled,
			"present": true,
			"showInDialog": true,
			"mode": enumerated("blendMode", self.blend_mode.to_host_name()),
			"color": self.color.to_descriptor(),
			"opacity": percent(self.color.opacity()),
			"useGlobalAngle": false,
			"localLightingAngle": angle(lighting_angle),
			"distance": pixels(distance),
			"chokeMatte": pixels(self.spread),
			"blur": pixels(self.blur),
		})
	}

	pub fn apply(&self, patch: &ShadowPatch) -> Self {
		Self {
			enabled: patch.enabled.unwrap_or(self.enabled),
			color: patch.color.unwrap_or(self.color),
			x: patch.x.unwrap_or(self.x),
			y: patch.y.unwrap_or(self.y),
			blur: patch.blur.unwrap_or(self.blur),
			spread: patch.spread.unwrap_or(self.spread),
			blend_mode: patch.blend_mode.unwrap_or(self.blend_mode),
		}
	}
}

/// A partial update of a [`Shadow`]. Unset fields keep their current value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowPatch {
	pub enabled: Option<bool>,
	pub color: Option<Color>,
	pub x: Option<f64>,
	pub y: Option<f64>,
	pub blur: Option<f64>,
	pub spread: Option<f64>,
	pub blend_mode: Option<BlendMode>,
}

/// All effects of one layer, in host order per kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerEffects {
	pub visible: bool,
	pub drop_shadows: Vec<Shadow>,
	pub inner_shadows: Vec<Shadow>,
}

impl Default for LayerEffects {
	fn default() -> Self {
		Self {
			visible: true,
			drop_shadows: Vec::new(),
			inner_shadows: Vec::new(),
		}
	}
}

impl LayerEffects {
	/// Reads `layerEffects`, accepting both the single (`dropShadow`) and the list (`dropShadowMulti`) encodings.
	pub fn from_layer_descriptor(descriptor: &Value, resolution: f64) -> Result<Self, DocumentError> {
		let mut effects = LayerEffects {
			visible: descriptor.bool_or("layerFXVisible", true),
			..Default::default()
		};
		let Some(layer_effects) = descriptor.get("layerEffects").filter(|effects| effects.is_object()) else {
			return Ok(effects);
		};

		for kind in LayerEffectKind::ALL {
			let entries = match (layer_effects.get(kind.multi_host_name()).and_then(Value::as_array), layer_effects.get(kind.host_name())) {
				(Some(list), _) => list.iter().collect(),
				(None, Some(single)) if single.is_object() => vec![single],
				_ => Vec::new(),
			};
			*effects.shadows_mut(kind) = entries.into_iter().map(|entry| Shadow::from_descriptor(entry, resolution)).collect::<Result<_, _>>()?;
		}

		Ok(effects)
	}

	pub fn to_descriptor(&self) -> Value {
		let mut layer_effects = Map::new();
		layer_effects.insert("_obj".into(), "layerEffects".into());
		for kind in LayerEffectKind::ALL {
			let shadows = self.shadows(kind).iter().map(|shadow| shadow.to_descriptor(kind)).collect();
			layer_effects.insert(kind.multi_host_name().into(), Value::Array(shadows));
		}
		json!({ "layerFXVisible": self.visible, "layerEffects": layer_effects })
	}

	pub fn shadows(&self, kind: LayerEffectKind) -> &[Shadow] {
		match kind {
			LayerEffectKind::DropShadow => &self.drop_shadows,
			LayerEffectKind::InnerShadow => &self.inner_shadows,
		}
	}

	fn shadows_mut(&mut self, kind: LayerEffectKind) -> &mut Vec<Shadow> {
		match kind {
			LayerEffectKind::DropShadow => &mut self.drop_shadows,
			LayerEffectKind::InnerShadow => &mut self.inner_shadows,
		}
	}

	pub fn is_empty(&self) -> bool {
		LayerEffectKind::ALL.iter().all(|kind| self.shadows(*kind).is_empty())
	}

	/// Merges `patch` into the shadow at `index`. A missing shadow is appended, starting from the default one.
	pub fn with_shadow(&self, kind: LayerEffectKind, index: usize, patch: &ShadowPatch) -> Self {
		let mut effects = self.clone();
		let shadows = effects.shadows_mut(kind);
		match shadows.get_mut(index) {
			Some(shadow) => *shadow = shadow.apply(patch),
			None => shadows.push(Shadow::default().apply(patch)),
		}
		effects
	}

	pub fn without_shadow(&self, kind: LayerEffectKind, index: usize) -> Self {
		let mut effects = self.clone();
		let shadows = effects.shadows_mut(kind);
		if index < shadows.len() {
			shadows.remove(index);
		}
		effects
	}
}
