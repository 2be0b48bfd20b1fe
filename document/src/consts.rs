use crate::color::Color;

// DESCRIPTORS
/// Resolution assumed by the host when a document does not report one, in pixels per inch.
pub const DEFAULT_RESOLUTION: f64 = 72.;
/// Points per inch, used to convert point-based quantities to pixels.
pub const POINTS_PER_INCH: f64 = 72.;
pub const MILLIMETERS_PER_INCH: f64 = 25.4;

// LAYERS
pub const DEFAULT_OPACITY: f64 = 100.;
pub const GROUP_END_NAME: &str = "</Layer group>";
/// Substituted when a host color object can not be read.
pub const FALLBACK_COLOR: Color = Color::BLACK;

// EFFECTS
/// Default lighting angle of a new shadow, in degrees.
pub const DEFAULT_SHADOW_ANGLE: f64 = 120.;
pub const DEFAULT_SHADOW_OPACITY: f32 = 0.75;

// TEXT
pub const DEFAULT_FONT_POSTSCRIPT_NAME: &str = "MyriadPro-Regular";
pub const DEFAULT_FONT_NAME: &str = "Myriad Pro";
pub const DEFAULT_FONT_STYLE_NAME: &str = "Regular";
pub const DEFAULT_FONT_SIZE_POINTS: f64 = 12.;
