use crate::DocumentError;
use crate::descriptor::{DescriptorExt, pixels};
use crate::layers::layer_kind::LayerKind;

use glam::DVec2;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// An immutable axis-aligned rectangle in document pixels.
///
/// Every operation that changes an edge returns a new value. A rectangle is *normalized* when `top <= bottom` and
/// `left <= right`; partial updates may invert edges, which [`Bounds::normalize`] repairs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
	top: f64,
	left: f64,
	bottom: f64,
	right: f64,
}

impl Bounds {
	pub const fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
		Self { top, left, bottom, right }
	}

	/// Reads a `{top, left, bottom, right}` rectangle. All four edges are required.
	pub fn from_descriptor(descriptor: &Value, resolution: f64) -> Result<Self, DocumentError> {
		Ok(Self {
			top: descriptor.required_unit_value("top", resolution)?,
			left: descriptor.required_unit_value("left", resolution)?,
			bottom: descriptor.required_unit_value("bottom", resolution)?,
			right: descriptor.required_unit_value("right", resolution)?,
		})
	}

	/// Reads the geometry of a layer descriptor.
	///
	/// Artboards report their canvas rectangle, other layers their bounds without effects. Group-end markers have no geometry.
	pub fn from_layer_descriptor(descriptor: &Value, resolution: f64) -> Result<Option<Self>, DocumentError> {
		if descriptor.get("layerKind").and_then(Value::as_i64) == Some(LayerKind::GroupEnd.code()) {
			return Ok(None);
		}

		let rectangle = if descriptor.bool_or("artboardEnabled", false) {
			descriptor.get("artboard").and_then(|artboard| artboard.get("artboardRect"))
		} else {
			descriptor.get("boundsNoEffects").or_else(|| descriptor.get("bounds"))
		};

		rectangle.filter(|rectangle| !rectangle.is_null()).map(|rectangle| Self::from_descriptor(rectangle, resolution)).transpose()
	}

	pub fn to_descriptor(&self) -> Value {
		json!({
			"_obj": "rectangle",
			"top": pixels(self.top),
			"left": pixels(self.left),
			"bottom": pixels(self.bottom),
			"right": pixels(self.right),
		})
	}

	pub fn top(&self) -> f64 {
		self.top
	}

	pub fn left(&self) -> f64 {
		self.left
	}

	pub fn bottom(&self) -> f64 {
		self.bottom
	}

	pub fn right(&self) -> f64 {
		self.right
	}

	pub fn width(&self) -> f64 {
		self.right - self.left
	}

	pub fn height(&self) -> f64 {
		self.bottom - self.top
	}

	pub fn x_center(&self) -> f64 {
		self.left + self.width() / 2.
	}

	pub fn y_center(&self) -> f64 {
		self.top + self.height() / 2.
	}

	pub fn center(&self) -> DVec2 {
		DVec2::new(self.x_center(), self.y_center())
	}

	pub fn area(&self) -> f64 {
		self.width() * self.height()
	}

	pub fn is_empty(&self) -> bool {
		self.area() == 0.
	}

	/// The smallest rectangle containing every member, or `None` for an empty input.
	pub fn union<'a>(bounds: impl IntoIterator<Item = &'a Bounds>) -> Option<Self> {
		bounds.into_iter().copied().reduce(|a, b| Self {
			top: a.top.min(b.top),
			left: a.left.min(b.left),
			bottom: a.bottom.max(b.bottom),
			right: a.right.max(b.right),
		})
	}

	/// The overlapping region of two rectangles.
	///
	/// Edges are inclusive: rectangles that only touch produce a zero-width or zero-height result.
	/// `None` is returned only when the rectangles are apart.
	pub fn intersection(a: &Bounds, b: &Bounds) -> Option<Self> {
		let overlap = Self {
			top: a.top.max(b.top),
			left: a.left.max(b.left),
			bottom: a.bottom.min(b.bottom),
			right: a.right.min(b.right),
		};

		(overlap.top <= overlap.bottom && overlap.left <= overlap.right).then_some(overlap)
	}

	/// Point containment, inclusive on all four edges.
	pub fn contains(&self, x: f64, y: f64) -> bool {
		self.left <= x && x <= self.right && self.top <= y && y <= self.bottom
	}

	pub fn contains_bounds(&self, other: &Bounds) -> bool {
		self.contains(other.left, other.top) && self.contains(other.right, other.bottom)
	}

	/// Strict overlap test: rectangles sharing only an edge do not intersect.
	///
	/// This intentionally differs from [`Bounds::intersection`], which treats shared edges as overlapping.
	pub fn intersects(&self, other: &Bounds) -> bool {
		self.left < other.right && other.left < self.right && self.top < other.bottom && other.top < self.bottom
	}

	/// Swaps inverted edge pairs. The vertical and horizontal pairs are handled independently.
	pub fn normalize(&self) -> Self {
		Self {
			top: self.top.min(self.bottom),
			bottom: self.top.max(self.bottom),
			left: self.left.min(self.right),
			right: self.left.max(self.right),
		}
	}

	/// Moves the top-left corner, keeping the size. Unset coordinates are left untouched.
	pub fn update_position(&self, x: Option<f64>, y: Option<f64>) -> Self {
		let mut bounds = *self;
		if let Some(x) = x {
			bounds.left = x;
			bounds.right = x + self.width();
		}
		if let Some(y) = y {
			bounds.top = y;
			bounds.bottom = y + self.height();
		}
		bounds
	}

	/// Resizes from the top-left corner.
	///
	/// When `proportional` is set, the supplied dimension's scale factor is applied to the other one as well.
	/// If both dimensions are supplied the width wins.
	pub fn update_size(&self, width: Option<f64>, height: Option<f64>, proportional: bool) -> Self {
		let (width, height) = match (width, height, proportional) {
			(Some(width), _, true) => (Some(width), scale(self.height(), width, self.width())),
			(None, Some(height), true) => (scale(self.width(), height, self.height()), Some(height)),
			_ => (width, height),
		};

		let mut bounds = *self;
		if let Some(width) = width {
			bounds.right = self.left + width;
		}
		if let Some(height) = height {
			bounds.bottom = self.top + height;
		}
		bounds
	}

	pub fn update_size_and_position(&self, x: Option<f64>, y: Option<f64>, width: Option<f64>, height: Option<f64>, proportional: bool) -> Self {
		self.update_size(width, height, proportional).update_position(x, y)
	}

	pub fn translate(&self, dx: f64, dy: f64) -> Self {
		Self {
			top: self.top + dy,
			left: self.left + dx,
			bottom: self.bottom + dy,
			right: self.right + dx,
		}
	}
}

/// Scales `other` by `new / old`, or leaves it unchanged when `old` is degenerate.
fn scale(other: f64, new: f64, old: f64) -> Option<f64> {
	(old != 0.).then(|| other * new / old)
}

#[cfg(test)]
mod test {
	use super::*;

	const SQUARE: Bounds = Bounds::new(0., 0., 10., 10.);

	#[test]
	fn derived_measurements() {
		let bounds = Bounds::new(10., 20., 50., 120.);

		assert_eq!(bounds.width(), 100.);
		assert_eq!(bounds.height(), 40.);
		assert_eq!(bounds.center(), DVec2::new(70., 30.));
		assert_eq!(bounds.area(), 4000.);
		assert!(!bounds.is_empty());
		assert!(Bounds::new(5., 5., 5., 30.).is_empty());
	}

	#[test]
	fn normalize_is_idempotent_and_independent_per_axis() {
		let inverted_vertically = Bounds::new(10., 0., 0., 10.);
		let normalized = inverted_vertically.normalize();

		assert_eq!(normalized, SQUARE);
		assert_eq!(normalized.normalize(), normalized);

		let inverted_horizontally = Bounds::new(0., 30., 10., 20.);
		assert_eq!(inverted_horizontally.normalize(), Bounds::new(0., 20., 10., 30.));
	}

	#[test]
	fn union_contains_every_member_regardless_of_order() {
		let members = [SQUARE, Bounds::new(-5., 3., 2., 40.), Bounds::new(20., 20., 30., 25.)];
		let union = Bounds::union(&members).unwrap();

		assert_eq!(union, Bounds::new(-5., 0., 30., 40.));
		assert!(members.iter().all(|member| union.contains_bounds(member)));

		let reversed: Vec<Bounds> = members.iter().rev().copied().collect();
		assert_eq!(Bounds::union(&reversed), Some(union));
		assert_eq!(Bounds::union(&[]), None);
	}

	#[test]
	fn intersection_of_touching_edges_has_zero_height() {
		let below = Bounds::new(10., 0., 20., 10.);
		let intersection = Bounds::intersection(&SQUARE, &below).unwrap();

		assert_eq!(intersection, Bounds::new(10., 0., 10., 10.));
		assert_eq!(intersection.height(), 0.);
		assert_eq!(intersection.width(), 10.);
	}

	#[test]
	fn intersection_of_apart_rectangles_is_none() {
		assert_eq!(Bounds::intersection(&SQUARE, &Bounds::new(11., 0., 20., 10.)), None);
		assert_eq!(Bounds::intersection(&SQUARE, &Bounds::new(5., 5., 15., 15.)), Some(Bounds::new(5., 5., 10., 10.)));
	}

	#[test]
	fn contains_is_inclusive_but_intersects_is_strict() {
		let below = Bounds::new(10., 0., 20., 10.);

		assert!(SQUARE.contains(10., 10.));
		assert!(SQUARE.contains(0., 0.));
		assert!(!SQUARE.contains(10.5, 3.));

		assert!(!SQUARE.intersects(&below));
		assert!(SQUARE.intersects(&Bounds::new(9., 9., 20., 20.)));
	}

	#[test]
	fn partial_updates_leave_unset_edges_alone() {
		let bounds = Bounds::new(10., 20., 30., 60.);

		assert_eq!(bounds.update_position(Some(0.), None), Bounds::new(10., 0., 30., 40.));
		assert_eq!(bounds.update_position(None, Some(5.)), Bounds::new(5., 20., 25., 60.));
		assert_eq!(bounds.update_size(None, Some(100.), false), Bounds::new(10., 20., 110., 60.));
		assert_eq!(bounds.update_size(None, None, true), bounds);
	}

	#[test]
	fn proportional_resize_scales_the_other_dimension() {
		let bounds = Bounds::new(0., 0., 20., 40.);

		assert_eq!(bounds.update_size(Some(80.), None, true), Bounds::new(0., 0., 40., 80.));
		assert_eq!(bounds.update_size(None, Some(10.), true), Bounds::new(0., 0., 10., 20.));
		assert_eq!(
			bounds.update_size_and_position(Some(5.), Some(5.), Some(20.), None, true),
			Bounds::new(5., 5., 15., 25.)
		);
	}

	#[test]
	fn layer_descriptor_geometry() {
		let edge = |value: f64| json!({ "_unit": "pixelsUnit", "_value": value });
		let pixel = json!({
			"layerKind": 1,
			"boundsNoEffects": { "top": edge(1.), "left": edge(2.), "bottom": edge(3.), "right": edge(4.) },
		});
		let artboard = json!({
			"layerKind": 7,
			"artboardEnabled": true,
			"boundsNoEffects": { "top": 0, "left": 0, "bottom": 1, "right": 1 },
			"artboard": { "artboardRect": { "top": 0., "left": 0., "bottom": 600., "right": 800. } },
		});
		let group_end = json!({ "layerKind": 13, "boundsNoEffects": { "top": 0, "left": 0, "bottom": 1, "right": 1 } });

		assert_eq!(Bounds::from_layer_descriptor(&pixel, 72.).unwrap(), Some(Bounds::new(1., 2., 3., 4.)));
		assert_eq!(Bounds::from_layer_descriptor(&artboard, 72.).unwrap(), Some(Bounds::new(0., 0., 600., 800.)));
		assert_eq!(Bounds::from_layer_descriptor(&group_end, 72.).unwrap(), None);
		assert_eq!(Bounds::from_descriptor(&json!({ "top": 0 }), 72.), Err(DocumentError::MissingField("left")));
	}

	#[test]
	fn descriptor_round_trip() {
		let bounds = Bounds::new(1.5, 2., 30., 40.25);
		assert_eq!(Bounds::from_descriptor(&bounds.to_descriptor(), 72.), Ok(bounds));
	}
}
